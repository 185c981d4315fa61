use uri_kit::{
    component::{Component, Path},
    normalize::{normalize_segments, remove_dot_segments, NormalizeOptions},
    UriString,
};

fn rds(path: &str) -> String {
    let mut buf = String::new();
    remove_dot_segments(&mut buf, path);
    buf
}

#[test]
fn remove_dots() {
    assert_eq!(rds("/a/b/c/./../../g"), "/a/g");
    assert_eq!(rds("mid/content=5/../6"), "mid/6");
    assert_eq!(rds("/a/b/c/../../../../g"), "/g");
    assert_eq!(rds("a/../../b"), "b");
    assert_eq!(rds("/a/b/."), "/a/b/");
    assert_eq!(rds("/a/%2e%2E/b"), "/b");
    assert_eq!(rds("."), "");
    assert_eq!(rds(".."), "");
}

#[test]
fn segments_idempotent() {
    let paths = [
        "/a/b/c/./../../g",
        "../../a/./b/",
        "a//b/../../..",
        "/./.././x/%2E%2e/y",
        "//",
        "x/./",
        "",
    ];
    let all_options = [
        NormalizeOptions::new(),
        NormalizeOptions::new().remove_leading(true),
        NormalizeOptions::new().remove_empty_segments(true),
        NormalizeOptions::new()
            .remove_leading(true)
            .remove_empty_segments(true),
    ];
    for path in paths {
        for options in all_options {
            let segs: Vec<&str> = path.split('/').collect();
            let once = normalize_segments(segs, options);
            let twice = normalize_segments(once.clone(), options);
            assert_eq!(once, twice, "{path:?} {options:?}");
        }
    }
}

#[test]
fn segments_keep_leading() {
    let segs = vec!["..", "a", "..", "..", "b"];
    assert_eq!(
        normalize_segments(segs.clone(), NormalizeOptions::new()),
        ["..", "..", "b"]
    );
    assert_eq!(
        normalize_segments(segs, NormalizeOptions::new().remove_leading(true)),
        ["b"]
    );

    let owned: Vec<String> = vec!["a".into(), ".".into(), "..".into()];
    assert_eq!(normalize_segments(owned, NormalizeOptions::new()), [""]);
}

#[test]
fn normalize_typed_path() {
    let mut path = Path::parse("/a/./b/../../../c/").unwrap();
    path.normalize(NormalizeOptions::new());
    assert_eq!(path.to_string(), "/../c/");

    let mut path = Path::parse("/a/./b/../../../c/").unwrap();
    path.remove_dot_segments();
    assert_eq!(path.to_string(), "/c/");
}

#[test]
fn normalize_uri_path() {
    let mut uri = UriString::parse("foo://h/a/../../b?q#f").unwrap();
    uri.normalize_path(NormalizeOptions::new()).unwrap();
    assert_eq!(uri, "foo://h/../b?q#f");
    uri.normalize_path(NormalizeOptions::new().remove_leading(true))
        .unwrap();
    assert_eq!(uri, "foo://h/b?q#f");

    let mut uri = UriString::parse("http://h/a\\..\\b").unwrap();
    uri.normalize_path(NormalizeOptions::new()).unwrap();
    assert_eq!(uri, "http://h/b");

    let mut uri = UriString::parse("http://h/a//b/./c/").unwrap();
    uri.normalize_path(NormalizeOptions::new().remove_empty_segments(true))
        .unwrap();
    assert_eq!(uri, "http://h/a/b/c/");

    // Opaque paths have no segments.
    let mut uri = UriString::parse("mailto:a/../b").unwrap();
    uri.normalize_path(NormalizeOptions::new()).unwrap();
    assert_eq!(uri, "mailto:a/../b");

    let mut uri = UriString::new("http://h/a b");
    assert!(uri.normalize_path(NormalizeOptions::new()).is_err());
    assert_eq!(uri, "http://h/a b");
}
