use uri_kit::{component::Queries, UriStatus, UriString};

fn uri(s: &str) -> UriString {
    UriString::parse(s).unwrap()
}

#[test]
fn set_scheme() {
    let mut u = uri("http://example.com/a");
    u.set_scheme("https").unwrap();
    assert_eq!(u, "https://example.com/a");
    assert_eq!(u.port_uint16(), 443);

    assert!(u.set_scheme("1http").is_err());
    assert!(u.set_scheme("").is_err());
    assert_eq!(u, "https://example.com/a");

    let mut u = uri("//example.com/a");
    u.set_scheme("foo").unwrap();
    assert_eq!(u, "foo://example.com/a");
}

#[test]
fn set_credentials() {
    let mut u = uri("http://example.com/");
    u.set_username(Some("user@x")).unwrap();
    assert_eq!(u, "http://user%40x@example.com/");
    assert_eq!(u.username_raw(), Some("user%40x"));

    u.set_password(Some("p:w d")).unwrap();
    assert_eq!(u, "http://user%40x:p:w%20d@example.com/");
    assert_eq!(u.password_raw(), Some("p:w%20d"));

    u.set_password(None).unwrap();
    assert_eq!(u, "http://user%40x@example.com/");

    u.set_username(Some("a:b")).unwrap();
    assert_eq!(u, "http://a%3Ab@example.com/");

    u.set_username(None).unwrap();
    assert_eq!(u, "http://example.com/");
    assert!(!u.has_credentials());

    let mut u = uri("mailto:a@example.com");
    assert_eq!(u.set_username(Some("me")), Err(UriStatus::HostMissing));
    assert_eq!(u, "mailto:a@example.com");
}

#[test]
fn set_host() {
    let mut u = uri("foo://h:1/p?q");
    u.set_host(Some("other.example")).unwrap();
    assert_eq!(u, "foo://other.example:1/p?q");

    u.set_host(Some("::1")).unwrap();
    assert_eq!(u, "foo://[::1]:1/p?q");
    assert_eq!(u.host_raw(), Some("[::1]"));

    u.set_host(None).unwrap();
    assert_eq!(u, "foo:/p?q");
    assert!(!u.has_host());

    u.set_host(Some("x.org")).unwrap();
    assert_eq!(u, "foo://x.org/p?q");

    let mut u = uri("foo:rel");
    u.set_host(Some("h")).unwrap();
    assert_eq!(u, "foo://h/rel");

    let mut u = uri("http://example.com/");
    assert_eq!(u.set_host(Some("-bad.com")), Err(UriStatus::BeginWithHyphen));
    assert_eq!(u.set_host(Some("a b")), Err(UriStatus::InvalidCharacter));
    assert_eq!(u, "http://example.com/");
}

#[test]
fn set_port() {
    let mut u = uri("http://example.com/a?b#c");
    u.set_port(Some(8080)).unwrap();
    assert_eq!(u, "http://example.com:8080/a?b#c");
    assert_eq!(u.port(), Some(8080));

    u.set_port(Some(80)).unwrap();
    assert_eq!(u, "http://example.com:80/a?b#c");
    assert_eq!(u.port(), None);
    assert_eq!(u.port_uint16(), 80);

    u.set_port(None).unwrap();
    assert_eq!(u, "http://example.com/a?b#c");

    let mut u = uri("file:///etc/hosts");
    assert_eq!(u.set_port(Some(1)), Err(UriStatus::UnexpectedPort));
    assert_eq!(u, "file:///etc/hosts");

    let mut u = uri("foo:bar");
    assert_eq!(u.set_port(Some(1)), Err(UriStatus::HostMissing));
}

#[test]
fn set_path() {
    let mut u = uri("http://example.com/x?q");
    u.set_path("a b").unwrap();
    assert_eq!(u, "http://example.com/a%20b?q");
    assert_eq!(u.path().unwrap().segments(), ["a b"]);

    u.set_path("/100%").unwrap();
    assert_eq!(u, "http://example.com/100%25?q");

    let mut u = uri("foo://h");
    u.set_path("rel").unwrap();
    assert_eq!(u, "foo://h/rel");

    let mut u = uri("foo:/p");
    u.set_path("//x").unwrap();
    assert_eq!(u, "foo:/.//x");
    assert!(!u.has_host());

    let mut u = uri("x#f");
    u.set_path("a:b").unwrap();
    assert_eq!(u, "./a:b#f");
    assert!(!u.has_scheme());
}

#[test]
fn set_queries() {
    let mut u = uri("http://example.com/p#f");
    u.set_queries(Some("a b=c")).unwrap();
    assert_eq!(u, "http://example.com/p?a%20b=c#f");

    u.set_queries(Some("x#y")).unwrap();
    assert_eq!(u, "http://example.com/p?x%23y#f");

    u.set_queries(None).unwrap();
    assert_eq!(u, "http://example.com/p#f");

    let mut u = uri("foo://h");
    u.set_queries(Some("")).unwrap();
    assert_eq!(u, "foo://h?");
    assert!(u.has_queries());

    let mut u = uri("http://example.com/?keep=1");
    let mut queries = u.queries().unwrap();
    queries.append("tag", "a&b");
    queries.set("keep", "2");
    u.set_query_pairs(&queries).unwrap();
    assert_eq!(u, "http://example.com/?keep=2&tag=a%26b");
    assert_eq!(u.queries().unwrap().get("tag"), Some("a&b"));

    u.set_query_pairs(&Queries::new()).unwrap();
    assert_eq!(u, "http://example.com/?");
}

#[test]
fn set_fragment() {
    let mut u = uri("http://example.com/");
    u.set_fragment(Some("50% done")).unwrap();
    assert_eq!(u, "http://example.com/#50%25%20done");
    assert_eq!(u.fragment().unwrap().as_str(), "50% done");

    u.set_fragment(Some("top")).unwrap();
    assert_eq!(u, "http://example.com/#top");

    u.set_fragment(None).unwrap();
    assert_eq!(u, "http://example.com/");
    assert!(!u.has_fragment());
}

#[test]
fn set_domains() {
    let mut u = uri("https://www.example.com/x");
    u.set_top_level_domain("org").unwrap();
    assert_eq!(u, "https://www.example.org/x");

    u.set_second_level_domain("sample").unwrap();
    assert_eq!(u, "https://www.sample.org/x");

    u.set_subdomains(&["api", "v2"]).unwrap();
    assert_eq!(u, "https://api.v2.sample.org/x");
    assert_eq!(u.subdomains(), ["api", "v2"]);

    u.set_subdomains(&[]).unwrap();
    assert_eq!(u, "https://sample.org/x");

    let mut u = uri("http://localhost/");
    u.set_second_level_domain("my").unwrap();
    assert_eq!(u, "http://my.localhost/");

    let mut u = uri("http://127.0.0.1/");
    u.set_top_level_domain("com").unwrap();
    assert_eq!(u, "http://127.0.0.1/");

    let mut u = uri("mailto:a@example.com");
    assert_eq!(u.set_top_level_domain("com"), Err(UriStatus::HostMissing));

    let mut u = uri("https://example.com/");
    assert_eq!(u.set_top_level_domain("-x"), Err(UriStatus::BeginWithHyphen));
    assert_eq!(u, "https://example.com/");
}

#[test]
fn edits_reject_invalid_uri() {
    let mut u = UriString::new("http://example.com/a b");
    assert_eq!(u.set_fragment(Some("f")), Err(UriStatus::InvalidCharacter));
    assert_eq!(u, "http://example.com/a b");
}
