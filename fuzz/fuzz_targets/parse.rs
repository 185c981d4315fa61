#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_kit::Uri;

// Resuming a lazy parse yields the same components as parsing eagerly.
fuzz_target!(|data: &str| {
    let lazy: Uri<&str> = Uri::new(data);
    let host = lazy.host_raw();
    let scheme = lazy.scheme();
    let fragment = lazy.fragment_raw();
    let path = lazy.path_raw();

    let eager: Uri<&str> = Uri::new(data);
    let status = eager.status();
    assert_eq!(lazy.status(), status);
    assert_eq!(eager.scheme(), scheme);
    assert_eq!(eager.host_raw(), host);
    assert_eq!(eager.path_raw(), path);
    assert_eq!(eager.fragment_raw(), fragment);
    assert_eq!(eager.queries_raw(), lazy.queries_raw());
    assert_eq!(eager.port(), lazy.port());

    if let Ok(parsed) = Uri::<&str>::parse(data) {
        assert!(parsed.is_valid());
        assert!(status.is_valid());
    }
});
