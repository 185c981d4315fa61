#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_kit::{OwnedComponents, Uri};

fuzz_target!(|data: &str| {
    let Ok(c1) = OwnedComponents::parse(data) else {
        return;
    };
    let s1 = c1.to_string();

    // A canonical serialization is itself a valid URI reference.
    let uri: Uri<&str> = Uri::new(s1.as_str());
    assert!(uri.is_valid(), "{data:?} -> {s1:?}: {}", uri.error_string());

    let c2 = OwnedComponents::parse(&s1).unwrap();
    assert_eq!(c1.scheme(), c2.scheme());
    assert_eq!(c1.host(), c2.host());
    assert_eq!(c1.port(), c2.port());
    assert_eq!(c1.queries(), c2.queries());
    assert_eq!(c1.fragment(), c2.fragment());
});
