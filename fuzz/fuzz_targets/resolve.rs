#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_kit::Uri;

fuzz_target!(|data: (&str, &str)| {
    let (Ok(base), Ok(r)) = (Uri::<&str>::parse(data.0), Uri::<&str>::parse(data.1)) else {
        return;
    };
    let Ok(u1) = base.resolve(&r) else { return };

    assert!(u1.is_valid(), "{}", u1.error_string());
    if !r.has_scheme() {
        assert_eq!(u1.scheme(), base.scheme());
    }
    if r.has_fragment() {
        assert_eq!(u1.fragment_raw(), r.fragment_raw());
    }
});
