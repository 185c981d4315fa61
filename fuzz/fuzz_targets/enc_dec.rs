#![no_main]
use libfuzzer_sys::fuzz_target;
use uri_kit::pct_enc::{encoder::Query, EStr, EString};

fuzz_target!(|data: &[u8]| {
    let mut buf = EString::<Query>::new();
    let mut lossy = String::new();

    for chunk in data.utf8_chunks() {
        // A literal `%` would otherwise be kept when it starts a triplet.
        for (i, part) in chunk.valid().split('%').enumerate() {
            if i != 0 {
                buf.push_estr(EStr::encode_byte(b'%'));
            }
            buf.encode_str::<Query>(part);
        }
        lossy.push_str(chunk.valid());

        for &x in chunk.invalid() {
            buf.push_estr(EStr::encode_byte(x));
        }
        if !chunk.invalid().is_empty() {
            lossy.push(char::REPLACEMENT_CHARACTER);
        }
    }

    assert_eq!(data, &*buf.decode().to_bytes());
    assert_eq!(lossy, buf.decode().to_string_lossy());
});
