#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use uri_kit::ip;

fuzz_target!(|data: &str| {
    assert_eq!(ip::parse_v4(data.as_bytes()), Ipv4Addr::from_str(data).ok());

    let v6 = ip::parse_v6(data.as_bytes());
    assert_eq!(v6, Ipv6Addr::from_str(data).ok());

    if let Some(addr) = v6 {
        let mut out = String::new();
        ip::write_v6(&mut out, addr);
        assert_eq!(ip::parse_v6(out.as_bytes()), Some(addr));
    }
});
