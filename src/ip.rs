//! IP address literals in hosts.

use alloc::string::String;
use core::{
    fmt::Write,
    net::{Ipv4Addr, Ipv6Addr},
};

// dec-octet = DIGIT / %x31-39 DIGIT / "1" 2DIGIT / "2" %x30-34 DIGIT / "25" %x30-35
fn read_dec_octet(s: &mut &[u8]) -> Option<u8> {
    let len = s.iter().take(4).take_while(|x| x.is_ascii_digit()).count();
    if len == 0 || len > 3 || (len > 1 && s[0] == b'0') {
        return None;
    }
    let mut value = 0u16;
    for &x in &s[..len] {
        value = value * 10 + u16::from(x - b'0');
    }
    *s = &s[len..];
    u8::try_from(value).ok()
}

fn read_v4_octets(mut s: &[u8]) -> Option<[u8; 4]> {
    let mut out = [0; 4];
    for (i, octet) in out.iter_mut().enumerate() {
        if i != 0 {
            s = s.strip_prefix(b".")?;
        }
        *octet = read_dec_octet(&mut s)?;
    }
    s.is_empty().then_some(out)
}

/// Parses a dotted-decimal IPv4 address.
///
/// Leading zeros and shortened forms are rejected.
#[must_use]
pub fn parse_v4(s: &[u8]) -> Option<Ipv4Addr> {
    read_v4_octets(s).map(Ipv4Addr::from)
}

enum Group {
    // 1*4HEXDIG followed by ":" or the end
    Hex(u16),
    // "::"
    Ellipsis,
    // 1*4HEXDIG followed by "."
    Ipv4Tail,
}

fn read_group(s: &mut &[u8], first: bool) -> Option<Group> {
    if let Some(rest) = s.strip_prefix(b"::") {
        *s = rest;
        return Some(Group::Ellipsis);
    }
    if !first {
        *s = s.strip_prefix(b":")?;
        if let Some(rest) = s.strip_prefix(b":") {
            *s = rest;
            return Some(Group::Ellipsis);
        }
    }

    let len = s.iter().take(5).take_while(|x| x.is_ascii_hexdigit()).count();
    if len == 0 || len > 4 {
        return None;
    }
    if s.get(len) == Some(&b'.') {
        return Some(Group::Ipv4Tail);
    }
    let mut value = 0u16;
    for &x in &s[..len] {
        value = (value << 4) | u16::from(crate::pct_enc::hex_value(x)?);
    }
    *s = &s[len..];
    Some(Group::Hex(value))
}

/// Parses an IPv6 address without brackets.
///
/// Accepts `::` elision and a trailing embedded IPv4 address.
#[must_use]
pub fn parse_v6(mut s: &[u8]) -> Option<Ipv6Addr> {
    let mut groups = [0u16; 8];
    let mut len = 0;
    let mut ellipsis = None;
    let mut after_ellipsis = false;

    while !s.is_empty() {
        let first = (len == 0 && ellipsis.is_none()) || after_ellipsis;
        match read_group(&mut s, first)? {
            Group::Hex(value) => {
                if len == 8 {
                    return None;
                }
                groups[len] = value;
                len += 1;
                after_ellipsis = false;
            }
            Group::Ellipsis => {
                if ellipsis.is_some() || after_ellipsis {
                    return None;
                }
                ellipsis = Some(len);
                after_ellipsis = true;
            }
            Group::Ipv4Tail => {
                if len > 6 {
                    return None;
                }
                let [a, b, c, d] = read_v4_octets(s)?;
                groups[len] = u16::from_be_bytes([a, b]);
                groups[len + 1] = u16::from_be_bytes([c, d]);
                len += 2;
                s = &[];
            }
        }
    }

    match ellipsis {
        None if len == 8 => {}
        Some(at) if len < 8 => {
            let tail = len - at;
            groups.copy_within(at..len, 8 - tail);
            groups[at..8 - tail].fill(0);
        }
        _ => return None,
    }
    Some(Ipv6Addr::from(groups))
}

/// Writes an IPv6 address in the RFC 5952 canonical form, without brackets.
///
/// The longest run of two or more zero groups is compressed to `::`,
/// choosing the first such run on ties. Hex digits are lowercase.
pub fn write_v6(out: &mut String, addr: Ipv6Addr) {
    let groups = addr.segments();

    let (mut best_start, mut best_len) = (8, 0);
    let mut i = 0;
    while i < 8 {
        if groups[i] == 0 {
            let start = i;
            while i < 8 && groups[i] == 0 {
                i += 1;
            }
            if i - start > best_len {
                (best_start, best_len) = (start, i - start);
            }
        } else {
            i += 1;
        }
    }
    if best_len < 2 {
        best_start = 8;
    }

    let mut i = 0;
    while i < 8 {
        if i == best_start {
            out.push_str("::");
            i += best_len;
            continue;
        }
        if i != 0 && i != best_start + best_len {
            out.push(':');
        }
        let _ = write!(out, "{:x}", groups[i]);
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn canonical(s: &str) -> String {
        let mut out = String::new();
        write_v6(&mut out, parse_v6(s.as_bytes()).unwrap());
        out
    }

    #[test]
    fn dec_octet() {
        for i in 0..=u8::MAX {
            let s = i.to_string();
            let mut s = s.as_bytes();
            assert_eq!(read_dec_octet(&mut s), Some(i));
            assert!(s.is_empty());
        }
        let mut s: &[u8] = b"256";
        assert_eq!(read_dec_octet(&mut s), None);
        s = b"01";
        assert_eq!(read_dec_octet(&mut s), None);
        s = b"1000";
        assert_eq!(read_dec_octet(&mut s), None);
    }

    #[test]
    fn v4() {
        assert_eq!(parse_v4(b"127.0.0.1"), Some(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(
            parse_v4(b"255.255.255.255"),
            Some(Ipv4Addr::new(255, 255, 255, 255))
        );
        assert_eq!(parse_v4(b"0.0.0.0"), Some(Ipv4Addr::UNSPECIFIED));

        assert!(parse_v4(b"256.0.0.1").is_none());
        assert!(parse_v4(b"255.0.0").is_none());
        assert!(parse_v4(b"255.0.0.1.2").is_none());
        assert!(parse_v4(b"255.0..1").is_none());
        assert!(parse_v4(b"255.0.0.01").is_none());
        assert!(parse_v4(b".0.0.0.0").is_none());
        assert!(parse_v4(b"0.0.0.0.").is_none());
        assert!(parse_v4(b"").is_none());
    }

    #[test]
    fn v6() {
        assert_eq!(parse_v6(b"0:0:0:0:0:0:0:0"), Some(Ipv6Addr::UNSPECIFIED));
        assert_eq!(
            parse_v6(b"1:02:003:0004:0005:006:07:8"),
            Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 8))
        );
        assert_eq!(parse_v6(b"::1"), Some(Ipv6Addr::LOCALHOST));
        assert_eq!(parse_v6(b"1::"), Some(Ipv6Addr::new(1, 0, 0, 0, 0, 0, 0, 0)));
        assert_eq!(parse_v6(b"::"), Some(Ipv6Addr::UNSPECIFIED));
        assert_eq!(
            parse_v6(b"2a02:6b8::11:11"),
            Some(Ipv6Addr::new(0x2a02, 0x6b8, 0, 0, 0, 0, 0x11, 0x11))
        );
        assert_eq!(
            parse_v6(b"1:2:3:4:5:6:7::"),
            Some(Ipv6Addr::new(1, 2, 3, 4, 5, 6, 7, 0))
        );

        assert!(parse_v6(b"").is_none());
        assert!(parse_v6(b":").is_none());
        assert!(parse_v6(b"::00000").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:8:9").is_none());
        assert!(parse_v6(b"1:2:::6:7:8").is_none());
        assert!(parse_v6(b":::").is_none());
        assert!(parse_v6(b"1:2::6::8").is_none());
        assert!(parse_v6(b"::1:2:3:4:5:6:7:8").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:8::").is_none());
        assert!(parse_v6(b":1:2:3:4:5:6:7:8").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:8:").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:").is_none());
    }

    #[test]
    fn v4_in_v6() {
        assert_eq!(
            parse_v6(b"::192.0.2.33"),
            Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 49152, 545))
        );
        assert_eq!(
            parse_v6(b"::FFFF:192.0.2.33"),
            Some(Ipv6Addr::new(0, 0, 0, 0, 0, 0xffff, 49152, 545))
        );
        assert_eq!(
            parse_v6(b"2001:db8:122:c000:2:2100:192.0.2.33"),
            Some(Ipv6Addr::new(0x2001, 0xdb8, 0x122, 0xc000, 0x2, 0x2100, 49152, 545))
        );

        assert!(parse_v6(b"::127.0.0.1:").is_none());
        assert!(parse_v6(b"1:2:3:4:5:127.0.0.1").is_none());
        assert!(parse_v6(b"1:2:3:4:5:6:7:127.0.0.1").is_none());
    }

    #[test]
    fn v6_canonical() {
        assert_eq!(canonical("::1"), "::1");
        assert_eq!(canonical("0:0:0:0:0:0:0:0"), "::");
        assert_eq!(canonical("2001:DB8:0:0:1:0:0:1"), "2001:db8::1:0:0:1");
        assert_eq!(canonical("2001:db8:0:1:1:1:1:1"), "2001:db8:0:1:1:1:1:1");
        assert_eq!(canonical("1:0:0:0:0:0:0:0"), "1::");
        assert_eq!(canonical("fe80::0001"), "fe80::1");
    }
}
