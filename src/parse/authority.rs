use super::{scheme::starts_with_drive_letter, ParsingContext};
use crate::{
    components::{ComponentStore, HostKind, Span},
    ip,
    pct_enc::{self, table, Charset, Table},
    punycode,
    scheme::SchemeKind,
    status::{UriStatus, Warnings},
};

const USERINFO_WITH_AT: Table = table::USERINFO.or(Table::new(b"@"));
const ASCII_REG_NAME: Table = table::REG_NAME.sub_pct_encoded();

const MAX_LABEL_LEN: usize = 63;

/// Checks the shape of a domain name, label by label.
///
/// Returns the byte offset and kind of the first problem found.
fn validate_domain(domain: &str) -> Result<(), (usize, UriStatus)> {
    if let Some(stripped) = domain.strip_suffix('.') {
        return Err((stripped.len(), UriStatus::DotAtEnd));
    }

    let mut offset = 0;
    for label in domain.split('.') {
        let bytes = label.as_bytes();
        let status = if bytes.is_empty() {
            Some(UriStatus::EmptySubdomain)
        } else if bytes.len() > MAX_LABEL_LEN {
            Some(UriStatus::SubdomainTooLong)
        } else if bytes[0] == b'-' {
            Some(UriStatus::BeginWithHyphen)
        } else if bytes[bytes.len() - 1] == b'-' {
            Some(UriStatus::EndWithHyphen)
        } else if bytes.get(2..4) == Some(b"--") {
            match punycode::strip_ace_prefix(label) {
                Some(encoded) if punycode::decode(encoded).is_some() => None,
                Some(_) => Some(UriStatus::InvalidPunycode),
                None => Some(UriStatus::DoubleHyphen),
            }
        } else {
            None
        };
        if let Some(status) = status {
            return Err((offset, status));
        }
        offset += label.len() + 1;
    }
    Ok(())
}

/// Parses the digits of a port.
///
/// Returns the offset and kind of the error on failure.
pub(crate) fn parse_port_digits(digits: &[u8]) -> Result<u16, (usize, UriStatus)> {
    let mut value: u32 = 0;
    for (i, &x) in digits.iter().enumerate() {
        if !x.is_ascii_digit() {
            return Err((i, UriStatus::PortInvalid));
        }
        value = value * 10 + u32::from(x - b'0');
        if value > u32::from(u16::MAX) {
            return Err((0, UriStatus::PortOutOfRange));
        }
    }
    // The value never exceeds `u16::MAX` here.
    Ok(value as u16)
}

/// `"v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
fn is_ipv_future(bytes: &[u8]) -> bool {
    let Some((b'v' | b'V', rest)) = bytes.split_first() else {
        return false;
    };
    let Some(dot) = rest.iter().position(|&x| x == b'.') else {
        return false;
    };
    let (version, addr) = (&rest[..dot], &rest[dot + 1..]);
    !version.is_empty()
        && table::HEXDIG.matches(version)
        && !addr.is_empty()
        && table::IPV_FUTURE.matches(addr)
}

impl<S: ComponentStore> ParsingContext<'_, S> {
    pub(super) fn parse_authority(&mut self) {
        let start = self.pos;
        let special = self.scheme.is_special();
        let end = self.find_from(start, |x| {
            matches!(x, b'/' | b'?' | b'#') || (special && x == b'\\')
        });
        self.authority_end = end;

        // `file://C:/x` names a drive, not a host.
        if self.scheme == SchemeKind::File && starts_with_drive_letter(&self.bytes()[start..]) {
            self.record_host(Span::new(start, start), HostKind::Empty);
            self.authority_end = start;
            self.status = UriStatus::ValidPath;
            return;
        }

        let mut host_start = start;
        if let Some(at) = self.bytes()[start..end].iter().rposition(|&x| x == b'@') {
            let at = start + at;
            if self.scheme == SchemeKind::File {
                return self.fail(start, UriStatus::UnexpectedCredentials);
            }
            if !self.check(start, at, USERINFO_WITH_AT) {
                return;
            }
            match self.bytes()[start..at].iter().position(|&x| x == b':') {
                Some(colon) => {
                    let colon = start + colon;
                    self.out.set_username(self.input, Span::new(start, colon));
                    self.out.set_password(self.input, Span::new(colon + 1, at));
                }
                None => self.out.set_username(self.input, Span::new(start, at)),
            }
            host_start = at + 1;
            if host_start == end {
                return self.fail(host_start, UriStatus::HostMissing);
            }
        }

        self.pos = host_start;
        self.status = UriStatus::ValidHost;
    }

    pub(super) fn parse_host(&mut self) {
        let start = self.pos;
        let end = self.authority_end;
        let bytes = self.bytes();

        if bytes.get(start) == Some(&b'[') {
            let Some(close) = bytes[start..end].iter().position(|&x| x == b']') else {
                return self.fail(start, UriStatus::InvalidIpLiteral);
            };
            let close = start + close;
            let literal = &bytes[start + 1..close];
            let kind = if matches!(literal.first(), Some(b'v' | b'V')) {
                HostKind::IpvFuture
            } else {
                HostKind::Ipv6
            };
            let valid = match kind {
                HostKind::IpvFuture => is_ipv_future(literal),
                _ => ip::parse_v6(literal).is_some(),
            };
            if !valid {
                return self.fail(start + 1, UriStatus::InvalidIpLiteral);
            }
            let host_end = close + 1;
            if host_end != end && bytes[host_end] != b':' {
                return self.fail(host_end, UriStatus::InvalidCharacter);
            }
            self.record_host(Span::new(start, host_end), kind);
            self.pos = host_end;
            self.status = UriStatus::ValidPort;
            return;
        }

        let host_end = bytes[start..end]
            .iter()
            .position(|&x| x == b':')
            .map_or(end, |i| start + i);
        let span = Span::new(start, host_end);
        self.pos = host_end;
        self.status = UriStatus::ValidPort;

        if start == host_end {
            if let SchemeKind::Special(_) = self.scheme {
                return self.fail(start, UriStatus::HostMissing);
            }
            return self.record_host(span, HostKind::Empty);
        }
        if ip::parse_v4(&bytes[start..host_end]).is_some() {
            return self.record_host(span, HostKind::Ipv4);
        }

        if !self.scheme.is_special() {
            if self.check(start, host_end, table::REG_NAME) {
                self.record_host(span, HostKind::Opaque);
            }
            return;
        }

        if !self.check_domain(start, host_end, table::REG_NAME) {
            return;
        }
        self.host = span;
        if bytes[start..host_end].iter().any(|&x| x == b'%' || !x.is_ascii()) {
            self.status = UriStatus::ValidPunycode;
            return;
        }
        if self.options.validate_domains {
            if let Err((offset, status)) = validate_domain(&self.input[start..host_end]) {
                return self.fail(start + offset, status);
            }
        }
        self.record_host(span, HostKind::Domain);
    }

    /// Converts a percent-encoded or non-ASCII domain to its ASCII form and
    /// checks the result.
    pub(super) fn parse_punycode(&mut self) {
        let span = self.host;
        if let Some(range) = span.range() {
            let input = self.input;
            if !self.check_punycode(range.start, &input[range]) {
                return;
            }
            self.record_host(span, HostKind::Domain);
        }
        self.status = UriStatus::ValidPort;
    }

    fn check_punycode(&mut self, start: usize, host: &str) -> bool {
        let decoded = match pct_enc::decode_with(host, Charset::Any) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.fail(start + e.index(), UriStatus::InvalidPercentEncoding);
                return false;
            }
        };
        let Some(ascii) = core::str::from_utf8(&decoded).ok().and_then(punycode::to_ascii) else {
            self.fail(start, UriStatus::InvalidPunycode);
            return false;
        };

        if !ASCII_REG_NAME.matches(ascii.as_bytes()) {
            self.fail(start, UriStatus::InvalidCharacter);
            return false;
        }
        if self.options.validate_domains {
            if let Err((_, status)) = validate_domain(&ascii) {
                self.fail(start, status);
                return false;
            }
        }
        true
    }

    pub(super) fn parse_port(&mut self) {
        let end = self.authority_end;
        self.status = UriStatus::ValidPath;
        if self.pos >= end {
            self.pos = end;
            return;
        }

        // Skip the `:` left by the host state.
        let start = self.pos + 1;
        self.pos = end;
        if start >= end {
            return;
        }
        let port = match parse_port_digits(&self.bytes()[start..end]) {
            Ok(port) => port,
            Err((offset, status)) => return self.fail(start + offset, status),
        };
        if self.scheme == SchemeKind::File {
            return self.fail(start, UriStatus::UnexpectedPort);
        }

        let default = self.scheme.default_port();
        if default != 0 && port == default {
            self.out.clear_port();
            self.warn(Warnings::DEFAULT_PORT_ELIDED, start);
        } else {
            self.out.set_port(self.input, Span::new(start, end), port);
        }
    }

    fn record_host(&mut self, span: Span, kind: HostKind) {
        self.host = span;
        self.out.set_host(self.input, span, kind);
    }
}
