use super::{push_encoded, Component};
use crate::{
    components::HostKind,
    ip, parse,
    pct_enc::{self, encoder::RegName, Charset},
    punycode,
    scheme::SchemeKind,
    status::UriStatus,
};
use alloc::{
    borrow::ToOwned,
    string::{String, ToString},
    vec::Vec,
};
use core::net::{Ipv4Addr, Ipv6Addr};

/// The parsed value of a host.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HostData {
    /// An empty host.
    #[default]
    Empty,
    /// A domain of a special scheme, as lowercase ASCII labels.
    Domain(Vec<String>),
    /// An IPv4 address.
    Ipv4(Ipv4Addr),
    /// An IPv6 address.
    Ipv6(Ipv6Addr),
    /// An IPvFuture literal, without brackets.
    IpvFuture(String),
    /// The decoded registered name of a non-special scheme.
    Opaque(String),
}

/// A host.
///
/// [`parse`](Component::parse) treats the input as the host of a special
/// scheme, so registered names are checked as domains. A bare IPv6 address
/// is accepted and bracketed on output.
///
/// ```
/// use uri_kit::component::{Component, Host, HostData};
///
/// let host = Host::parse("Bücher.example")?;
/// assert_eq!(host.labels(), ["xn--bcher-kva", "example"]);
/// assert_eq!(host.to_unicode().as_deref(), Some("bücher.example"));
///
/// let host = Host::parse("::1")?;
/// assert!(matches!(host.data(), HostData::Ipv6(_)));
/// assert_eq!(host.to_string(), "[::1]");
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Host {
    data: HostData,
}

impl Host {
    /// Creates a host from parsed data.
    #[must_use]
    pub fn new(data: HostData) -> Self {
        Self { data }
    }

    /// Parses a host as it would appear in a URI with the given scheme.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the host is not valid for the scheme.
    pub fn parse_for(s: &str, scheme: SchemeKind) -> Result<Self, UriStatus> {
        if !s.starts_with('[') {
            if let Some(addr) = ip::parse_v6(s.as_bytes()) {
                return Ok(Self::new(HostData::Ipv6(addr)));
            }
        }

        let components = parse::parse_component(s, UriStatus::ValidHost, scheme)?;
        let bracketed = || {
            s.strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or(UriStatus::InvalidIpLiteral)
        };
        let data = match components.host_kind() {
            HostKind::Empty => HostData::Empty,
            HostKind::Ipv4 => ip::parse_v4(s.as_bytes())
                .map(HostData::Ipv4)
                .ok_or(UriStatus::InvalidIpLiteral)?,
            HostKind::Ipv6 => ip::parse_v6(bracketed()?.as_bytes())
                .map(HostData::Ipv6)
                .ok_or(UriStatus::InvalidIpLiteral)?,
            HostKind::IpvFuture => HostData::IpvFuture(bracketed()?.to_ascii_lowercase()),
            HostKind::Opaque => HostData::Opaque(decode_any(s)?),
            HostKind::Domain => {
                let ascii = punycode::to_ascii(&decode_any(s)?).ok_or(UriStatus::InvalidPunycode)?;
                HostData::Domain(ascii.split('.').map(ToOwned::to_owned).collect())
            }
        };
        Ok(Self::new(data))
    }

    /// Returns the parsed value.
    #[must_use]
    pub fn data(&self) -> &HostData {
        &self.data
    }

    /// Returns the labels of a domain, or an empty slice for other hosts.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match &self.data {
            HostData::Domain(labels) => labels,
            _ => &[],
        }
    }

    /// Returns the top-level domain, the last label of a domain.
    #[must_use]
    pub fn tld(&self) -> Option<&str> {
        self.labels().last().map(String::as_str)
    }

    /// Checks whether the host is an IP address or an IPvFuture literal.
    #[must_use]
    pub fn is_ip(&self) -> bool {
        matches!(
            self.data,
            HostData::Ipv4(_) | HostData::Ipv6(_) | HostData::IpvFuture(_)
        )
    }

    /// Returns the ASCII serialization of the host, IPv6 bracketed.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::new();
        self.append_to(&mut out, false);
        out
    }

    /// Returns a domain with its `xn--` labels decoded, or `None` if the
    /// host is not a domain or a label is not valid punycode.
    #[must_use]
    pub fn to_unicode(&self) -> Option<String> {
        match &self.data {
            HostData::Domain(labels) => punycode::to_unicode(&labels.join(".")),
            _ => None,
        }
    }
}

fn decode_any(s: &str) -> Result<String, UriStatus> {
    pct_enc::decode_lossy(s, Charset::Any)
        .map(|s| s.into_owned())
        .map_err(|_| UriStatus::InvalidPercentEncoding)
}

impl Component for Host {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        Self::parse_for(s, SchemeKind::Special(0))
    }

    /// A host has no separator of its own; `with_separators` is ignored.
    fn append_to(&self, out: &mut String, _: bool) {
        match &self.data {
            HostData::Empty => {}
            HostData::Domain(labels) => {
                for (i, label) in labels.iter().enumerate() {
                    if i != 0 {
                        out.push('.');
                    }
                    out.push_str(label);
                }
            }
            HostData::Ipv4(addr) => out.push_str(&addr.to_string()),
            HostData::Ipv6(addr) => {
                out.push('[');
                ip::write_v6(out, *addr);
                out.push(']');
            }
            HostData::IpvFuture(literal) => {
                out.push('[');
                out.push_str(literal);
                out.push(']');
            }
            HostData::Opaque(name) => push_encoded::<RegName>(out, name),
        }
    }

    fn has_value(&self) -> bool {
        self.data != HostData::Empty
    }
}

impl core::fmt::Display for Host {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let host = Host::parse("127.0.0.1").unwrap();
        assert_eq!(host.data(), &HostData::Ipv4(Ipv4Addr::LOCALHOST));
        assert!(host.is_ip());
        assert_eq!(host.tld(), None);

        let host = Host::parse("[v1.Fe80]").unwrap();
        assert_eq!(host.data(), &HostData::IpvFuture("v1.fe80".into()));

        let host = Host::parse("[0:0::1]").unwrap();
        assert_eq!(host.to_ascii(), "[::1]");

        let host = Host::parse_for("a%20b", SchemeKind::Other).unwrap();
        assert_eq!(host.data(), &HostData::Opaque("a b".into()));
        assert_eq!(host.to_ascii(), "a%20b");

        let host = Host::parse_for("", SchemeKind::Other).unwrap();
        assert!(!host.has_value());
        assert_eq!(Host::parse(""), Err(UriStatus::HostMissing));
    }

    #[test]
    fn domains() {
        let host = Host::parse("WWW.Example.CO.uk").unwrap();
        assert_eq!(host.labels(), ["www", "example", "co", "uk"]);
        assert_eq!(host.tld(), Some("uk"));
        assert_eq!(host.size(), 17);

        let host = Host::parse("m%C3%BCnchen.de").unwrap();
        assert_eq!(host.to_ascii(), "xn--mnchen-3ya.de");

        assert_eq!(Host::parse("a..b"), Err(UriStatus::EmptySubdomain));
        assert_eq!(Host::parse("a.b."), Err(UriStatus::DotAtEnd));
        assert_eq!(Host::parse("[::1"), Err(UriStatus::InvalidIpLiteral));
        assert_eq!(Host::parse("a%2Fb"), Err(UriStatus::InvalidCharacter));
    }
}
