//! Component records produced by the parser.
//!
//! The parser is generic over a [`ComponentStore`]. Two stores are provided:
//!
//! - [`UriComponents`] records byte offsets into the parsed input and never
//!   allocates. It backs the lazy [`Uri`](crate::Uri) façade.
//! - [`OwnedComponents`] copies every component into its own string,
//!   percent-encoding and canonicalizing on the way in. It is the only store
//!   that can be parsed against a base.

use crate::{
    ip,
    normalize::remove_dot_segments,
    parse::{self, ParseOptions},
    pct_enc::{self, table},
    punycode,
    scheme::{self, SchemeKind},
    status::ParseError,
};
use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
};
use core::{
    fmt::{self, Write as _},
    ops::Range,
};

/// A byte range into the parsed input, or the absent sentinel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Span {
    start: u32,
    end: u32,
}

const NPOS: u32 = u32::MAX;

impl Span {
    /// The absent sentinel.
    pub const NONE: Self = Self {
        start: NPOS,
        end: NPOS,
    };

    pub(crate) fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end < NPOS as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Checks whether this is the absent sentinel.
    #[must_use]
    pub fn is_none(self) -> bool {
        self.start == NPOS
    }

    /// Checks whether the span is absent or covers no bytes.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.is_none() || self.start == self.end
    }

    /// Returns the byte range, or `None` if absent.
    #[must_use]
    pub fn range(self) -> Option<Range<usize>> {
        (!self.is_none()).then(|| self.start as usize..self.end as usize)
    }

    /// Returns the start offset, or `None` if absent.
    #[must_use]
    pub fn start(self) -> Option<usize> {
        (!self.is_none()).then_some(self.start as usize)
    }

    /// Returns the end offset, or `None` if absent.
    #[must_use]
    pub fn end(self) -> Option<usize> {
        (!self.is_none()).then_some(self.end as usize)
    }

    /// Returns the slice of `src` covered by this span.
    #[must_use]
    pub fn get(self, src: &str) -> Option<&str> {
        self.range().and_then(|r| src.get(r))
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::NONE
    }
}

/// The kind of a parsed host.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum HostKind {
    /// An empty host, as in `file:///etc`.
    #[default]
    Empty,
    /// A registered name of a special scheme, validated as a domain.
    Domain,
    /// A registered name of a non-special scheme.
    Opaque,
    /// A dotted-decimal IPv4 address.
    Ipv4,
    /// A bracketed IPv6 address.
    Ipv6,
    /// A bracketed IPvFuture literal.
    IpvFuture,
}

/// The kind of a parsed path.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum PathKind {
    /// A path made of `/`-separated segments.
    #[default]
    Hierarchical,
    /// The opaque remainder of a URI with no authority and no leading `/`.
    Opaque,
}

/// A group of components copied from a base during relative parsing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Inherit {
    /// The scheme.
    Scheme,
    /// Userinfo, host and port.
    Authority,
    /// The path.
    Path,
    /// The queries.
    Queries,
}

/// The output interface of the parser.
///
/// Every `span` handed to a setter lies within `src` and has been validated
/// for the component it names. Separators (`:`, `@`, `?`, `#`) are never
/// included.
pub trait ComponentStore {
    /// Records the scheme.
    fn set_scheme(&mut self, src: &str, span: Span);
    /// Records the username.
    fn set_username(&mut self, src: &str, span: Span);
    /// Records the password.
    fn set_password(&mut self, src: &str, span: Span);
    /// Records the host. IPv6 and IPvFuture spans include the brackets.
    fn set_host(&mut self, src: &str, span: Span, kind: HostKind);
    /// Records an explicit, non-default port.
    fn set_port(&mut self, src: &str, span: Span, port: u16);
    /// Records the path.
    fn set_path(&mut self, src: &str, span: Span, kind: PathKind);
    /// Records a relative path merged with the directory of the base path.
    fn merge_path(&mut self, base: &OwnedComponents, src: &str, span: Span);
    /// Records the queries.
    fn set_queries(&mut self, src: &str, span: Span);
    /// Records the fragment.
    fn set_fragment(&mut self, src: &str, span: Span);
    /// Copies a group of components from the base.
    fn inherit(&mut self, base: &OwnedComponents, part: Inherit);
    /// Removes the port.
    fn clear_port(&mut self);
    /// Removes every component.
    fn clear(&mut self);

    /// Checks whether a scheme is recorded.
    fn has_scheme(&self) -> bool;
    /// Checks whether a non-empty username is recorded.
    fn has_credentials(&self) -> bool;
    /// Checks whether a password is recorded.
    fn has_password(&self) -> bool;
    /// Checks whether a host (possibly empty) is recorded.
    fn has_host(&self) -> bool;
    /// Checks whether an explicit port is recorded.
    fn has_port(&self) -> bool;
    /// Checks whether a non-empty path is recorded.
    fn has_path(&self) -> bool;
    /// Checks whether queries are recorded.
    fn has_queries(&self) -> bool;
    /// Checks whether a fragment is recorded.
    fn has_fragment(&self) -> bool;
}

/// Components recorded as offsets into the parsed input.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct UriComponents {
    scheme: Span,
    username: Span,
    password: Span,
    host: Span,
    host_kind: HostKind,
    port: Span,
    port_value: u16,
    path: Span,
    path_kind: PathKind,
    queries: Span,
    fragment: Span,
}

impl UriComponents {
    /// Returns the scheme span.
    #[must_use]
    pub fn scheme(&self) -> Span {
        self.scheme
    }

    /// Returns the username span.
    #[must_use]
    pub fn username(&self) -> Span {
        self.username
    }

    /// Returns the password span.
    #[must_use]
    pub fn password(&self) -> Span {
        self.password
    }

    /// Returns the host span.
    #[must_use]
    pub fn host(&self) -> Span {
        self.host
    }

    /// Returns the host kind.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    /// Returns the port span.
    #[must_use]
    pub fn port(&self) -> Span {
        self.port
    }

    /// Returns the explicit port, if any.
    #[must_use]
    pub fn port_value(&self) -> Option<u16> {
        self.has_port().then_some(self.port_value)
    }

    /// Returns the path span.
    #[must_use]
    pub fn path(&self) -> Span {
        self.path
    }

    /// Returns the path kind.
    #[must_use]
    pub fn path_kind(&self) -> PathKind {
        self.path_kind
    }

    /// Returns the queries span.
    #[must_use]
    pub fn queries(&self) -> Span {
        self.queries
    }

    /// Returns the fragment span.
    #[must_use]
    pub fn fragment(&self) -> Span {
        self.fragment
    }

    /// Returns the span from the first byte of the userinfo (or host) to
    /// the end of the port (or host).
    #[must_use]
    pub fn authority(&self) -> Span {
        if self.host.is_none() {
            return Span::NONE;
        }
        let start = self.username.start().unwrap_or(self.host.start as usize);
        let end = self.port.end().unwrap_or(self.host.end as usize);
        Span::new(start, end)
    }

    /// Removes the host together with the userinfo and port.
    pub fn clear_host(&mut self) {
        self.host = Span::NONE;
        self.host_kind = HostKind::Empty;
        self.clear_username();
        self.clear_port();
    }

    /// Removes the username together with the password.
    pub fn clear_username(&mut self) {
        self.username = Span::NONE;
        self.password = Span::NONE;
    }

    /// Removes the queries.
    pub fn clear_queries(&mut self) {
        self.queries = Span::NONE;
    }

    /// Removes the fragment.
    pub fn clear_fragment(&mut self) {
        self.fragment = Span::NONE;
    }
}

impl ComponentStore for UriComponents {
    fn set_scheme(&mut self, _: &str, span: Span) {
        self.scheme = span;
    }

    fn set_username(&mut self, _: &str, span: Span) {
        self.username = span;
    }

    fn set_password(&mut self, _: &str, span: Span) {
        self.password = span;
    }

    fn set_host(&mut self, _: &str, span: Span, kind: HostKind) {
        self.host = span;
        self.host_kind = kind;
    }

    fn set_port(&mut self, _: &str, span: Span, port: u16) {
        self.port = span;
        self.port_value = port;
    }

    fn set_path(&mut self, _: &str, span: Span, kind: PathKind) {
        self.path = span;
        self.path_kind = kind;
    }

    // Offsets cannot refer into another buffer; only the owned store is
    // ever parsed against a base.
    fn merge_path(&mut self, _: &OwnedComponents, src: &str, span: Span) {
        self.set_path(src, span, PathKind::Hierarchical);
    }

    fn set_queries(&mut self, _: &str, span: Span) {
        self.queries = span;
    }

    fn set_fragment(&mut self, _: &str, span: Span) {
        self.fragment = span;
    }

    fn inherit(&mut self, _: &OwnedComponents, _: Inherit) {}

    fn clear_port(&mut self) {
        self.port = Span::NONE;
        self.port_value = 0;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn has_scheme(&self) -> bool {
        !self.scheme.is_none()
    }

    fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    fn has_host(&self) -> bool {
        !self.host.is_none()
    }

    fn has_port(&self) -> bool {
        !self.port.is_none()
    }

    fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    fn has_queries(&self) -> bool {
        !self.queries.is_none()
    }

    fn has_fragment(&self) -> bool {
        !self.fragment.is_none()
    }
}

/// Components copied into owned, canonically encoded strings.
///
/// Storing a component percent-encodes every byte outside the WHATWG
/// encode set of that component, lowercases the scheme and domain hosts,
/// converts non-ASCII domain labels to punycode, compresses IPv6 addresses
/// and removes dot segments from the paths of URIs with a scheme.
///
/// # Examples
///
/// ```
/// use uri_kit::OwnedComponents;
///
/// let c = OwnedComponents::parse("HTTP://a@b@Example.COM:80/x/../y%20z")?;
/// assert_eq!(c.scheme(), Some("http"));
/// assert_eq!(c.username(), "a%40b");
/// assert_eq!(c.host(), Some("example.com"));
/// assert_eq!(c.port(), None);
/// assert_eq!(c.to_string(), "http://a%40b@example.com/y%20z");
/// # Ok::<_, uri_kit::ParseError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct OwnedComponents {
    scheme: Option<String>,
    username: String,
    password: Option<String>,
    host: Option<String>,
    host_kind: HostKind,
    port: Option<u16>,
    path: String,
    path_kind: PathKind,
    queries: Option<String>,
    fragment: Option<String>,
}

impl OwnedComponents {
    /// Parses a URI reference with the default options.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid URI reference.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::parse_with(s, None, ParseOptions::new())
    }

    /// Parses a URI reference against a base.
    ///
    /// Components missing from the reference are taken from the base the way
    /// a browser resolves a link.
    ///
    /// ```
    /// use uri_kit::OwnedComponents;
    ///
    /// let base = OwnedComponents::parse("http://a/b/c/d;p?q")?;
    /// let c = OwnedComponents::parse_with_base("../g?x#s", &base)?;
    /// assert_eq!(c.to_string(), "http://a/b/g?x#s");
    ///
    /// let urn = OwnedComponents::parse("urn:isbn:0451450523")?;
    /// assert!(OwnedComponents::parse_with_base("g", &urn).is_err());
    /// assert_eq!(
    ///     OwnedComponents::parse_with_base("#top", &urn)?.to_string(),
    ///     "urn:isbn:0451450523#top"
    /// );
    /// # Ok::<_, uri_kit::ParseError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid reference against the base.
    pub fn parse_with_base(s: &str, base: &OwnedComponents) -> Result<Self, ParseError> {
        Self::parse_with(s, Some(base), ParseOptions::new())
    }

    /// Parses a URI reference with the given options and optional base.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not valid under the options.
    pub fn parse_with(
        s: &str,
        base: Option<&OwnedComponents>,
        options: ParseOptions,
    ) -> Result<Self, ParseError> {
        let mut out = Self::default();
        parse::parse_into(s, &mut out, base, options)?;
        Ok(out)
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the encoded username, empty if absent.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the encoded password.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the host. IPv6 hosts are bracketed.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the host kind.
    #[must_use]
    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    /// Returns the explicit port.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the explicit port or else the default port of the scheme.
    #[must_use]
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or_else(|| {
            let port = scheme::known_port(self.scheme.as_deref()?);
            (port != 0).then_some(port)
        })
    }

    /// Returns the encoded path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path kind.
    #[must_use]
    pub fn path_kind(&self) -> PathKind {
        self.path_kind
    }

    /// Returns the encoded queries.
    #[must_use]
    pub fn queries(&self) -> Option<&str> {
        self.queries.as_deref()
    }

    /// Returns the encoded fragment.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    fn scheme_kind(&self) -> SchemeKind {
        self.scheme.as_deref().map_or(SchemeKind::None, SchemeKind::of)
    }

    /// Appends the serialization onto the end of `out`.
    pub fn append_to(&self, out: &mut String) {
        if let Some(scheme) = &self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        if let Some(host) = &self.host {
            out.push_str("//");
            if !self.username.is_empty() || self.password.is_some() {
                out.push_str(&self.username);
                if let Some(password) = &self.password {
                    out.push(':');
                    out.push_str(password);
                }
                out.push('@');
            }
            out.push_str(host);
            if let Some(port) = self.port {
                let _ = write!(out, ":{port}");
            }
        } else if self.path.starts_with("//") {
            out.push_str("/.");
        }
        out.push_str(&self.path);
        if let Some(queries) = &self.queries {
            out.push('?');
            out.push_str(queries);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
    }

    fn store_path(&mut self, dir: &str, raw: &str) {
        let kind = self.scheme_kind();
        let mut path = String::with_capacity(dir.len() + raw.len());
        path.push_str(dir);
        let raw: Cow<'_, str> = if kind.is_special() && raw.contains('\\') {
            raw.replace('\\', "/").into()
        } else {
            raw.into()
        };
        pct_enc::encode_to(&mut path, raw.as_bytes(), table::PATH_ENCODE_SET);

        if kind == SchemeKind::File {
            canonicalize_drive_letter(&mut path);
        }
        if self.host.is_some() && !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }
        if self.scheme.is_some() && path.starts_with('/') {
            let mut buf = String::with_capacity(path.len());
            remove_dot_segments(&mut buf, &path);
            path = buf;
        }
        if kind.is_special() && path.is_empty() {
            path.push('/');
        }
        self.path = path;
        self.path_kind = PathKind::Hierarchical;
    }
}

/// Rewrites `/C|/` (or `C|/`) as `/C:/`.
fn canonicalize_drive_letter(path: &mut String) {
    let offset = usize::from(path.starts_with('/'));
    let bytes = path.as_bytes();
    if let [letter, b'|', rest @ ..] = &bytes[offset..] {
        if letter.is_ascii_alphabetic() && matches!(rest.first(), None | Some(b'/')) {
            path.replace_range(offset + 1..offset + 2, ":");
        }
    }
}

fn slice(src: &str, span: Span) -> &str {
    span.get(src).unwrap_or_default()
}

impl ComponentStore for OwnedComponents {
    fn set_scheme(&mut self, src: &str, span: Span) {
        self.scheme = Some(slice(src, span).to_ascii_lowercase());
    }

    fn set_username(&mut self, src: &str, span: Span) {
        self.username = pct_enc::encode(slice(src, span), table::USER_INFO_ENCODE_SET).into_owned();
    }

    fn set_password(&mut self, src: &str, span: Span) {
        let raw = slice(src, span);
        self.password = (!raw.is_empty())
            .then(|| pct_enc::encode(raw, table::USER_INFO_ENCODE_SET).into_owned());
    }

    fn set_host(&mut self, src: &str, span: Span, kind: HostKind) {
        let raw = slice(src, span);
        let host = match kind {
            HostKind::Empty => String::new(),
            HostKind::Domain => {
                let decoded = pct_enc::decode_lossy(raw, pct_enc::Charset::Any)
                    .unwrap_or_else(|_| raw.into());
                punycode::to_ascii(&decoded).unwrap_or_else(|| decoded.to_ascii_lowercase())
            }
            HostKind::Ipv6 => {
                let inner = raw.trim_start_matches('[').trim_end_matches(']');
                match ip::parse_v6(inner.as_bytes()) {
                    Some(addr) => {
                        let mut out = String::with_capacity(raw.len());
                        out.push('[');
                        ip::write_v6(&mut out, addr);
                        out.push(']');
                        out
                    }
                    None => raw.to_owned(),
                }
            }
            HostKind::Ipv4 | HostKind::IpvFuture => raw.to_ascii_lowercase(),
            HostKind::Opaque => pct_enc::encode(raw, table::REG_NAME).into_owned(),
        };
        self.host = Some(host);
        self.host_kind = kind;
    }

    fn set_port(&mut self, _: &str, _: Span, port: u16) {
        self.port = Some(port);
    }

    fn set_path(&mut self, src: &str, span: Span, kind: PathKind) {
        let raw = slice(src, span);
        match kind {
            PathKind::Hierarchical => self.store_path("", raw),
            PathKind::Opaque => {
                self.path = pct_enc::encode(raw, table::C0_CONTROL_ENCODE_SET).into_owned();
                self.path_kind = PathKind::Opaque;
            }
        }
    }

    fn merge_path(&mut self, base: &OwnedComponents, src: &str, span: Span) {
        let dir = match base.path.rfind('/') {
            Some(i) => &base.path[..=i],
            None if base.host.is_some() => "/",
            None => "",
        };
        self.store_path(dir, slice(src, span));
    }

    fn set_queries(&mut self, src: &str, span: Span) {
        let table = if self.scheme_kind().is_special() {
            table::SPECIAL_QUERY_ENCODE_SET
        } else {
            table::QUERY_ENCODE_SET
        };
        self.queries = Some(pct_enc::encode(slice(src, span), table).into_owned());
    }

    fn set_fragment(&mut self, src: &str, span: Span) {
        self.fragment =
            Some(pct_enc::encode(slice(src, span), table::FRAGMENT_ENCODE_SET).into_owned());
    }

    fn inherit(&mut self, base: &OwnedComponents, part: Inherit) {
        match part {
            Inherit::Scheme => self.scheme.clone_from(&base.scheme),
            Inherit::Authority => {
                self.username.clone_from(&base.username);
                self.password.clone_from(&base.password);
                self.host.clone_from(&base.host);
                self.host_kind = base.host_kind;
                self.port = base.port;
            }
            Inherit::Path => {
                self.path.clone_from(&base.path);
                self.path_kind = base.path_kind;
            }
            Inherit::Queries => self.queries.clone_from(&base.queries),
        }
    }

    fn clear_port(&mut self) {
        self.port = None;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn has_scheme(&self) -> bool {
        self.scheme.is_some()
    }

    fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    fn has_password(&self) -> bool {
        self.password.is_some()
    }

    fn has_host(&self) -> bool {
        self.host.is_some()
    }

    fn has_port(&self) -> bool {
        self.port.is_some()
    }

    fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    fn has_queries(&self) -> bool {
        self.queries.is_some()
    }

    fn has_fragment(&self) -> bool {
        self.fragment.is_some()
    }
}

impl fmt::Display for OwnedComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.append_to(&mut buf);
        f.write_str(&buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn span() {
        assert!(Span::NONE.is_none());
        assert!(Span::NONE.is_empty());
        assert_eq!(Span::default(), Span::NONE);
        let s = Span::new(2, 5);
        assert_eq!(s.get("abcdefg"), Some("cde"));
        assert_eq!(s.range(), Some(2..5));
        assert!(Span::new(3, 3).is_empty());
        assert!(!Span::new(3, 3).is_none());
    }

    #[test]
    fn drive_letters() {
        let mut path = "/C|/x".to_string();
        canonicalize_drive_letter(&mut path);
        assert_eq!(path, "/C:/x");

        let mut path = "c|".to_string();
        canonicalize_drive_letter(&mut path);
        assert_eq!(path, "c:");

        let mut path = "/ab|/x".to_string();
        canonicalize_drive_letter(&mut path);
        assert_eq!(path, "/ab|/x");
    }

    #[test]
    fn ports() {
        for (input, expected) in [
            ("foo://h:0/", "foo://h:0/"),
            ("http://h:8080/", "http://h:8080/"),
            ("foo://h:65535", "foo://h:65535"),
        ] {
            let c = OwnedComponents::parse(input).unwrap();
            assert_eq!(c.to_string(), expected, "{input}");
        }
    }

    #[test]
    fn offsets_clear_cascade() {
        let mut c = UriComponents::default();
        c.set_username("", Span::new(7, 8));
        c.set_password("", Span::new(9, 10));
        c.set_host("", Span::new(11, 14), HostKind::Domain);
        c.set_port("", Span::new(15, 19), 8080);
        assert!(c.has_credentials() && c.has_password() && c.has_port());
        assert_eq!(c.authority(), Span::new(7, 19));

        c.clear_host();
        assert!(!c.has_host());
        assert!(!c.has_credentials());
        assert!(!c.has_password());
        assert!(!c.has_port());
        assert_eq!(c.authority(), Span::NONE);
    }
}
