//! Parse status, warnings and errors.

use core::fmt;

/// The state of a parse, or the reason it stopped.
///
/// The `Valid*` variants other than [`Valid`](Self::Valid) are continuation
/// markers: they name the parser that runs next. `Valid` is the terminal
/// success state. Every other variant is a terminal error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub enum UriStatus {
    /// Nothing has been parsed yet.
    #[default]
    Unparsed,
    /// The whole input was parsed successfully.
    Valid,
    /// The host needs converting to its ASCII (punycode) form.
    ValidPunycode,
    /// The authority (userinfo and host) comes next.
    ValidAuthority,
    /// The host comes next.
    ValidHost,
    /// The port comes next.
    ValidPort,
    /// An opaque path comes next.
    ValidOpaquePath,
    /// A hierarchical path comes next.
    ValidPath,
    /// The queries come next.
    ValidQueries,
    /// The fragment comes next.
    ValidFragment,

    /// A character is not allowed where it appears.
    InvalidCharacter,
    /// A `%` is not followed by two hexadecimal digits.
    InvalidPercentEncoding,
    /// The input is longer than the offsets can address.
    TooLong,
    /// The input is empty.
    EmptyString,
    /// A `:` ends something that is not a valid scheme.
    SchemeEndedUnexpectedly,
    /// A scheme is required, or a relative reference was given against a
    /// base with an opaque path.
    MissingSchemeNonRelativeUrl,
    /// An authority is present but the host is empty where one is required.
    HostMissing,
    /// A bracketed IP literal is malformed.
    InvalidIpLiteral,
    /// The port contains something other than digits.
    PortInvalid,
    /// The port is larger than 65535.
    PortOutOfRange,
    /// Credentials appear where they are not allowed (`file` URIs).
    UnexpectedCredentials,
    /// A port appears where it is not allowed (`file` URIs).
    UnexpectedPort,
    /// A domain label is longer than 63 bytes.
    SubdomainTooLong,
    /// The domain ends with a dot.
    DotAtEnd,
    /// A domain label begins with a hyphen.
    BeginWithHyphen,
    /// A domain label ends with a hyphen.
    EndWithHyphen,
    /// A domain label has hyphens in its third and fourth positions
    /// without being an `xn--` label.
    DoubleHyphen,
    /// A domain contains an empty label.
    EmptySubdomain,
    /// A host label cannot be converted to or from punycode.
    InvalidPunycode,
}

impl UriStatus {
    /// Checks whether this is the terminal success state.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Checks whether this is a continuation marker (or `Unparsed`).
    #[must_use]
    pub fn is_continuation(self) -> bool {
        self.stage().is_some_and(|stage| stage < STAGE_DONE)
    }

    /// Checks whether this is a terminal error.
    #[must_use]
    pub fn is_error(self) -> bool {
        self.stage().is_none()
    }

    /// Returns the position of this marker in parsing order, or `None` for errors.
    pub(crate) fn stage(self) -> Option<u8> {
        Some(match self {
            Self::Unparsed => STAGE_SCHEME,
            Self::ValidAuthority => STAGE_AUTHORITY,
            Self::ValidHost => STAGE_HOST,
            Self::ValidPunycode => STAGE_PUNYCODE,
            Self::ValidPort => STAGE_PORT,
            Self::ValidOpaquePath | Self::ValidPath => STAGE_PATH,
            Self::ValidQueries => STAGE_QUERIES,
            Self::ValidFragment => STAGE_FRAGMENT,
            Self::Valid => STAGE_DONE,
            _ => return None,
        })
    }

    /// Returns a short human-readable description.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unparsed => "not parsed yet",
            Self::Valid => "valid",
            Self::ValidPunycode => "valid so far, host needs punycode conversion",
            Self::ValidAuthority => "valid so far, authority pending",
            Self::ValidHost => "valid so far, host pending",
            Self::ValidPort => "valid so far, port pending",
            Self::ValidOpaquePath => "valid so far, opaque path pending",
            Self::ValidPath => "valid so far, path pending",
            Self::ValidQueries => "valid so far, queries pending",
            Self::ValidFragment => "valid so far, fragment pending",
            Self::InvalidCharacter => "invalid character",
            Self::InvalidPercentEncoding => "invalid percent-encoded octet",
            Self::TooLong => "input too long",
            Self::EmptyString => "empty string",
            Self::SchemeEndedUnexpectedly => "scheme ended unexpectedly",
            Self::MissingSchemeNonRelativeUrl => "missing scheme in a non-relative URL",
            Self::HostMissing => "host missing",
            Self::InvalidIpLiteral => "invalid IP literal",
            Self::PortInvalid => "invalid port",
            Self::PortOutOfRange => "port out of range",
            Self::UnexpectedCredentials => "credentials are not allowed here",
            Self::UnexpectedPort => "a port is not allowed here",
            Self::SubdomainTooLong => "subdomain longer than 63 bytes",
            Self::DotAtEnd => "domain ends with a dot",
            Self::BeginWithHyphen => "domain label begins with a hyphen",
            Self::EndWithHyphen => "domain label ends with a hyphen",
            Self::DoubleHyphen => "domain label has hyphens in the third and fourth positions",
            Self::EmptySubdomain => "empty domain label",
            Self::InvalidPunycode => "invalid punycode",
        }
    }
}

pub(crate) const STAGE_SCHEME: u8 = 0;
pub(crate) const STAGE_AUTHORITY: u8 = 1;
pub(crate) const STAGE_HOST: u8 = 2;
pub(crate) const STAGE_PUNYCODE: u8 = 3;
pub(crate) const STAGE_PORT: u8 = 4;
pub(crate) const STAGE_PATH: u8 = 5;
pub(crate) const STAGE_QUERIES: u8 = 6;
pub(crate) const STAGE_FRAGMENT: u8 = 7;
pub(crate) const STAGE_DONE: u8 = 8;

impl fmt::Display for UriStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(feature = "std")]
impl crate::Error for UriStatus {}

/// Non-terminal problems recorded while parsing.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Warnings(u8);

impl Warnings {
    /// No warnings.
    pub const NONE: Self = Self(0);
    /// A backslash was treated as a path separator in a special-scheme URI.
    pub const REVERSE_SOLIDUS_USED: Self = Self(1);
    /// A special scheme was not followed by `//`.
    pub const MISSING_FOLLOWING_SOLIDUS: Self = Self(1 << 1);
    /// An invalid character was accepted in lenient mode.
    pub const INVALID_CHARACTER: Self = Self(1 << 2);
    /// A malformed `%` sequence was accepted in lenient mode.
    pub const INVALID_PERCENT_ENCODING: Self = Self(1 << 3);
    /// A port equal to the scheme's default was elided.
    pub const DEFAULT_PORT_ELIDED: Self = Self(1 << 4);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::REVERSE_SOLIDUS_USED, "reverse solidus used"),
        (Self::MISSING_FOLLOWING_SOLIDUS, "missing following solidus"),
        (Self::INVALID_CHARACTER, "invalid character"),
        (Self::INVALID_PERCENT_ENCODING, "invalid percent-encoded octet"),
        (Self::DEFAULT_PORT_ELIDED, "default port elided"),
    ];

    /// Checks whether all warnings in `other` are present.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Checks whether there are no warnings.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Returns an iterator over the descriptions of the recorded warnings.
    pub fn messages(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(w, _)| self.contains(*w))
            .map(|(_, name)| name)
    }
}

impl fmt::Debug for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.messages()).finish()
    }
}

/// An error occurred when parsing a URI.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseError {
    pub(crate) index: usize,
    pub(crate) status: UriStatus,
}

impl ParseError {
    /// Returns the index at which parsing stopped.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the terminal error status.
    #[must_use]
    pub fn status(&self) -> UriStatus {
        self.status
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at index {}", self.status, self.index)
    }
}

#[cfg(feature = "std")]
impl crate::Error for ParseError {}
