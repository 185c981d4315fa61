//! Classification of special schemes.
//!
//! Special schemes are `http`, `https`, `ws`, `wss`, `ftp` and `file`.
//! They change how the authority is introduced, whether a backslash
//! separates path segments and whether a default port is elided.

use crate::pct_enc::table;

const KNOWN_PORTS: [(&str, u16); 5] = [
    ("ws", 80),
    ("wss", 443),
    ("http", 80),
    ("https", 443),
    ("ftp", 21),
];

/// Returns the default port of a scheme, or `0` if it has none.
///
/// The scheme is compared case-insensitively.
///
/// ```
/// use uri_kit::scheme::known_port;
///
/// assert_eq!(known_port("HTTPS"), 443);
/// assert_eq!(known_port("ftp"), 21);
/// assert_eq!(known_port("file"), 0);
/// assert_eq!(known_port("gopher"), 0);
/// ```
#[must_use]
pub fn known_port(scheme: &str) -> u16 {
    KNOWN_PORTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(scheme))
        .map_or(0, |&(_, port)| port)
}

/// Checks whether the scheme is `file`, case-insensitively.
#[must_use]
pub fn is_file_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("file")
}

/// Checks whether the scheme is special.
#[must_use]
pub fn is_special_scheme(scheme: &str) -> bool {
    known_port(scheme) != 0 || is_file_scheme(scheme)
}

/// Checks whether the string is a syntactically valid scheme.
///
/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
#[must_use]
pub const fn is_valid_scheme(s: &str) -> bool {
    matches!(s.as_bytes(), [first, rem @ ..]
        if first.is_ascii_alphabetic() && table::SCHEME.matches(rem))
}

/// The parsing behavior selected by a scheme.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SchemeKind {
    /// No scheme has been seen (relative reference).
    #[default]
    None,
    /// A scheme that is not special.
    Other,
    /// A special scheme other than `file`, with its default port.
    Special(u16),
    /// The `file` scheme.
    File,
}

impl SchemeKind {
    /// Classifies a scheme.
    #[must_use]
    pub fn of(scheme: &str) -> Self {
        if is_file_scheme(scheme) {
            return Self::File;
        }
        match known_port(scheme) {
            0 => Self::Other,
            port => Self::Special(port),
        }
    }

    /// Checks whether the scheme is special (including `file`).
    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, Self::Special(_) | Self::File)
    }

    /// Returns the default port, or `0` if there is none.
    #[must_use]
    pub fn default_port(self) -> u16 {
        match self {
            Self::Special(port) => port,
            _ => 0,
        }
    }
}
