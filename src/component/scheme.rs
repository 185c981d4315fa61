use super::Component;
use crate::{
    scheme::{self, SchemeKind},
    status::UriStatus,
};
use alloc::string::String;

/// A scheme, lowercased.
///
/// ```
/// use uri_kit::component::{Component, Scheme};
///
/// let scheme = Scheme::parse("HTTPS")?;
/// assert_eq!(scheme.as_str(), "https");
/// assert_eq!(scheme.default_port(), Some(443));
/// assert!(Scheme::parse("1ab").is_err());
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Scheme {
    name: String,
}

impl Scheme {
    /// Returns the scheme as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Returns the parsing behavior selected by the scheme.
    #[must_use]
    pub fn kind(&self) -> SchemeKind {
        if self.name.is_empty() {
            SchemeKind::None
        } else {
            SchemeKind::of(&self.name)
        }
    }

    /// Checks whether the scheme is special.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.kind().is_special()
    }

    /// Returns the default port of the scheme.
    #[must_use]
    pub fn default_port(&self) -> Option<u16> {
        match scheme::known_port(&self.name) {
            0 => None,
            port => Some(port),
        }
    }
}

impl Component for Scheme {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        if s.is_empty() {
            return Err(UriStatus::EmptyString);
        }
        if !scheme::is_valid_scheme(s) {
            return Err(UriStatus::InvalidCharacter);
        }
        Ok(Self {
            name: s.to_ascii_lowercase(),
        })
    }

    fn append_to(&self, out: &mut String, with_separators: bool) {
        out.push_str(&self.name);
        if with_separators && !self.name.is_empty() {
            out.push(':');
        }
    }

    fn has_value(&self) -> bool {
        !self.name.is_empty()
    }

    fn size(&self) -> usize {
        self.name.len()
    }
}
