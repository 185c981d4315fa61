use super::Component;
use crate::{parse, status::UriStatus};
use alloc::string::{String, ToString};

/// A port. An empty port has no value.
///
/// ```
/// use uri_kit::component::{Component, Port};
///
/// assert_eq!(Port::parse("8080")?.value(), Some(8080));
/// assert_eq!(Port::parse("")?.value(), None);
/// assert_eq!(Port::parse("65536"), Err(uri_kit::UriStatus::PortOutOfRange));
/// assert_eq!(Port::parse("8o"), Err(uri_kit::UriStatus::PortInvalid));
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Port(Option<u16>);

impl Port {
    /// Creates a port.
    #[must_use]
    pub fn new(value: Option<u16>) -> Self {
        Self(value)
    }

    /// Returns the port number.
    #[must_use]
    pub fn value(self) -> Option<u16> {
        self.0
    }

    /// Returns the port number, or `default` if there is none.
    #[must_use]
    pub fn value_or(self, default: u16) -> u16 {
        self.0.unwrap_or(default)
    }
}

impl From<u16> for Port {
    fn from(value: u16) -> Self {
        Self(Some(value))
    }
}

impl Component for Port {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        if s.is_empty() {
            return Ok(Self(None));
        }
        parse::parse_port_digits(s.as_bytes())
            .map(|port| Self(Some(port)))
            .map_err(|(_, status)| status)
    }

    fn append_to(&self, out: &mut String, with_separators: bool) {
        if let Some(port) = self.0 {
            if with_separators {
                out.push(':');
            }
            out.push_str(&port.to_string());
        }
    }

    fn has_value(&self) -> bool {
        self.0.is_some()
    }
}
