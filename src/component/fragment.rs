use super::{push_encoded, Component};
use crate::{
    parse,
    pct_enc::{self, encoder, Charset},
    scheme::SchemeKind,
    status::UriStatus,
};
use alloc::string::String;

/// A decoded fragment.
///
/// ```
/// use uri_kit::component::{Component, Fragment};
///
/// let fragment = Fragment::parse("sec%201")?;
/// assert_eq!(fragment.as_str(), "sec 1");
///
/// let mut out = String::new();
/// fragment.append_to(&mut out, true);
/// assert_eq!(out, "#sec%201");
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Fragment(String);

impl Fragment {
    /// Creates a fragment from decoded data.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the decoded fragment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Component for Fragment {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        parse::parse_component(s, UriStatus::ValidFragment, SchemeKind::None)?;
        pct_enc::decode_lossy(s, Charset::Any)
            .map(|s| Self(s.into_owned()))
            .map_err(|_| UriStatus::InvalidPercentEncoding)
    }

    fn append_to(&self, out: &mut String, with_separators: bool) {
        if with_separators {
            out.push('#');
        }
        push_encoded::<encoder::Fragment>(out, &self.0);
    }

    fn has_value(&self) -> bool {
        !self.0.is_empty()
    }
}
