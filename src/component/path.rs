use super::Component;
use crate::{
    components::PathKind,
    normalize::{normalize_segments, NormalizeOptions},
    parse,
    pct_enc::{
        self,
        encoder::{self, PathSegment},
        Charset, EString,
    },
    scheme::SchemeKind,
    status::UriStatus,
};
use alloc::{string::String, vec::Vec};
use core::ops::DivAssign;

/// A hierarchical path as a sequence of decoded segments.
///
/// An absolute path keeps a leading empty segment implicit: `/a/b/` is
/// absolute with the segments `a`, `b` and an empty last segment.
///
/// # Examples
///
/// ```
/// use uri_kit::{component::{Component, Path}, normalize::NormalizeOptions};
///
/// let mut path = Path::parse("/a/b/../c/")?;
/// assert!(path.is_absolute());
/// assert_eq!(path.segments(), ["a", "b", "..", "c", ""]);
///
/// path.normalize(NormalizeOptions::new());
/// path /= "d e";
/// assert_eq!(path.to_string(), "/a/c/d%20e");
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Path {
    absolute: bool,
    segments: Vec<String>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from decoded segments.
    pub fn from_segments<I, S>(absolute: bool, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            absolute,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a path as it would appear in a URI with the given scheme.
    ///
    /// A backslash separates segments in special schemes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the path is not valid for the scheme.
    pub fn parse_for(s: &str, scheme: SchemeKind) -> Result<Self, UriStatus> {
        let components = parse::parse_component(s, UriStatus::ValidPath, scheme)?;
        debug_assert_eq!(components.path_kind(), PathKind::Hierarchical);

        let special = scheme.is_special();
        let is_sep = |c: char| c == '/' || (special && c == '\\');
        let (absolute, rest) = match s.chars().next() {
            Some(c) if is_sep(c) => (true, &s[1..]),
            _ => (false, s),
        };
        let mut segments = Vec::new();
        if absolute || !rest.is_empty() {
            for seg in rest.split(is_sep) {
                let seg = pct_enc::decode_lossy(seg, Charset::Any)
                    .map_err(|_| UriStatus::InvalidPercentEncoding)?;
                segments.push(seg.into_owned());
            }
        }
        Ok(Self { absolute, segments })
    }

    /// Checks whether the path starts with `/`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Sets whether the path starts with `/`.
    pub fn set_absolute(&mut self, absolute: bool) {
        self.absolute = absolute;
    }

    /// Returns the decoded segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Checks whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the decoded segments.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().map(String::as_str)
    }

    /// Appends a segment, replacing an empty last segment.
    pub fn push(&mut self, segment: impl Into<String>) {
        if self.segments.last().is_some_and(String::is_empty) {
            self.segments.pop();
        }
        self.segments.push(segment.into());
    }

    /// Removes and returns the last segment.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Normalizes the segments in place.
    ///
    /// See [`normalize_segments`] for the rules.
    pub fn normalize(&mut self, options: NormalizeOptions) {
        let segments = core::mem::take(&mut self.segments);
        self.segments = normalize_segments(segments, options);
    }

    /// Removes dot segments the way RFC 3986 section 5.2.4 does.
    pub fn remove_dot_segments(&mut self) {
        self.normalize(NormalizeOptions::new().remove_leading(true));
    }

    /// Encodes the segments into a path.
    #[must_use]
    pub fn to_estring(&self) -> EString<encoder::Path> {
        let mut buf = EString::new();
        if self.absolute {
            buf.push('/');
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if i != 0 {
                buf.push('/');
            }
            buf.encode_data::<PathSegment>(seg);
        }
        buf
    }
}

impl Component for Path {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        Self::parse_for(s, SchemeKind::None)
    }

    /// A path has no separator of its own; `with_separators` is ignored.
    fn append_to(&self, out: &mut String, _: bool) {
        out.push_str(self.to_estring().as_str());
    }

    fn has_value(&self) -> bool {
        self.absolute || !self.segments.is_empty()
    }
}

impl DivAssign<&str> for Path {
    fn div_assign(&mut self, segment: &str) {
        self.push(segment);
    }
}

impl core::fmt::Display for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.to_estring(), f)
    }
}
