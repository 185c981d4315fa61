use super::Component;
use crate::{
    parse,
    pct_enc::{
        encoder::{Query, QueryPair},
        EStr, EString,
    },
    scheme::SchemeKind,
    status::UriStatus,
};
use alloc::{string::String, vec::Vec};

/// The query component as an ordered multimap of decoded names and values.
///
/// Pairs are split on `&` and on the first `=` of each pair. A pair with an
/// empty value is written back without `=`.
///
/// # Examples
///
/// ```
/// use uri_kit::component::{Component, Queries};
///
/// let mut queries = Queries::parse("tag=a&tag=b&q=%E2%9C%93")?;
/// assert_eq!(queries.get("q"), Some("✓"));
/// assert!(queries.get_all("tag").eq(["a", "b"]));
///
/// queries.set("tag", "c");
/// queries.remove("q");
/// queries.append("flag", "");
/// assert_eq!(queries.to_string(), "tag=c&flag");
/// assert_eq!(queries.raw_string_size(), 10);
/// # Ok::<_, uri_kit::UriStatus>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Queries {
    pairs: Vec<(String, String)>,
}

impl Queries {
    /// Creates an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Checks whether there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the value of the first pair with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the values of every pair with the given name, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Checks whether a pair with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _)| n == name)
    }

    /// Appends a pair.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Sets the value of the first pair with the given name and removes the
    /// others, or appends a pair if there is none.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(n, _)| n == name) {
            Some(i) => {
                self.pairs[i].1 = value;
                let mut j = 0;
                self.pairs.retain(|(n, _)| {
                    let keep = j <= i || n != name;
                    j += 1;
                    keep
                });
            }
            None => self.pairs.push((name.into(), value)),
        }
    }

    /// Removes every pair with the given name and returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|(n, _)| n != name);
        before - self.pairs.len()
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Returns an iterator over the pairs, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the length of the encoded queries without the leading `?`.
    #[must_use]
    pub fn raw_string_size(&self) -> usize {
        self.size()
    }

    /// Encodes the pairs into a query string.
    #[must_use]
    pub fn to_estring(&self) -> EString<Query> {
        let mut buf = EString::new();
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i != 0 {
                buf.push('&');
            }
            buf.encode_data::<QueryPair>(name);
            if !value.is_empty() {
                buf.push('=');
                buf.encode_data::<QueryPair>(value);
            }
        }
        buf
    }
}

fn decode_part(s: &EStr<Query>) -> String {
    s.decode().to_string_lossy().into_owned()
}

impl Component for Queries {
    fn parse(s: &str) -> Result<Self, UriStatus> {
        parse::parse_component(s, UriStatus::ValidQueries, SchemeKind::None)?;
        let s = EStr::<Query>::new(s).ok_or(UriStatus::InvalidPercentEncoding)?;
        let pairs = s
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, EStr::EMPTY));
                (decode_part(name), decode_part(value))
            })
            .collect();
        Ok(Self { pairs })
    }

    fn append_to(&self, out: &mut String, with_separators: bool) {
        if with_separators {
            out.push('?');
        }
        out.push_str(self.to_estring().as_str());
    }

    fn has_value(&self) -> bool {
        !self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Queries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl core::fmt::Display for Queries {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.to_estring(), f)
    }
}
