//! Reference resolution as in RFC 3986 section 5.2.

use crate::{
    normalize::remove_dot_segments, parse::ParseOptions, scheme::is_special_scheme,
    uri::UriString,
};
use alloc::{borrow::Cow, string::String};
use core::fmt;

/// An error occurred when resolving a URI reference.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveError {
    /// The base has no scheme.
    BaseNotAbsolute,
    /// The base is not a valid URI.
    InvalidBase,
    /// The reference is not a valid URI reference.
    InvalidReference,
    /// A relative reference other than a lone fragment was given against a
    /// base with an opaque path.
    InvalidReferenceAgainstOpaqueBase,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::BaseNotAbsolute => "base URI without a scheme",
            Self::InvalidBase => "invalid base URI",
            Self::InvalidReference => "invalid URI reference",
            Self::InvalidReferenceAgainstOpaqueBase => {
                "relative reference against a base with an opaque path"
            }
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl crate::Error for ResolveError {}

/// The raw components of a valid URI reference.
pub(crate) struct Parts<'a> {
    pub(crate) scheme: Option<&'a str>,
    /// Everything between `//` and the path.
    pub(crate) authority: Option<&'a str>,
    pub(crate) path: &'a str,
    pub(crate) query: Option<&'a str>,
    pub(crate) fragment: Option<&'a str>,
}

impl Parts<'static> {
    /// The parts of an empty reference, which refers to the base itself.
    pub(crate) const EMPTY: Self = Parts {
        scheme: None,
        authority: None,
        path: "",
        query: None,
        fragment: None,
    };
}

impl Parts<'_> {
    fn has_opaque_path(&self) -> bool {
        self.authority.is_none() && !self.path.is_empty() && !self.path.starts_with('/')
    }

    /// Checks whether nothing but a fragment is present.
    fn is_fragment_only(&self) -> bool {
        self.scheme.is_none()
            && self.authority.is_none()
            && self.path.is_empty()
            && self.query.is_none()
    }
}

pub(crate) fn resolve(
    base: &Parts<'_>,
    reference: &Parts<'_>,
    options: ParseOptions,
) -> Result<UriString, ResolveError> {
    let Some(base_scheme) = base.scheme else {
        return Err(ResolveError::BaseNotAbsolute);
    };
    if base.has_opaque_path() && !reference.is_fragment_only() && reference.scheme.is_none() {
        return Err(ResolveError::InvalidReferenceAgainstOpaqueBase);
    }

    let mut path = String::new();
    let (scheme, authority, query);

    if let Some(ref_scheme) = reference.scheme {
        (scheme, authority, query) = (ref_scheme, reference.authority, reference.query);
        remove_dot_segments(&mut path, &slashed(ref_scheme, reference.path));
    } else {
        scheme = base_scheme;
        let ref_path = slashed(base_scheme, reference.path);
        if reference.authority.is_some() {
            (authority, query) = (reference.authority, reference.query);
            remove_dot_segments(&mut path, &ref_path);
        } else {
            authority = base.authority;
            if ref_path.is_empty() {
                path.push_str(&slashed(base_scheme, base.path));
                query = reference.query.or(base.query);
            } else {
                if ref_path.starts_with('/') {
                    remove_dot_segments(&mut path, &ref_path);
                } else {
                    let base_path = slashed(base_scheme, base.path);
                    remove_dot_segments(&mut path, &merge(base.authority, &base_path, &ref_path));
                }
                query = reference.query;
            }
        }
    }

    let mut buf = String::with_capacity(
        scheme.len()
            + authority.map_or(0, |a| a.len() + 2)
            + path.len()
            + query.map_or(0, |q| q.len() + 1)
            + reference.fragment.map_or(0, |f| f.len() + 1)
            + 3,
    );
    buf.push_str(scheme);
    buf.push(':');
    if let Some(authority) = authority {
        buf.push_str("//");
        buf.push_str(authority);
    } else if path.starts_with("//") {
        // Keep the path from reading as an authority.
        buf.push_str("/.");
    }
    buf.push_str(&path);
    if let Some(query) = query {
        buf.push('?');
        buf.push_str(query);
    }
    if let Some(fragment) = reference.fragment {
        buf.push('#');
        buf.push_str(fragment);
    }

    UriString::parse_with(buf, options).map_err(|_| ResolveError::InvalidReference)
}

/// Turns backslashes into slashes in a path under a special scheme.
fn slashed<'a>(scheme: &str, path: &'a str) -> Cow<'a, str> {
    if is_special_scheme(scheme) && path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Merges a relative-path reference with the path of the base.
fn merge(base_authority: Option<&str>, base_path: &str, path: &str) -> String {
    let mut out = String::with_capacity(base_path.len() + path.len() + 1);
    if base_authority.is_some() && base_path.is_empty() {
        out.push('/');
    } else if let Some(i) = base_path.rfind('/') {
        out.push_str(&base_path[..=i]);
    }
    out.push_str(path);
    out
}
