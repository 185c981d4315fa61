//! Typed URI components.
//!
//! Each wrapper holds the *decoded* value of one component. [`Component::parse`]
//! validates an isolated, percent-encoded component with the matching state
//! of the parser, and [`Component::append_to`] percent-encodes the value
//! back, optionally with the separator that introduces it in a URI.
//!
//! # Examples
//!
//! ```
//! use uri_kit::component::{Component, Host, Queries};
//!
//! // Check a cookie domain in isolation.
//! let host = Host::parse("www.Example.com")?;
//! assert_eq!(host.tld(), Some("com"));
//! assert!(Host::parse("-bad.example").is_err());
//!
//! let mut queries = Queries::parse("a=1&b=x%20y")?;
//! queries.append("c", "&");
//! let mut out = String::new();
//! queries.append_to(&mut out, true);
//! assert_eq!(out, "?a=1&b=x%20y&c=%26");
//! # Ok::<_, uri_kit::UriStatus>(())
//! ```

mod fragment;
mod host;
mod path;
mod port;
mod queries;
mod scheme;
mod userinfo;

pub use fragment::Fragment;
pub use host::{Host, HostData};
pub use path::Path;
pub use port::Port;
pub use queries::Queries;
pub use scheme::Scheme;
pub use userinfo::{Password, UserInfo, Username};

use crate::{
    pct_enc::{self, Charset, Encoder, Table},
    status::UriStatus,
};
use alloc::{borrow::Cow, string::String};

/// A URI component that can be parsed in isolation and serialized back.
pub trait Component: Sized {
    /// Parses a percent-encoded component.
    ///
    /// # Errors
    ///
    /// Returns the status the parser stopped with if the input is not a
    /// valid instance of the component.
    fn parse(s: &str) -> Result<Self, UriStatus>;

    /// Appends the percent-encoded component onto the end of `out`.
    ///
    /// With `with_separators`, the separator that introduces the component
    /// in a URI is written as well.
    fn append_to(&self, out: &mut String, with_separators: bool);

    /// Checks whether the component has a value.
    fn has_value(&self) -> bool;

    /// Returns the length in bytes of the encoded component, without
    /// separators.
    fn size(&self) -> usize {
        let mut buf = String::new();
        self.append_to(&mut buf, false);
        buf.len()
    }
}

/// Encodes decoded data so that every `%` it contains is escaped.
fn push_encoded<E: Encoder>(out: &mut String, data: &str) {
    pct_enc::encode_to(out, data.as_bytes(), E::TABLE.sub_pct_encoded());
}

/// Decodes a component, validating the unencoded bytes against `table`.
fn decode(s: &str, table: Table) -> Result<Cow<'_, str>, UriStatus> {
    pct_enc::decode_lossy(s, Charset::Allowed(table)).map_err(|e| {
        if s.as_bytes().get(e.index()) == Some(&b'%') {
            UriStatus::InvalidPercentEncoding
        } else {
            UriStatus::InvalidCharacter
        }
    })
}
