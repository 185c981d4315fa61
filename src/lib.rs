#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! A lazy, resumable URI parser with WHATWG-style special schemes and
//! RFC 3986 reference resolution.
//!
//! The parser is a state machine driven by [`UriStatus`]. Each state consumes
//! one component and names the next, so a parse can stop after any component
//! and pick up later. [`Uri`] relies on this to parse only as far as each
//! accessor needs.
//!
//! Schemes are split into two groups. The *special* schemes `http`, `https`,
//! `ws`, `wss`, `ftp` and `file` always have a host, accept `\` as a path
//! separator, have their registered names validated as domains and have a
//! port equal to their default elided. Every other scheme follows the
//! generic syntax of [RFC 3986].
//!
//! [RFC 3986]: https://datatracker.ietf.org/doc/html/rfc3986/
//!
//! # Examples
//!
//! ```
//! use uri_kit::UriString;
//!
//! let mut uri = UriString::parse("HTTP://user@Example.com:80/a/./b/../c?q=1#top")?;
//! assert_eq!(uri.scheme(), Some("HTTP"));
//! assert_eq!(uri.port(), None);
//! assert_eq!(uri.port_uint16(), 80);
//! assert_eq!(uri.to_canonical(), "http://user@example.com/a/c?q=1#top");
//!
//! let mut queries = uri.queries().unwrap_or_default();
//! queries.append("lang", "en");
//! uri.set_query_pairs(&queries)?;
//! uri.set_fragment(None)?;
//! assert_eq!(uri.as_str(), "HTTP://user@Example.com:80/a/./b/../c?q=1&lang=en");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! # Feature flags
//!
//! - `std` (default): [`Error`] implementations for the error types.
//! - `serde`: `Serialize` and `Deserialize` for [`Uri`].
//! - `log`: logs parse failures and soft warnings at the `debug` level and
//!   rejected edits at the `warn` level through the [`log`] facade.
//!
//! [`Error`]: std::error::Error
//! [`log`]: https://docs.rs/log

extern crate alloc;

#[cfg(feature = "std")]
use std::error::Error;

mod log;

pub mod component;
pub mod components;
pub mod ip;
pub mod normalize;
pub mod pct_enc;
pub mod punycode;
pub mod scheme;

mod fmt;
mod parse;
mod resolve;
mod status;
mod uri;

pub use components::{ComponentStore, OwnedComponents, UriComponents};
pub use parse::ParseOptions;
pub use resolve::ResolveError;
pub use status::{ParseError, UriStatus, Warnings};
pub use uri::{Uri, UriString};
