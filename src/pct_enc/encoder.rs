//! Encoders binding a [`Table`] to a URI component.
//!
//! The tables used for decoding validation are the strict RFC 3986 ones;
//! the tables used for re-encoding decoded data exclude the delimiters
//! of the enclosing component so that data can never be mistaken for them.

use super::{table, Encoder, Table};

/// An encoder for the userinfo subcomponent (username and password).
#[derive(Clone, Copy, Debug)]
pub struct Userinfo;

impl Encoder for Userinfo {
    const TABLE: Table = table::USERINFO;
}

/// An encoder for a single username or password, which may not contain `':'`.
#[derive(Clone, Copy, Debug)]
pub struct Credential;

impl Encoder for Credential {
    const TABLE: Table = table::USERINFO.sub(Table::new(b":"));
}

/// An encoder for registered names.
#[derive(Clone, Copy, Debug)]
pub struct RegName;

impl Encoder for RegName {
    const TABLE: Table = table::REG_NAME;
}

/// An encoder for the path component.
#[derive(Clone, Copy, Debug)]
pub struct Path;

impl Encoder for Path {
    const TABLE: Table = table::PATH;
}

/// An encoder for a single path segment, which may not contain `'/'`.
#[derive(Clone, Copy, Debug)]
pub struct PathSegment;

impl Encoder for PathSegment {
    const TABLE: Table = table::PCHAR;
}

/// An encoder for the query component.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Encoder for Query {
    const TABLE: Table = table::QUERY;
}

/// An encoder for a name or value inside `name=value` query pairs.
#[derive(Clone, Copy, Debug)]
pub struct QueryPair;

impl Encoder for QueryPair {
    const TABLE: Table = table::QUERY.sub(Table::new(b"&=+"));
}

/// An encoder for the fragment component.
#[derive(Clone, Copy, Debug)]
pub struct Fragment;

impl Encoder for Fragment {
    const TABLE: Table = table::FRAGMENT;
}

/// An encoder for arbitrary data, preserving only unreserved characters.
#[derive(Clone, Copy, Debug)]
pub struct Data;

impl Encoder for Data {
    const TABLE: Table = table::UNRESERVED.or_pct_encoded();
}
