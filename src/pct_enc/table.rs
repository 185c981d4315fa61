//! Byte pattern tables from RFC 3986 and the WHATWG URL Standard.
//!
//! The RFC 3986 constants are documented with the ABNF notation of [RFC 5234].
//!
//! The WHATWG [percent-encode sets] name the bytes that *must* be encoded;
//! the `*_ENCODE_SET` constants below are their complements, i.e. they name
//! the bytes that are left as they are. Non-ASCII bytes are never allowed
//! and are always percent-encoded byte by byte.
//!
//! [RFC 5234]: https://datatracker.ietf.org/doc/html/rfc5234
//! [percent-encode sets]: https://url.spec.whatwg.org/#percent-encoded-bytes

use crate::pct_enc;

/// A set of unencoded ASCII bytes, plus a flag for `%XX` triplets.
///
/// Membership is a single bit test. `%` itself is never a member; whether
/// it may start a percent-encoded octet is tracked separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Table {
    ascii: u128,
    pct_encoded: bool,
}

impl Table {
    /// Creates a table allowing exactly the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if a byte is `%` or not ASCII.
    #[must_use]
    pub const fn new(mut bytes: &[u8]) -> Self {
        let mut ascii = 0u128;
        while let [x, rest @ ..] = bytes {
            assert!(*x < 128 && *x != b'%', "cannot allow non-ASCII byte or %");
            ascii |= 1 << *x;
            bytes = rest;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    /// Creates a table allowing the bytes in `lo..=hi`, `%` excepted.
    ///
    /// # Panics
    ///
    /// Panics if `hi` is not ASCII.
    #[must_use]
    pub const fn range(lo: u8, hi: u8) -> Self {
        assert!(hi < 128, "cannot allow non-ASCII byte");
        let mut ascii = 0u128;
        let mut x = lo;
        while x <= hi {
            if x != b'%' {
                ascii |= 1 << x;
            }
            x += 1;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    /// Returns the union of two tables.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self {
            ascii: self.ascii | other.ascii,
            pct_encoded: self.pct_encoded || other.pct_encoded,
        }
    }

    /// Returns the table with `%XX` triplets allowed.
    #[must_use]
    pub const fn or_pct_encoded(self) -> Self {
        Self {
            ascii: self.ascii,
            pct_encoded: true,
        }
    }

    /// Returns the table with `%XX` triplets disallowed.
    #[must_use]
    pub const fn sub_pct_encoded(self) -> Self {
        Self {
            ascii: self.ascii,
            pct_encoded: false,
        }
    }

    /// Returns what `self` allows and `other` does not.
    #[must_use]
    pub const fn sub(self, other: Self) -> Self {
        Self {
            ascii: self.ascii & !other.ascii,
            pct_encoded: self.pct_encoded && !other.pct_encoded,
        }
    }

    /// Checks whether `other` allows everything `self` allows.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.ascii & !other.ascii == 0 && (!self.pct_encoded || other.pct_encoded)
    }

    /// Checks whether an unencoded byte is allowed. Never true for `%`.
    #[inline]
    #[must_use]
    pub const fn allows_byte(self, x: u8) -> bool {
        x < 128 && (self.ascii >> x) & 1 != 0
    }

    /// Checks whether an unencoded character is allowed.
    #[inline]
    #[must_use]
    pub const fn allows(self, ch: char) -> bool {
        ch.is_ascii() && self.allows_byte(ch as u8)
    }

    /// Checks whether `%XX` triplets are allowed.
    #[inline]
    #[must_use]
    pub const fn allows_pct_encoded(self) -> bool {
        self.pct_encoded
    }

    /// Validates `s` against the table.
    ///
    /// On failure, returns the index of the first rejected byte, which is the
    /// `%` itself for a malformed triplet.
    pub const fn validate(self, s: &[u8]) -> Result<(), usize> {
        let mut i = 0;
        while i < s.len() {
            i += if self.allows_byte(s[i]) {
                1
            } else if s[i] == b'%'
                && self.pct_encoded
                && i + 2 < s.len()
                && pct_enc::is_hexdig_pair(s[i + 1], s[i + 2])
            {
                3
            } else {
                return Err(i);
            };
        }
        Ok(())
    }

    /// Checks whether `s` is valid for the table.
    #[must_use]
    pub const fn matches(self, s: &[u8]) -> bool {
        self.validate(s).is_ok()
    }
}

const fn new(bytes: &[u8]) -> Table {
    Table::new(bytes)
}

// Rules from RFC 3986:

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = Table::range(b'A', b'Z').or(Table::range(b'a', b'z'));

/// `DIGIT = %x30-39`
pub const DIGIT: Table = Table::range(b'0', b'9');

/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`
pub const HEXDIG: Table = DIGIT.or(Table::range(b'A', b'F')).or(Table::range(b'a', b'f'));

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub const SCHEME: Table = ALPHA.or(DIGIT).or(new(b"+-."));

/// `userinfo = *( unreserved / pct-encoded / sub-delims / ":" )`
pub const USERINFO: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":")).or_pct_encoded();

/// `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`
pub const IPV_FUTURE: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":"));

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS).or_pct_encoded();

/// `path = *( pchar / "/" )`
pub const PATH: Table = PCHAR.or(new(b"/"));

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub const PCHAR: Table = UNRESERVED.or(SUB_DELIMS).or(new(b":@")).or_pct_encoded();

/// `query = *( pchar / "/" / "?" )`
pub const QUERY: Table = PCHAR.or(new(b"/?"));

/// `fragment = *( pchar / "/" / "?" )`
pub const FRAGMENT: Table = QUERY;

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(new(b"-._~"));

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")"
///             / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = new(b"!$&'()*+,;=");

// WHATWG percent-encode sets, as the bytes they leave alone:

/// Complement of the C0 control percent-encode set: `U+0020` to `U+007E`.
pub const C0_CONTROL_ENCODE_SET: Table = Table::range(0x20, 0x7e).or_pct_encoded();

/// Complement of the fragment percent-encode set.
pub const FRAGMENT_ENCODE_SET: Table = C0_CONTROL_ENCODE_SET.sub(new(b" \"<>`"));

/// Complement of the query percent-encode set.
pub const QUERY_ENCODE_SET: Table = C0_CONTROL_ENCODE_SET.sub(new(b" \"#<>"));

/// Complement of the special-query percent-encode set.
pub const SPECIAL_QUERY_ENCODE_SET: Table = QUERY_ENCODE_SET.sub(new(b"'"));

/// Complement of the path percent-encode set.
pub const PATH_ENCODE_SET: Table = QUERY_ENCODE_SET.sub(new(b"?`{}"));

/// Complement of the userinfo percent-encode set.
pub const USER_INFO_ENCODE_SET: Table = PATH_ENCODE_SET.sub(new(b"/:;=@[\\]^|"));

/// Complement of the component percent-encode set.
///
/// Unlike the other sets, `%` itself is always encoded here.
pub const COMPONENT_ENCODE_SET: Table = USER_INFO_ENCODE_SET
    .sub(new(b"$&+,"))
    .sub_pct_encoded();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_sets() {
        assert!(UNRESERVED.allows('~'));
        assert!(!UNRESERVED.allows('!'));
        assert!(PCHAR.allows('@') && PCHAR.allows(':'));
        assert!(!PCHAR.allows('/'));
        assert!(PATH.allows('/'));
        assert!(QUERY.allows('?') && !QUERY.allows('#'));
        assert!(!REG_NAME.allows(':'));
        assert!(!SCHEME.allows('_'));
        assert!(!ALPHA.allows('é'));
        assert!(PCHAR.is_subset(QUERY));
        assert!(!QUERY.is_subset(PCHAR));
    }

    #[test]
    fn whatwg_sets() {
        assert!(C0_CONTROL_ENCODE_SET.allows(' '));
        assert!(!C0_CONTROL_ENCODE_SET.allows('\u{1f}'));
        assert!(!C0_CONTROL_ENCODE_SET.allows('\u{7f}'));
        assert!(!FRAGMENT_ENCODE_SET.allows('`'));
        assert!(FRAGMENT_ENCODE_SET.allows('#'));
        assert!(!QUERY_ENCODE_SET.allows('#'));
        assert!(QUERY_ENCODE_SET.allows('\''));
        assert!(!SPECIAL_QUERY_ENCODE_SET.allows('\''));
        assert!(!PATH_ENCODE_SET.allows('?'));
        assert!(PATH_ENCODE_SET.allows('/'));
        assert!(!USER_INFO_ENCODE_SET.allows('@'));
        assert!(!USER_INFO_ENCODE_SET.allows(':'));
        assert!(USER_INFO_ENCODE_SET.allows_pct_encoded());
        assert!(!COMPONENT_ENCODE_SET.allows('+'));
        assert!(!COMPONENT_ENCODE_SET.allows_pct_encoded());
    }

    #[test]
    fn validate() {
        assert_eq!(PATH.validate(b"/a/b%20c"), Ok(()));
        assert_eq!(PATH.validate(b"/a b"), Err(2));
        assert_eq!(PATH.validate(b"%2"), Err(0));
        assert_eq!(PATH.validate(b"x%G1"), Err(1));
        assert_eq!(UNRESERVED.validate(b"%41"), Err(0));
        assert!(Table::range(b'a', b'c').matches(b"abc"));
        assert!(!Table::range(b'a', b'c').matches(b"d"));
    }
}
