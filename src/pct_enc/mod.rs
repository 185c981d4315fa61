//! Percent-encoding utilities.
//!
//! Encoded octets are always written as `%` followed by two uppercase
//! hexadecimal digits. Decoding accepts either letter case, and fails hard on
//! a `%` that is not followed by two hexadecimal digits.
//!
//! The free functions work on plain strings with a [`Table`] or a
//! [`Charset`]. [`EStr`] and [`EString`] carry the table in their type
//! through an [`Encoder`].

pub mod encoder;
mod estring;
pub mod table;

pub use estring::EString;
pub use table::Table;

use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
    vec::Vec,
};
use core::{fmt, hash, iter::FusedIterator, marker::PhantomData, str};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A table bound to a type, used by [`EStr`] and [`EString`].
///
/// # Sub-encoders
///
/// `SubE` is a sub-encoder of `E` when `SubE::TABLE` is a [subset] of
/// `E::TABLE`. Data encoded with a sub-encoder is always valid for `E`.
///
/// [subset]: Table::is_subset
pub trait Encoder: 'static {
    /// The bytes left unencoded.
    const TABLE: Table;
}

struct SubEncoder<L, R>(PhantomData<(L, R)>);

impl<L: Encoder, R: Encoder> SubEncoder<L, R> {
    const CHECK: () = assert!(L::TABLE.is_subset(R::TABLE), "not a sub-encoder");
}

/// Returns the value of a hexadecimal digit.
pub(crate) const fn hex_value(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'A'..=b'F' => Some(x - b'A' + 10),
        b'a'..=b'f' => Some(x - b'a' + 10),
        _ => None,
    }
}

pub(crate) const fn is_hexdig_pair(hi: u8, lo: u8) -> bool {
    hex_value(hi).is_some() && hex_value(lo).is_some()
}

/// Reads the octet of a `%XX` triplet starting at `i`.
fn octet_at(s: &[u8], i: usize) -> Option<u8> {
    match (s.get(i + 1), s.get(i + 2)) {
        (Some(&hi), Some(&lo)) => Some(hex_value(hi)? << 4 | hex_value(lo)?),
        _ => None,
    }
}

static PCT_TRIPLETS: [u8; 256 * 3] = {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = [0; 256 * 3];
    let mut i = 0;
    while i < 256 {
        out[i * 3] = b'%';
        out[i * 3 + 1] = HEX[i >> 4];
        out[i * 3 + 2] = HEX[i & 0xf];
        i += 1;
    }
    out
};

/// Returns the `%XX` triplet of a byte.
pub(crate) fn encode_byte(x: u8) -> &'static str {
    let i = usize::from(x) * 3;
    // The table is ASCII.
    str::from_utf8(&PCT_TRIPLETS[i..i + 3]).unwrap_or_default()
}

/// Returns how many bytes at `i` may be copied as they are.
fn unencoded_len(table: Table, s: &[u8], i: usize) -> usize {
    let x = s[i];
    if table.allows_byte(x) {
        1
    } else if x == b'%' && table.allows_pct_encoded() && octet_at(s, i).is_some() {
        3
    } else {
        0
    }
}

/// Percent-encodes every byte of `input` not allowed by `table`.
///
/// When the table allows percent-encoded octets, a well-formed `%XX` triplet
/// is kept and a stray `%` becomes `%25`. Multi-byte UTF-8 sequences are
/// encoded octet by octet. Allocates only when something needs encoding.
///
/// ```
/// use uri_kit::pct_enc::{encode, table};
///
/// assert_eq!(encode("a b/ü", table::PATH_ENCODE_SET), "a%20b/%C3%BC");
/// assert_eq!(encode("50%", table::PATH_ENCODE_SET), "50%25");
/// assert_eq!(encode("%41", table::COMPONENT_ENCODE_SET), "%2541");
/// ```
#[must_use]
pub fn encode(input: &str, table: Table) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match unencoded_len(table, bytes, i) {
            0 => {
                let mut buf = String::with_capacity(input.len() + 8);
                buf.push_str(&input[..i]);
                encode_to(&mut buf, &bytes[i..], table);
                return Cow::Owned(buf);
            }
            n => i += n,
        }
    }
    Cow::Borrowed(input)
}

/// Percent-encodes `input` onto the end of `out`, with the same rules as
/// [`encode`].
pub fn encode_to(out: &mut String, input: &[u8], table: Table) {
    let mut i = 0;
    while i < input.len() {
        let n = unencoded_len(table, input, i);
        if n == 0 {
            out.push_str(encode_byte(input[i]));
            i += 1;
        } else {
            // Unencoded bytes are ASCII.
            out.extend(input[i..i + n].iter().map(|&x| char::from(x)));
            i += n;
        }
    }
}

/// The character policy applied to unencoded bytes while decoding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Charset {
    /// Every unencoded byte is accepted.
    Any,
    /// Only unencoded bytes allowed by the table are accepted.
    Allowed(Table),
    /// Unencoded bytes allowed by the table are rejected.
    Disallowed(Table),
}

impl Charset {
    fn accepts(self, x: u8) -> bool {
        match self {
            Self::Any => true,
            Self::Allowed(t) => t.allows_byte(x),
            Self::Disallowed(t) => !t.allows_byte(x),
        }
    }
}

/// An error occurred when decoding a percent-encoded string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeError {
    index: usize,
}

impl DecodeError {
    /// Returns the index of the malformed `%` or of the rejected byte.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid percent-encoded string at index {}", self.index)
    }
}

#[cfg(feature = "std")]
impl crate::Error for DecodeError {}

/// Decodes `input` onto the end of `out`, validating every unencoded byte
/// against `charset`.
///
/// # Errors
///
/// Returns `Err` if a `%` is not followed by two hexadecimal digits or if an
/// unencoded byte is rejected by `charset`. `out` is then truncated back to
/// its length before the call.
pub fn decode_to(out: &mut Vec<u8>, input: &[u8], charset: Charset) -> Result<(), DecodeError> {
    let start_len = out.len();
    let mut i = 0;
    while i < input.len() {
        let x = input[i];
        let step = if x == b'%' {
            octet_at(input, i).map(|octet| (octet, 3))
        } else {
            charset.accepts(x).then_some((x, 1))
        };
        let Some((octet, n)) = step else {
            out.truncate(start_len);
            return Err(DecodeError { index: i });
        };
        out.push(octet);
        i += n;
    }
    Ok(())
}

/// Decodes `input`, validating every unencoded byte against `charset`.
///
/// Allocates only when `input` contains a `%`.
///
/// # Errors
///
/// See [`decode_to`].
pub fn decode_with(input: &str, charset: Charset) -> Result<Cow<'_, [u8]>, DecodeError> {
    if !input.contains('%') {
        return match input.bytes().position(|x| !charset.accepts(x)) {
            Some(index) => Err(DecodeError { index }),
            None => Ok(Cow::Borrowed(input.as_bytes())),
        };
    }
    let mut buf = Vec::with_capacity(input.len());
    decode_to(&mut buf, input.as_bytes(), charset)?;
    Ok(Cow::Owned(buf))
}

/// Decodes `input` without restricting the unencoded bytes.
///
/// ```
/// use uri_kit::pct_enc::decode;
///
/// assert_eq!(*decode("a%2Fb%2f").unwrap(), *b"a/b/");
/// assert!(decode("%2").is_err());
/// assert!(decode("%G1").is_err());
/// ```
///
/// # Errors
///
/// Returns `Err` if a `%` is not followed by two hexadecimal digits.
pub fn decode(input: &str) -> Result<Cow<'_, [u8]>, DecodeError> {
    decode_with(input, Charset::Any)
}

/// Decodes `input` to a string, replacing invalid UTF-8 with `U+FFFD`.
///
/// # Errors
///
/// Returns `Err` if a `%` is not followed by two hexadecimal digits or if an
/// unencoded byte is rejected by `charset`.
pub fn decode_lossy(input: &str, charset: Charset) -> Result<Cow<'_, str>, DecodeError> {
    Ok(match decode_with(input, charset)? {
        Cow::Borrowed(_) => Cow::Borrowed(input),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

/// A string slice known to be percent-encoded with the table of `E`.
///
/// Every byte is either allowed by `E::TABLE`, or is part of a `%XX`
/// triplet when the table allows percent-encoded octets.
/// The owned counterpart is [`EString`].
///
/// ```
/// use uri_kit::pct_enc::{encoder::Query, EStr};
///
/// let query = EStr::<Query>::new_or_panic("name=%E5%BC%A0%E4%B8%89&lang=rust");
/// let pairs: Vec<_> = query
///     .split('&')
///     .filter_map(|s| s.split_once('='))
///     .map(|(k, v)| (k.decode().to_string_lossy(), v.decode().to_string_lossy()))
///     .collect();
/// assert_eq!(pairs[0], ("name".into(), "张三".into()));
/// assert_eq!(pairs[1], ("lang".into(), "rust".into()));
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

impl<E: Encoder> EStr<E> {
    const PCT_ALLOWED: () = assert!(
        E::TABLE.allows_pct_encoded(),
        "table does not allow percent-encoded octets"
    );

    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// An empty slice.
    pub const EMPTY: &'static Self = Self::new_validated("");

    /// Checks `s` against `E::TABLE`, returning `None` on failure.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if E::TABLE.matches(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Like [`new`](Self::new), but panics if `s` is not properly encoded.
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Self {
        match Self::new(s) {
            Some(s) => s,
            None => panic!("improperly encoded string"),
        }
    }

    /// Returns the `%XX` triplet of a byte.
    ///
    /// ```
    /// use uri_kit::pct_enc::{encoder::Path, EStr};
    ///
    /// assert_eq!(EStr::<Path>::encode_byte(b'A'), "%41");
    /// ```
    #[must_use]
    pub fn encode_byte(x: u8) -> &'static Self {
        () = Self::PCT_ALLOWED;
        Self::new_validated(encode_byte(x))
    }

    /// Returns the encoded string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns a decoder for the slice.
    ///
    /// Split on delimiters before decoding. `+` is not decoded as a space.
    ///
    /// ```
    /// use uri_kit::pct_enc::{encoder::Path, EStr};
    ///
    /// let dec = EStr::<Path>::new_or_panic("%C2%A1Hola%21").decode();
    /// assert_eq!(dec.to_string().unwrap(), "¡Hola!");
    /// ```
    pub fn decode(&self) -> Decode<'_> {
        () = Self::PCT_ALLOWED;
        Decode {
            source: &self.inner,
        }
    }

    /// Returns an iterator over the subslices separated by `delim`.
    ///
    /// # Panics
    ///
    /// Panics if `delim` is not a reserved character.
    pub fn split(&self, delim: char) -> Split<'_, E> {
        assert!(table::RESERVED.allows(delim), "splitting with non-reserved character");
        Split {
            inner: self.inner.split(delim),
            encoder: PhantomData,
        }
    }

    /// Splits on the first `delim`, or returns `None` if there is none.
    ///
    /// # Panics
    ///
    /// Panics if `delim` is not a reserved character.
    #[must_use]
    pub fn split_once(&self, delim: char) -> Option<(&Self, &Self)> {
        assert!(table::RESERVED.allows(delim), "splitting with non-reserved character");
        let (a, b) = self.inner.split_once(delim)?;
        Some((Self::new_validated(a), Self::new_validated(b)))
    }
}

impl EStr<encoder::Path> {
    /// Checks whether the path starts with `/`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
    }

    /// Returns the segments of an absolute path, or `None` for a relative one.
    ///
    /// ```
    /// use uri_kit::pct_enc::{encoder::Path, EStr};
    ///
    /// let path = EStr::<Path>::new_or_panic("/path/to//dir/");
    /// assert!(path.segments_if_absolute().unwrap().eq(["path", "to", "", "dir", ""]));
    /// ```
    #[must_use]
    pub fn segments_if_absolute(&self) -> Option<Split<'_, encoder::Path>> {
        let rest = self.inner.strip_prefix('/')?;
        Some(Self::new_validated(rest).split('/'))
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> hash::Hash for EStr<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<E: Encoder> ToOwned for EStr<E> {
    type Owned = EString<E>;

    fn to_owned(&self) -> EString<E> {
        EString::from_encoded(self.inner.to_owned())
    }
}

impl<E: Encoder> fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// The decoder returned by [`EStr::decode`].
#[derive(Clone, Copy, Debug)]
pub struct Decode<'a> {
    source: &'a str,
}

impl<'a> Decode<'a> {
    /// Decodes to bytes, allocating only if there is a `%`.
    #[must_use]
    pub fn to_bytes(self) -> Cow<'a, [u8]> {
        // An `EStr` holds only well-formed triplets.
        decode(self.source).unwrap_or(Cow::Borrowed(self.source.as_bytes()))
    }

    /// Decodes to a string.
    ///
    /// # Errors
    ///
    /// Returns `Err` with the decoded bytes if they are not valid UTF-8.
    pub fn to_string(self) -> Result<Cow<'a, str>, Vec<u8>> {
        match self.to_bytes() {
            Cow::Borrowed(_) => Ok(Cow::Borrowed(self.source)),
            Cow::Owned(bytes) => String::from_utf8(bytes)
                .map(Cow::Owned)
                .map_err(|e| e.into_bytes()),
        }
    }

    /// Decodes to a string, replacing invalid UTF-8 with `U+FFFD`.
    #[must_use]
    pub fn to_string_lossy(self) -> Cow<'a, str> {
        decode_lossy(self.source, Charset::Any).unwrap_or(Cow::Borrowed(self.source))
    }
}

/// An iterator over subslices of an [`EStr`] separated by a delimiter.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Split<'a, E: Encoder> {
    inner: str::Split<'a, char>,
    encoder: PhantomData<E>,
}

impl<'a, E: Encoder> Iterator for Split<'a, E> {
    type Item = &'a EStr<E>;

    fn next(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next().map(EStr::new_validated)
    }
}

impl<'a, E: Encoder> DoubleEndedIterator for Split<'a, E> {
    fn next_back(&mut self) -> Option<&'a EStr<E>> {
        self.inner.next_back().map(EStr::new_validated)
    }
}

impl<E: Encoder> FusedIterator for Split<'_, E> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplets() {
        assert_eq!(encode_byte(0), "%00");
        assert_eq!(encode_byte(b' '), "%20");
        assert_eq!(encode_byte(0xff), "%FF");
        assert_eq!(octet_at(b"%2f", 0), Some(0x2f));
        assert_eq!(octet_at(b"%2", 0), None);
        assert_eq!(octet_at(b"a%zz", 1), None);
    }

    #[test]
    fn encode_borrows_when_clean() {
        assert!(matches!(encode("abc", table::UNRESERVED), Cow::Borrowed("abc")));
        assert!(matches!(encode("a%20", table::PATH), Cow::Borrowed("a%20")));
        assert_eq!(encode("a%20", table::UNRESERVED), "a%2520");
        assert_eq!(encode("", table::UNRESERVED), "");
    }
}
