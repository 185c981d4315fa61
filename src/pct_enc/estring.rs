use super::{encode_to, EStr, Encoder, SubEncoder};
use alloc::string::String;
use core::{borrow::Borrow, fmt, hash, marker::PhantomData, ops::Deref};

/// An owned, growable [`EStr`].
///
/// Building a query string from pairs:
///
/// ```
/// use uri_kit::pct_enc::{encoder::{Query, QueryPair}, EString};
///
/// let mut buf = EString::<Query>::new();
/// for (k, v) in [("name", "张三"), ("speech", "¡Olé!")] {
///     if !buf.is_empty() {
///         buf.push('&');
///     }
///     buf.encode_str::<QueryPair>(k);
///     buf.push('=');
///     buf.encode_str::<QueryPair>(v);
/// }
/// assert_eq!(buf, "name=%E5%BC%A0%E4%B8%89&speech=%C2%A1Ol%C3%A9!");
/// ```
pub struct EString<E: Encoder> {
    buf: String,
    encoder: PhantomData<E>,
}

impl<E: Encoder> EString<E> {
    pub(super) fn from_encoded(buf: String) -> Self {
        Self {
            buf,
            encoder: PhantomData,
        }
    }

    /// Creates an empty `EString`.
    #[must_use]
    pub fn new() -> Self {
        Self::from_encoded(String::new())
    }

    /// Borrows as an [`EStr`].
    #[must_use]
    pub fn as_estr(&self) -> &EStr<E> {
        EStr::new_validated(&self.buf)
    }

    /// Encodes `s` with the table of `SubE` and appends it.
    ///
    /// Well-formed `%XX` triplets in `s` are kept.
    ///
    /// # Panics
    ///
    /// Panics at compile time if `SubE` is not a
    /// [sub-encoder](Encoder#sub-encoders) of `E`.
    pub fn encode_str<SubE: Encoder>(&mut self, s: &str) {
        () = SubEncoder::<SubE, E>::CHECK;
        encode_to(&mut self.buf, s.as_bytes(), SubE::TABLE);
    }

    /// Encodes decoded data with the table of `SubE` and appends it.
    ///
    /// Unlike [`encode_str`](Self::encode_str), every `%` in `s` is encoded.
    ///
    /// ```
    /// use uri_kit::pct_enc::{encoder::{Path, PathSegment}, EString};
    ///
    /// let mut buf = EString::<Path>::new();
    /// buf.encode_data::<PathSegment>("100%/a");
    /// assert_eq!(buf, "100%25%2Fa");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics at compile time if `SubE` is not a
    /// [sub-encoder](Encoder#sub-encoders) of `E`.
    pub fn encode_data<SubE: Encoder>(&mut self, s: &str) {
        () = SubEncoder::<SubE, E>::CHECK;
        encode_to(&mut self.buf, s.as_bytes(), SubE::TABLE.sub_pct_encoded());
    }

    /// Appends a character as it is.
    ///
    /// # Panics
    ///
    /// Panics if `E::TABLE` does not allow `ch`.
    pub fn push(&mut self, ch: char) {
        assert!(E::TABLE.allows(ch), "table does not allow the char");
        self.buf.push(ch);
    }

    /// Appends an already encoded slice.
    pub fn push_estr(&mut self, s: &EStr<E>) {
        self.buf.push_str(s.as_str());
    }

    /// Removes all contents.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns the underlying `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl<E: Encoder> Deref for EString<E> {
    type Target = EStr<E>;

    fn deref(&self) -> &EStr<E> {
        self.as_estr()
    }
}

impl<E: Encoder> Borrow<EStr<E>> for EString<E> {
    fn borrow(&self) -> &EStr<E> {
        self.as_estr()
    }
}

impl<E: Encoder> Default for EString<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> Clone for EString<E> {
    fn clone(&self) -> Self {
        Self::from_encoded(self.buf.clone())
    }
}

impl<E: Encoder> PartialEq for EString<E> {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<E: Encoder> PartialEq<str> for EString<E> {
    fn eq(&self, other: &str) -> bool {
        self.buf == other
    }
}

impl<E: Encoder> PartialEq<&str> for EString<E> {
    fn eq(&self, other: &&str) -> bool {
        self.buf == *other
    }
}

impl<E: Encoder> Eq for EString<E> {}

impl<E: Encoder> hash::Hash for EString<E> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.buf.hash(state);
    }
}

impl<E: Encoder> fmt::Debug for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.buf, f)
    }
}

impl<E: Encoder> fmt::Display for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
