use crate::uri::Uri;
use borrow_or_share::Bos;
use core::fmt;

impl<T: Bos<str>> fmt::Debug for Uri<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uri")
            .field("scheme", &self.scheme())
            .field("authority", &self.authority_raw())
            .field("path", &self.path_raw())
            .field("queries", &self.queries_raw())
            .field("fragment", &self.fragment_raw())
            .field("status", &self.status())
            .finish()
    }
}

/// Writes the canonical form of a valid URI and the input as is otherwise.
///
/// ```
/// use uri_kit::Uri;
///
/// let uri: Uri<&str> = Uri::new("https://Example.com:443/%7Euser");
/// assert_eq!(uri.to_string(), "https://example.com/%7Euser");
///
/// let uri: Uri<&str> = Uri::new("http://exa mple.com/");
/// assert_eq!(uri.to_string(), "http://exa mple.com/");
/// ```
impl<T: Bos<str>> fmt::Display for Uri<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_components() {
            Ok(comps) => fmt::Display::fmt(&comps, f),
            Err(_) => f.write_str(self.as_str()),
        }
    }
}
