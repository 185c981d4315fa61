use crate::{
    component::{Component, Fragment, Host, Path, Queries, Scheme},
    components::{ComponentStore, HostKind, OwnedComponents, PathKind, UriComponents},
    log::warning,
    normalize::{normalize_segments, NormalizeOptions},
    parse::{ParseOptions, ParseState, ParsingContext},
    pct_enc::{self, encoder::Credential, table, Encoder},
    resolve::{self, Parts, ResolveError},
    scheme::SchemeKind,
    status::{
        ParseError, UriStatus, Warnings, STAGE_AUTHORITY, STAGE_DONE, STAGE_FRAGMENT, STAGE_HOST,
        STAGE_PATH, STAGE_PORT, STAGE_QUERIES,
    },
};
use alloc::{
    borrow::{Cow, ToOwned},
    string::String,
    vec::Vec,
};
use borrow_or_share::{BorrowOrShare, Bos};
use core::{
    borrow::Borrow,
    cell::Cell,
    cmp::Ordering,
    fmt::Write,
    hash,
    ops::Range,
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Default)]
struct Cache {
    comps: UriComponents,
    state: ParseState,
}

/// A URI reference that is parsed lazily, one component at a time.
///
/// Creating a `Uri` with [`new`] does no work. Each accessor parses just far
/// enough to answer, and later accessors resume where the previous parse
/// stopped. [`parse`] parses everything up front and rejects invalid input.
///
/// When parsing fails partway, the components before the failing one are
/// still available from the accessors; the failing component and every
/// component after it are absent.
///
/// # Variants
///
/// - `Uri<&str>`: borrowed; immutable.
/// - `Uri<String>` ([`UriString`]): owned; editable through the `set_*` methods.
///
/// # Examples
///
/// ```
/// use uri_kit::{Uri, UriString};
///
/// let uri: Uri<&str> = Uri::new("https://user@example.com:8443/a/b?x=1#top");
/// assert_eq!(uri.scheme(), Some("https"));
/// assert_eq!(uri.host_raw(), Some("example.com"));
/// assert_eq!(uri.port(), Some(8443));
/// assert_eq!(uri.path_raw(), "/a/b");
/// assert_eq!(uri.queries_raw(), Some("x=1"));
/// assert_eq!(uri.fragment_raw(), Some("top"));
///
/// let mut uri = UriString::parse("http://example.com")?;
/// uri.set_path("/search results")?;
/// uri.set_queries(Some("q=rust"))?;
/// assert_eq!(uri.as_str(), "http://example.com/search%20results?q=rust");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
///
/// [`new`]: Self::new
/// [`parse`]: Self::parse
#[derive(Clone)]
pub struct Uri<T> {
    val: T,
    options: ParseOptions,
    cache: Cell<Cache>,
}

/// An owned, editable [`Uri`].
pub type UriString = Uri<String>;

impl<T> Uri<T> {
    /// Returns the options the URI is parsed with.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Discards what has been parsed so far.
    ///
    /// The next accessor starts over from the scheme.
    pub fn unparse(&mut self) {
        self.cache.take();
    }

    /// Parses `s` until every component before `stage` is recorded.
    fn parsed_until(&self, s: &str, stage: u8) -> Cache {
        let mut cache = self.cache.get();
        if cache.state.status.stage().is_some_and(|current| current < stage) {
            let mut ctx =
                ParsingContext::resume(s, &mut cache.comps, None, self.options, cache.state);
            ctx.continue_until(stage);
            let state = ctx.save();
            cache.state = state;
            self.cache.set(cache);
        }
        cache
    }
}

impl<T: Bos<str>> Uri<T> {
    /// Wraps a URI reference without parsing it.
    pub fn new<V: Into<T>>(val: V) -> Self {
        Self::with_options(val, ParseOptions::new())
    }

    /// Wraps a URI reference without parsing it, to be parsed with `options`.
    pub fn with_options<V: Into<T>>(val: V, options: ParseOptions) -> Self {
        Self {
            val: val.into(),
            options,
            cache: Cell::default(),
        }
    }

    /// Parses a URI reference with the default options.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not a valid URI reference.
    pub fn parse<V: Into<T>>(val: V) -> Result<Self, ParseError> {
        Self::parse_with(val, ParseOptions::new())
    }

    /// Parses a URI reference with the given options.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the input is not valid under the options.
    pub fn parse_with<V: Into<T>>(val: V, options: ParseOptions) -> Result<Self, ParseError> {
        let uri = Self::with_options(val, options);
        match uri.error() {
            Some(e) => Err(e),
            None => Ok(uri),
        }
    }

    fn parsed(&self, stage: u8) -> Cache {
        self.parsed_until(self.as_str(), stage)
    }

    /// Parses the whole URI and returns the terminal status.
    pub fn status(&self) -> UriStatus {
        self.parsed(STAGE_DONE).state.status
    }

    /// Parses the whole URI and checks whether it is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status().is_valid()
    }

    /// Parses the whole URI and returns the error it stopped with, if any.
    #[must_use]
    pub fn error(&self) -> Option<ParseError> {
        let state = self.parsed(STAGE_DONE).state;
        (!state.status.is_valid()).then_some(ParseError {
            index: state.pos,
            status: state.status,
        })
    }

    /// Parses the whole URI and returns the warnings recorded on the way.
    pub fn warnings(&self) -> Warnings {
        self.parsed(STAGE_DONE).state.warnings
    }

    /// Describes the failing component and the warnings, for debugging.
    ///
    /// Returns an empty string for a valid URI without warnings.
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri: Uri<&str> = Uri::new("http://-bad.example/");
    /// assert_eq!(
    ///     uri.error_string(),
    ///     "host: domain label begins with a hyphen at index 7"
    /// );
    /// assert_eq!(Uri::<&str>::new("http://ok.example/").error_string(), "");
    /// ```
    #[must_use]
    pub fn error_string(&self) -> String {
        let state = self.parsed(STAGE_DONE).state;
        let mut out = String::new();
        if state.status.is_error() {
            let component = failed_component(state.status, state.last_state);
            let _ = write!(out, "{component}: {} at index {}", state.status, state.pos);
        }
        for warning in state.warnings.messages() {
            if !out.is_empty() {
                out.push_str("; ");
            }
            out.push_str("warning: ");
            out.push_str(warning);
        }
        out
    }

    /// Returns how the scheme affects parsing.
    pub fn scheme_kind(&self) -> SchemeKind {
        self.parsed(STAGE_AUTHORITY).state.scheme_kind()
    }

    /// Checks whether the URI has a scheme.
    #[must_use]
    pub fn has_scheme(&self) -> bool {
        self.parsed(STAGE_AUTHORITY).comps.has_scheme()
    }

    /// Checks whether the URI has a username.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.parsed(STAGE_HOST).comps.has_credentials()
    }

    /// Checks whether the URI has a password.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.parsed(STAGE_HOST).comps.has_password()
    }

    /// Checks whether the URI has a host, possibly empty.
    #[must_use]
    pub fn has_host(&self) -> bool {
        self.parsed(STAGE_PORT).comps.has_host()
    }

    /// Checks whether the URI has an explicit port that is not the default.
    #[must_use]
    pub fn has_port(&self) -> bool {
        self.parsed(STAGE_PATH).comps.has_port()
    }

    /// Checks whether the URI has a non-empty path.
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.parsed(STAGE_QUERIES).comps.path().is_empty()
    }

    /// Checks whether the URI has queries, possibly empty.
    #[must_use]
    pub fn has_queries(&self) -> bool {
        self.parsed(STAGE_FRAGMENT).comps.has_queries()
    }

    /// Checks whether the URI has a fragment, possibly empty.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.parsed(STAGE_DONE).comps.has_fragment()
    }

    /// Checks whether the path is opaque, as in `urn:isbn:0451450523`.
    #[must_use]
    pub fn is_urn(&self) -> bool {
        let comps = self.parsed(STAGE_QUERIES).comps;
        comps.has_path() && comps.path_kind() == PathKind::Opaque
    }

    /// Returns the kind of the host, if there is one.
    pub fn host_kind(&self) -> Option<HostKind> {
        let comps = self.parsed(STAGE_PORT).comps;
        comps.has_host().then(|| comps.host_kind())
    }

    /// Returns the explicit port. A port equal to the default of the
    /// scheme is elided and reads as `None`.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.parsed(STAGE_PATH).comps.port_value()
    }

    /// Returns the explicit port, or else the default port of the scheme,
    /// or else `0`.
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri: Uri<&str> = Uri::new("http://example.com:80/");
    /// assert_eq!(uri.port(), None);
    /// assert_eq!(uri.port_uint16(), 80);
    /// assert_eq!(Uri::<&str>::new("foo://x").port_uint16(), 0);
    /// ```
    #[must_use]
    pub fn port_uint16(&self) -> u16 {
        self.port()
            .unwrap_or_else(|| self.scheme_kind().default_port())
    }

    /// Returns the host as a typed component.
    ///
    /// Returns `None` if there is no host or if it only parsed leniently.
    pub fn host(&self) -> Option<Host> {
        let raw = self.host_raw()?;
        Host::parse_for(raw, self.scheme_kind()).ok()
    }

    /// Returns the path as a typed component of decoded segments.
    ///
    /// Returns `None` if the path is opaque or only parsed leniently.
    pub fn path(&self) -> Option<Path> {
        if self.is_urn() {
            return None;
        }
        Path::parse_for(self.path_raw(), self.scheme_kind()).ok()
    }

    /// Returns the queries as a typed multimap.
    ///
    /// Returns `None` if there are no queries or if they only parsed leniently.
    pub fn queries(&self) -> Option<Queries> {
        Queries::parse(self.queries_raw()?).ok()
    }

    /// Returns the decoded fragment.
    ///
    /// Returns `None` if there is no fragment or if it only parsed leniently.
    pub fn fragment(&self) -> Option<Fragment> {
        Fragment::parse(self.fragment_raw()?).ok()
    }

    /// Returns the canonical serialization of a valid URI, or the input
    /// unchanged if it is not valid.
    ///
    /// The scheme and domain hosts are lowercased, a default port is
    /// dropped, IPv6 addresses are compressed, dot segments are removed and
    /// every component is percent-encoded with its WHATWG encode set.
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri: Uri<&str> = Uri::new("HTTPS://Example.COM:443/a/./b/../c");
    /// assert_eq!(uri.to_canonical(), "https://example.com/a/c");
    /// ```
    #[must_use]
    pub fn to_canonical(&self) -> String {
        match self.to_components() {
            Ok(comps) => comps.to_string(),
            Err(_) => self.as_str().to_owned(),
        }
    }

    /// Copies the components into an [`OwnedComponents`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the URI is not valid.
    pub fn to_components(&self) -> Result<OwnedComponents, ParseError> {
        OwnedComponents::parse_with(self.as_str(), None, self.options)
    }

    /// Resolves a URI reference against this URI as the base, following
    /// RFC 3986 section 5.2.2.
    ///
    /// ```
    /// use uri_kit::{ResolveError, Uri};
    ///
    /// let base: Uri<&str> = Uri::new("http://a/b/c/d;p?q");
    /// assert_eq!(base.resolve(&Uri::<&str>::new("../g"))?, "http://a/b/g");
    /// assert_eq!(base.resolve(&Uri::<&str>::new("?y"))?, "http://a/b/c/d;p?y");
    ///
    /// let urn: Uri<&str> = Uri::new("urn:isbn:0451450523");
    /// assert_eq!(
    ///     urn.resolve(&Uri::<&str>::new("g")),
    ///     Err(ResolveError::InvalidReferenceAgainstOpaqueBase)
    /// );
    /// # Ok::<_, ResolveError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` if either URI is invalid, if the base has no scheme,
    /// or if a relative reference is given against a base with an opaque path.
    pub fn resolve<U: Bos<str>>(&self, reference: &Uri<U>) -> Result<UriString, ResolveError> {
        let base = self.parts().map_err(|_| ResolveError::InvalidBase)?;
        let reference = if reference.as_str().is_empty() {
            Parts::EMPTY
        } else {
            reference
                .parts()
                .map_err(|_| ResolveError::InvalidReference)?
        };
        resolve::resolve(&base, &reference, self.options)
    }

    /// Splits a valid URI into raw components.
    pub(crate) fn parts(&self) -> Result<Parts<'_>, UriStatus> {
        let cache = self.parsed(STAGE_DONE);
        if !cache.state.status.is_valid() {
            return Err(cache.state.status);
        }
        let s = self.as_str();
        let comps = cache.comps;
        let path = path_range(&comps, s);
        let authority = comps
            .host()
            .start()
            .map(|host| &s[comps.username().start().unwrap_or(host)..path.start]);
        Ok(Parts {
            scheme: comps.scheme().get(s),
            authority,
            path: &s[path],
            query: comps.queries().get(s),
            fragment: comps.fragment().get(s),
        })
    }
}

impl<'i, 'o, T: BorrowOrShare<'i, 'o, str>> Uri<T> {
    /// Returns the URI reference as a string slice.
    #[must_use]
    pub fn as_str(&'i self) -> &'o str {
        self.val.borrow_or_share()
    }

    /// Returns the scheme as written.
    #[must_use]
    pub fn scheme(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_AUTHORITY).comps.scheme().get(s)
    }

    /// Returns the username as written.
    #[must_use]
    pub fn username_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_HOST).comps.username().get(s)
    }

    /// Returns the password as written.
    #[must_use]
    pub fn password_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_HOST).comps.password().get(s)
    }

    /// Returns the username percent-encoded with the userinfo encode set.
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri: Uri<&str> = Uri::new("http://a@b@example.com/");
    /// assert_eq!(uri.username().as_deref(), Some("a%40b"));
    /// assert_eq!(uri.host_raw(), Some("example.com"));
    /// ```
    #[must_use]
    pub fn username(&'i self) -> Option<Cow<'o, str>> {
        let raw = self.username_raw()?;
        Some(pct_enc::encode(raw, table::USER_INFO_ENCODE_SET))
    }

    /// Returns the password percent-encoded with the userinfo encode set.
    #[must_use]
    pub fn password(&'i self) -> Option<Cow<'o, str>> {
        let raw = self.password_raw()?;
        Some(pct_enc::encode(raw, table::USER_INFO_ENCODE_SET))
    }

    /// Returns the host as written. IPv6 hosts keep their brackets.
    #[must_use]
    pub fn host_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_PORT).comps.host().get(s)
    }

    /// Returns the authority as written, without the leading `//`.
    #[must_use]
    pub fn authority_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        let comps = self.parsed_until(s, STAGE_QUERIES).comps;
        let host = comps.host().start()?;
        let start = comps.username().start().unwrap_or(host);
        let end = comps.path().start().or(comps.host().end())?;
        s.get(start..end)
    }

    /// Returns the path as written, empty if absent.
    #[must_use]
    pub fn path_raw(&'i self) -> &'o str {
        let s = self.as_str();
        self.parsed_until(s, STAGE_QUERIES)
            .comps
            .path()
            .get(s)
            .unwrap_or_default()
    }

    /// Returns the queries as written, without the leading `?`.
    #[must_use]
    pub fn queries_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_FRAGMENT).comps.queries().get(s)
    }

    /// Returns the fragment as written, without the leading `#`.
    #[must_use]
    pub fn fragment_raw(&'i self) -> Option<&'o str> {
        let s = self.as_str();
        self.parsed_until(s, STAGE_DONE).comps.fragment().get(s)
    }

    /// Returns the labels of a registered-name host.
    ///
    /// Returns an empty list for IP hosts, empty hosts and URIs without a host.
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri: Uri<&str> = Uri::new("http://a.b.example.co.uk/");
    /// assert_eq!(uri.domains(), ["a", "b", "example", "co", "uk"]);
    /// assert_eq!(uri.top_level_domain(), Some("uk"));
    /// assert_eq!(uri.second_level_domain(), Some("co"));
    /// assert_eq!(uri.subdomains(), ["a", "b", "example"]);
    ///
    /// assert!(Uri::<&str>::new("http://127.0.0.1/").domains().is_empty());
    /// ```
    #[must_use]
    pub fn domains(&'i self) -> Vec<&'o str> {
        let s = self.as_str();
        let comps = self.parsed_until(s, STAGE_PORT).comps;
        match (comps.host().get(s), comps.host_kind()) {
            (Some(host), HostKind::Domain | HostKind::Opaque) if !host.is_empty() => {
                host.split('.').collect()
            }
            _ => Vec::new(),
        }
    }

    /// Returns the last label of a registered-name host.
    #[must_use]
    pub fn top_level_domain(&'i self) -> Option<&'o str> {
        self.domains().pop()
    }

    /// Returns the second-to-last label of a registered-name host.
    #[must_use]
    pub fn second_level_domain(&'i self) -> Option<&'o str> {
        let labels = self.domains();
        labels.len().checked_sub(2).map(|i| labels[i])
    }

    /// Returns the labels before the second-level domain.
    #[must_use]
    pub fn subdomains(&'i self) -> Vec<&'o str> {
        let mut labels = self.domains();
        labels.truncate(labels.len().saturating_sub(2));
        labels
    }
}

impl Uri<String> {
    /// Borrows this `UriString` as a `Uri<&str>`.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn borrow(&self) -> Uri<&str> {
        Uri {
            val: &self.val,
            options: self.options,
            cache: self.cache.clone(),
        }
    }

    /// Consumes this `UriString` and yields the underlying [`String`].
    #[must_use]
    pub fn into_string(self) -> String {
        self.val
    }

    fn valid_cache(&self) -> Result<Cache, UriStatus> {
        let cache = self.parsed(STAGE_DONE);
        match cache.state.status {
            UriStatus::Valid => Ok(cache),
            status => Err(status),
        }
    }

    /// Replaces `range` of the string with `text` and parses the result,
    /// keeping the old value if the result is not valid.
    fn splice(&mut self, range: Range<usize>, text: &str) -> Result<(), UriStatus> {
        let mut val = self.val.clone();
        val.replace_range(range, text);
        let edited = Self::with_options(val, self.options);
        match edited.status() {
            UriStatus::Valid => {
                *self = edited;
                Ok(())
            }
            status => {
                warning!("rejected edit of {:?}: {}", self.val, status);
                Err(status)
            }
        }
    }

    /// Sets the scheme.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the scheme is not valid
    /// or if the rest of the URI is not valid under the new scheme.
    pub fn set_scheme(&mut self, scheme: &str) -> Result<(), UriStatus> {
        let scheme = Scheme::parse(scheme)?;
        let comps = self.valid_cache()?.comps;
        match comps.scheme().range() {
            Some(range) => self.splice(range, scheme.as_str()),
            None => {
                let mut text = scheme.as_str().to_owned();
                text.push(':');
                self.splice(0..0, &text)
            }
        }
    }

    /// Sets or removes the username. Removing the username removes the
    /// password as well.
    ///
    /// Bytes not allowed in a username are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the scheme forbids credentials.
    pub fn set_username(&mut self, username: Option<&str>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let host = comps.host().start().ok_or(UriStatus::HostMissing)?;
        let mut userinfo = String::new();
        if let Some(username) = username {
            pct_enc::encode_to(&mut userinfo, username.as_bytes(), Credential::TABLE);
            if let Some(password) = comps.password().get(&self.val) {
                userinfo.push(':');
                userinfo.push_str(password);
            }
            userinfo.push('@');
        }
        let start = comps.username().start().unwrap_or(host);
        self.splice(start..host, &userinfo)
    }

    /// Sets or removes the password.
    ///
    /// Bytes not allowed in a password are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the scheme forbids credentials.
    pub fn set_password(&mut self, password: Option<&str>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let host = comps.host().start().ok_or(UriStatus::HostMissing)?;
        let mut userinfo = comps
            .username()
            .get(&self.val)
            .unwrap_or_default()
            .to_owned();
        if let Some(password) = password {
            userinfo.push(':');
            pct_enc::encode_to(&mut userinfo, password.as_bytes(), table::USERINFO);
        }
        if !userinfo.is_empty() {
            userinfo.push('@');
        }
        let start = comps.username().start().unwrap_or(host);
        self.splice(start..host, &userinfo)
    }

    /// Sets or removes the host.
    ///
    /// A bare IPv6 address is bracketed. Setting a host on a URI without an
    /// authority adds one; removing the host removes the whole authority.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the host is not valid
    /// for the scheme.
    pub fn set_host(&mut self, host: Option<&str>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let s = self.val.as_str();
        let path = path_range(&comps, s);
        let scheme_end = comps.scheme().end().map_or(0, |end| end + 1);

        let Some(host) = host else {
            let Some(host) = comps.host().start() else {
                return Ok(());
            };
            let mut start = comps.username().start().unwrap_or(host);
            while start > scheme_end && matches!(s.as_bytes()[start - 1], b'/' | b'\\') {
                start -= 1;
            }
            let text = if s[path.clone()].starts_with("//") { "/." } else { "" };
            return self.splice(start..path.start, text);
        };

        let host: Cow<'_, str> = if host.contains(':') && !host.starts_with('[') {
            let mut bracketed = String::with_capacity(host.len() + 2);
            bracketed.push('[');
            bracketed.push_str(host);
            bracketed.push(']');
            bracketed.into()
        } else {
            host.into()
        };
        match comps.host().range() {
            Some(range) => self.splice(range, &host),
            None => {
                let mut text = String::from("//");
                text.push_str(&host);
                let path = &s[path];
                if !path.is_empty() && !path.starts_with('/') {
                    text.push('/');
                }
                self.splice(scheme_end..scheme_end, &text)
            }
        }
    }

    /// Sets or removes the port.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the scheme forbids a port.
    pub fn set_port(&mut self, port: Option<u16>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let host_end = comps.host().end().ok_or(UriStatus::HostMissing)?;
        let path = path_range(&comps, &self.val);
        let mut text = String::new();
        if let Some(port) = port {
            let _ = write!(text, ":{port}");
        }
        self.splice(host_end..path.start, &text)
    }

    /// Sets the path.
    ///
    /// Bytes not allowed in a path are percent-encoded. A `/` is prepended
    /// to a relative path when there is a host, and the path is guarded so
    /// that it cannot be mistaken for an authority or a scheme.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the result is not valid.
    pub fn set_path(&mut self, path: &str) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let range = path_range(&comps, &self.val);
        let mut text = pct_enc::encode(path, table::PATH).into_owned();
        if comps.has_host() {
            if !text.is_empty() && !text.starts_with('/') {
                text.insert(0, '/');
            }
        } else if text.starts_with("//") {
            text.insert_str(0, "/.");
        } else if !comps.has_scheme() && text.split('/').next().is_some_and(|seg| seg.contains(':')) {
            text.insert_str(0, "./");
        }
        self.splice(range, &text)
    }

    /// Sets or removes the queries.
    ///
    /// Bytes not allowed in queries are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the result is not valid.
    pub fn set_queries(&mut self, queries: Option<&str>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        match (comps.queries().range(), queries) {
            (Some(range), Some(queries)) => {
                self.splice(range, &pct_enc::encode(queries, table::QUERY))
            }
            (Some(range), None) => self.splice(range.start - 1..range.end, ""),
            (None, Some(queries)) => {
                let end = path_range(&comps, &self.val).end;
                let mut text = String::from("?");
                pct_enc::encode_to(&mut text, queries.as_bytes(), table::QUERY);
                self.splice(end..end, &text)
            }
            (None, None) => Ok(()),
        }
    }

    /// Replaces the queries with the encoded form of a multimap.
    ///
    /// ```
    /// use uri_kit::{component::Queries, UriString};
    ///
    /// let mut uri = UriString::parse("http://example.com/?old")?;
    /// let queries: Queries = [("q", "a b"), ("lang", "en&fr")].into_iter().collect();
    /// uri.set_query_pairs(&queries)?;
    /// assert_eq!(uri.as_str(), "http://example.com/?q=a%20b&lang=en%26fr");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the result is not valid.
    pub fn set_query_pairs(&mut self, queries: &Queries) -> Result<(), UriStatus> {
        let mut text = String::new();
        queries.append_to(&mut text, false);
        self.set_queries(Some(&text))
    }

    /// Sets or removes the fragment.
    ///
    /// Bytes not allowed in a fragment are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the result is not valid.
    pub fn set_fragment(&mut self, fragment: Option<&str>) -> Result<(), UriStatus> {
        let comps = self.valid_cache()?.comps;
        let end = self.val.len();
        match (comps.fragment().range(), fragment) {
            (Some(range), Some(fragment)) => {
                self.splice(range, &pct_enc::encode(fragment, table::FRAGMENT))
            }
            (Some(range), None) => self.splice(range.start - 1..range.end, ""),
            (None, Some(fragment)) => {
                let mut text = String::from("#");
                pct_enc::encode_to(&mut text, fragment.as_bytes(), table::FRAGMENT);
                self.splice(end..end, &text)
            }
            (None, None) => Ok(()),
        }
    }

    /// Normalizes the segments of a hierarchical path in place.
    ///
    /// ```
    /// use uri_kit::{normalize::NormalizeOptions, UriString};
    ///
    /// let mut uri = UriString::parse("http://example.com/a//b/./../c/")?;
    /// uri.normalize_path(NormalizeOptions::new().remove_empty_segments(true))?;
    /// assert_eq!(uri.as_str(), "http://example.com/a/c/");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if the URI is not valid.
    pub fn normalize_path(&mut self, options: NormalizeOptions) -> Result<(), UriStatus> {
        let cache = self.valid_cache()?;
        if cache.comps.path_kind() == PathKind::Opaque {
            return Ok(());
        }
        let special = cache.state.scheme_kind().is_special();
        let is_sep = |c: char| c == '/' || (special && c == '\\');

        let raw = self.path_raw();
        let (absolute, rest) = match raw.chars().next() {
            Some(c) if is_sep(c) => (true, &raw[1..]),
            _ => (false, raw),
        };
        let segments: Vec<&str> = if rest.is_empty() && !absolute {
            Vec::new()
        } else {
            rest.split(is_sep).collect()
        };

        let mut path = String::with_capacity(raw.len());
        if absolute {
            path.push('/');
        }
        for (i, seg) in normalize_segments(segments, options).into_iter().enumerate() {
            if i != 0 {
                path.push('/');
            }
            path.push_str(seg);
        }
        if path == raw {
            return Ok(());
        }
        self.set_path(&path)
    }

    fn domain_labels(&self) -> Result<Option<Vec<String>>, UriStatus> {
        let cache = self.valid_cache()?;
        match cache.comps.host_kind() {
            _ if !cache.comps.has_host() => Err(UriStatus::HostMissing),
            HostKind::Ipv4 | HostKind::Ipv6 | HostKind::IpvFuture => Ok(None),
            _ => Ok(Some(
                self.domains().into_iter().map(ToOwned::to_owned).collect(),
            )),
        }
    }

    fn set_labels(&mut self, labels: &[String]) -> Result<(), UriStatus> {
        self.set_host(Some(&labels.join(".")))
    }

    /// Replaces the last label of the host. IP hosts are left unchanged.
    ///
    /// ```
    /// use uri_kit::UriString;
    ///
    /// let mut uri = UriString::parse("https://www.example.com/")?;
    /// uri.set_top_level_domain("org")?;
    /// uri.set_second_level_domain("sample")?;
    /// uri.set_subdomains(&["api", "v2"])?;
    /// assert_eq!(uri.as_str(), "https://api.v2.sample.org/");
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the new host is not valid.
    pub fn set_top_level_domain(&mut self, tld: &str) -> Result<(), UriStatus> {
        let Some(mut labels) = self.domain_labels()? else {
            return Ok(());
        };
        match labels.last_mut() {
            Some(last) => tld.clone_into(last),
            None => labels.push(tld.to_owned()),
        }
        self.set_labels(&labels)
    }

    /// Replaces the second-to-last label of the host, or inserts one before
    /// the top-level domain. IP hosts are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the new host is not valid.
    pub fn set_second_level_domain(&mut self, sld: &str) -> Result<(), UriStatus> {
        let Some(mut labels) = self.domain_labels()? else {
            return Ok(());
        };
        match labels.len() {
            0 => labels.push(sld.to_owned()),
            1 => labels.insert(0, sld.to_owned()),
            n => sld.clone_into(&mut labels[n - 2]),
        }
        self.set_labels(&labels)
    }

    /// Replaces the labels before the second-level domain. IP hosts are
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err` and leaves the URI unchanged if there is no host or if
    /// the new host is not valid.
    pub fn set_subdomains(&mut self, subdomains: &[&str]) -> Result<(), UriStatus> {
        let Some(labels) = self.domain_labels()? else {
            return Ok(());
        };
        let keep = labels.len().saturating_sub(2);
        let mut new_labels: Vec<String> = subdomains.iter().map(|&s| s.to_owned()).collect();
        new_labels.extend(labels.into_iter().skip(keep));
        self.set_labels(&new_labels)
    }
}

impl Uri<&str> {
    /// Creates a new `UriString` by cloning the contents of this `Uri<&str>`.
    #[must_use]
    pub fn to_owned(&self) -> UriString {
        Uri {
            val: self.val.to_owned(),
            options: self.options,
            cache: self.cache.clone(),
        }
    }
}

impl From<&OwnedComponents> for UriString {
    fn from(comps: &OwnedComponents) -> Self {
        Uri::new(comps.to_string())
    }
}

impl<T: Bos<str>, U: Bos<str>> PartialEq<Uri<U>> for Uri<T> {
    fn eq(&self, other: &Uri<U>) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<T: Bos<str>> PartialEq<str> for Uri<T> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<T: Bos<str>> PartialEq<&str> for Uri<T> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<T: Bos<str>> PartialEq<Uri<T>> for &str {
    fn eq(&self, other: &Uri<T>) -> bool {
        *self == other.as_str()
    }
}

impl<T: Bos<str>> Eq for Uri<T> {}

impl<T: Bos<str>> hash::Hash for Uri<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<T: Bos<str>> PartialOrd for Uri<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Bos<str>> Ord for Uri<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl<T: Bos<str>> AsRef<str> for Uri<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T: Bos<str>> Borrow<str> for Uri<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for Uri<&'a str> {
    type Error = ParseError;

    /// Equivalent to [`parse`](Self::parse).
    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Uri::parse(value)
    }
}

impl From<Uri<String>> for String {
    /// Equivalent to [`into_string`](Uri::into_string).
    fn from(value: Uri<String>) -> String {
        value.val
    }
}

impl From<Uri<&str>> for UriString {
    /// Equivalent to [`to_owned`](Uri::to_owned).
    fn from(value: Uri<&str>) -> Self {
        value.to_owned()
    }
}

impl FromStr for UriString {
    type Err = ParseError;

    /// Equivalent to `UriString::parse(s)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

#[cfg(feature = "serde")]
impl<T: Bos<str>> Serialize for Uri<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uri<&'de str> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        Uri::parse(s).map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as URI: {e}")))
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for UriString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Uri::parse_with(s.as_str(), ParseOptions::new())
            .map(|uri: Uri<&str>| uri.to_owned())
            .map_err(|e| de::Error::custom(format_args!("failed to parse {s:?} as URI: {e}")))
    }
}

/// Returns the byte range of the path, falling back to the empty range
/// where the path would start.
fn path_range(comps: &UriComponents, s: &str) -> Range<usize> {
    if let Some(range) = comps.path().range() {
        return range;
    }
    let start = comps
        .queries()
        .start()
        .map(|i| i - 1)
        .or(comps.fragment().start().map(|i| i - 1))
        .unwrap_or(s.len());
    start..start
}

fn failed_component(status: UriStatus, last_state: UriStatus) -> &'static str {
    match status {
        UriStatus::HostMissing
        | UriStatus::InvalidIpLiteral
        | UriStatus::SubdomainTooLong
        | UriStatus::DotAtEnd
        | UriStatus::BeginWithHyphen
        | UriStatus::EndWithHyphen
        | UriStatus::DoubleHyphen
        | UriStatus::EmptySubdomain
        | UriStatus::InvalidPunycode => return "host",
        UriStatus::PortInvalid | UriStatus::PortOutOfRange | UriStatus::UnexpectedPort => {
            return "port"
        }
        UriStatus::UnexpectedCredentials => return "userinfo",
        _ => {}
    }
    match last_state {
        UriStatus::Unparsed => "scheme",
        UriStatus::ValidAuthority => "userinfo",
        UriStatus::ValidHost | UriStatus::ValidPunycode => "host",
        UriStatus::ValidPort => "port",
        UriStatus::ValidPath | UriStatus::ValidOpaquePath => "path",
        UriStatus::ValidQueries => "queries",
        UriStatus::ValidFragment => "fragment",
        _ => "uri",
    }
}
