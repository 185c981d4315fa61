//! The URI parsing state machine.
//!
//! Parsing is driven by [`UriStatus`]: each `parse_*` state consumes one
//! component, records it in the [`ComponentStore`] and sets the status to the
//! continuation marker of the next state, or to a terminal value. The
//! dispatcher loops until the status reaches a requested stage, so a parse
//! can be suspended after any component and resumed later from a saved
//! [`ParseState`].

mod authority;
mod path;
mod scheme;

pub(crate) use authority::parse_port_digits;

use crate::{
    components::{ComponentStore, OwnedComponents, Span, UriComponents},
    log::debug,
    pct_enc::Table,
    scheme::SchemeKind,
    status::{ParseError, UriStatus, Warnings, STAGE_DONE, STAGE_PORT},
};

/// Options controlling how strictly a URI is parsed.
///
/// # Examples
///
/// ```
/// use uri_kit::{ParseOptions, UriStatus, UriString};
///
/// let err = UriString::parse("http://example.com/a b").unwrap_err();
/// assert_eq!(err.status(), UriStatus::InvalidCharacter);
/// assert_eq!(err.index(), 20);
///
/// let options = ParseOptions::new().allow_invalid_characters(true);
/// let uri = UriString::parse_with("http://example.com/a b", options)?;
/// assert_eq!(uri.to_canonical(), "http://example.com/a%20b");
/// # Ok::<_, uri_kit::ParseError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[must_use]
pub struct ParseOptions {
    allow_invalid_characters: bool,
    require_scheme: bool,
    validate_domains: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Creates strict options that accept relative references and validate domains.
    pub const fn new() -> Self {
        Self {
            allow_invalid_characters: false,
            require_scheme: false,
            validate_domains: true,
        }
    }

    /// Sets whether invalid characters and malformed percent-encoded octets
    /// are accepted with a warning instead of stopping the parse.
    ///
    /// The domain of a special scheme is always checked strictly.
    ///
    /// This defaults to `false`.
    pub const fn allow_invalid_characters(mut self, value: bool) -> Self {
        self.allow_invalid_characters = value;
        self
    }

    /// Sets whether a URI without a scheme is rejected with
    /// [`UriStatus::MissingSchemeNonRelativeUrl`].
    ///
    /// This defaults to `false`.
    pub const fn require_scheme(mut self, value: bool) -> Self {
        self.require_scheme = value;
        self
    }

    /// Sets whether the registered names of special schemes are checked
    /// for the shape of a domain name.
    ///
    /// This defaults to `true`.
    pub const fn validate_domains(mut self, value: bool) -> Self {
        self.validate_domains = value;
        self
    }

    /// Checks whether invalid characters are accepted.
    #[must_use]
    pub const fn allows_invalid_characters(&self) -> bool {
        self.allow_invalid_characters
    }
}

/// The resumable part of a [`ParsingContext`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ParseState {
    pub(crate) pos: usize,
    pub(crate) status: UriStatus,
    pub(crate) warnings: Warnings,
    /// The state that ran last, which is the one that failed on error.
    pub(crate) last_state: UriStatus,
    scheme: SchemeKind,
    authority_end: usize,
    host: Span,
    merge_path: bool,
}

impl ParseState {
    pub(crate) fn scheme_kind(&self) -> SchemeKind {
        self.scheme
    }
}

/// The cursor of one parse over `input[..end]`.
pub(crate) struct ParsingContext<'a, S: ComponentStore> {
    input: &'a str,
    pos: usize,
    end: usize,
    out: &'a mut S,
    base: Option<&'a OwnedComponents>,
    options: ParseOptions,
    status: UriStatus,
    warnings: Warnings,
    last_state: UriStatus,
    scheme: SchemeKind,
    authority_end: usize,
    host: Span,
    merge_path: bool,
}

const MAX_LEN: usize = u32::MAX as usize - 1;

impl<'a, S: ComponentStore> ParsingContext<'a, S> {
    pub(crate) fn new(
        input: &'a str,
        out: &'a mut S,
        base: Option<&'a OwnedComponents>,
        options: ParseOptions,
    ) -> Self {
        Self::resume(input, out, base, options, ParseState::default())
    }

    pub(crate) fn resume(
        input: &'a str,
        out: &'a mut S,
        base: Option<&'a OwnedComponents>,
        options: ParseOptions,
        state: ParseState,
    ) -> Self {
        Self {
            input,
            pos: state.pos,
            end: input.len(),
            out,
            base,
            options,
            status: state.status,
            warnings: state.warnings,
            last_state: state.last_state,
            scheme: state.scheme,
            authority_end: state.authority_end,
            host: state.host,
            merge_path: state.merge_path,
        }
    }

    /// Starts a parse at the state named by `status`, as if everything
    /// before `input` had already been consumed.
    fn for_component(input: &'a str, out: &'a mut S, status: UriStatus, scheme: SchemeKind) -> Self {
        let mut ctx = Self::new(input, out, None, ParseOptions::new());
        ctx.status = status;
        ctx.scheme = scheme;
        ctx.authority_end = input.len();
        ctx
    }

    pub(crate) fn save(&self) -> ParseState {
        ParseState {
            pos: self.pos,
            status: self.status,
            warnings: self.warnings,
            last_state: self.last_state,
            scheme: self.scheme,
            authority_end: self.authority_end,
            host: self.host,
            merge_path: self.merge_path,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Parses to a terminal status.
    pub(crate) fn continue_parsing_uri(&mut self) {
        self.continue_until(STAGE_DONE);
    }

    /// Parses until every component before `stage` is recorded
    /// or a terminal status is reached.
    pub(crate) fn continue_until(&mut self, stage: u8) {
        while let Some(current) = self.status.stage() {
            if current >= stage || current == STAGE_DONE {
                break;
            }
            self.last_state = self.status;
            match self.status {
                UriStatus::Unparsed => self.parse_scheme(),
                UriStatus::ValidAuthority => self.parse_authority(),
                UriStatus::ValidHost => self.parse_host(),
                UriStatus::ValidPunycode => self.parse_punycode(),
                UriStatus::ValidPort => self.parse_port(),
                UriStatus::ValidPath => self.parse_path(),
                UriStatus::ValidOpaquePath => self.parse_opaque_path(),
                UriStatus::ValidQueries => self.parse_queries(),
                UriStatus::ValidFragment => self.parse_fragment(),
                _ => break,
            }
        }
    }

    fn fail(&mut self, index: usize, status: UriStatus) {
        debug!("parse of {:?} stopped at {}: {}", self.input, index, status);
        self.pos = index;
        self.status = status;
    }

    #[cfg_attr(not(feature = "log"), allow(unused_variables))]
    fn warn(&mut self, warning: Warnings, index: usize) {
        debug!("parse of {:?} at {}: {:?}", self.input, index, warning);
        self.warnings.insert(warning);
    }

    fn is_slash(&self, x: u8) -> bool {
        x == b'/' || (x == b'\\' && self.scheme.is_special())
    }

    /// Validates `input[start..end]` against `table`.
    ///
    /// In strict mode the first offending byte stops the parse and `false`
    /// is returned. In lenient mode offending bytes are recorded as warnings.
    fn check(&mut self, start: usize, end: usize, table: Table) -> bool {
        let lenient = self.options.allow_invalid_characters;
        self.check_with(start, end, table, lenient, false)
    }

    /// Like [`check`](Self::check) for a domain: non-ASCII bytes are
    /// skipped and offending ASCII bytes always fail, as a domain cannot
    /// escape them.
    fn check_domain(&mut self, start: usize, end: usize, table: Table) -> bool {
        self.check_with(start, end, table, false, true)
    }

    fn check_with(
        &mut self,
        start: usize,
        end: usize,
        table: Table,
        lenient: bool,
        allow_non_ascii: bool,
    ) -> bool {
        let bytes = self.bytes();
        let mut i = start;
        while i < end {
            let Err(offset) = table.validate(&bytes[i..end]) else {
                break;
            };
            i += offset;
            if allow_non_ascii && !bytes[i].is_ascii() {
                i += 1;
                continue;
            }
            let (status, warning) = if bytes[i] == b'%' {
                (UriStatus::InvalidPercentEncoding, Warnings::INVALID_PERCENT_ENCODING)
            } else {
                (UriStatus::InvalidCharacter, Warnings::INVALID_CHARACTER)
            };
            if !lenient {
                self.fail(i, status);
                return false;
            }
            self.warn(warning, i);
            i += 1;
        }
        true
    }

    /// Moves past the delimiter at `end` and selects the next state.
    fn advance_to(&mut self, end: usize) {
        match self.bytes().get(end) {
            Some(b'?') => {
                self.pos = end + 1;
                self.status = UriStatus::ValidQueries;
            }
            Some(b'#') => {
                self.pos = end + 1;
                self.status = UriStatus::ValidFragment;
            }
            _ => {
                self.pos = end;
                self.status = UriStatus::Valid;
            }
        }
    }

    /// Returns the index of the first byte in `input[from..]` matching
    /// `pred`, or the end of input.
    fn find_from(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.bytes()[from..self.end]
            .iter()
            .position(|&x| pred(x))
            .map_or(self.end, |i| from + i)
    }
}

/// Parses `input` to completion into `out`.
pub(crate) fn parse_into<S: ComponentStore>(
    input: &str,
    out: &mut S,
    base: Option<&OwnedComponents>,
    options: ParseOptions,
) -> Result<Warnings, ParseError> {
    let mut ctx = ParsingContext::new(input, out, base, options);
    ctx.continue_parsing_uri();
    match ctx.status {
        UriStatus::Valid => Ok(ctx.warnings),
        status => Err(ParseError {
            index: ctx.pos,
            status,
        }),
    }
}

/// Runs the single state named by `status` over the whole of `input`.
///
/// Fails with [`UriStatus::InvalidCharacter`] if the state stops before
/// the end of input.
pub(crate) fn parse_component(
    input: &str,
    status: UriStatus,
    scheme: SchemeKind,
) -> Result<UriComponents, UriStatus> {
    let mut out = UriComponents::default();
    let Some(stage) = status.stage() else {
        return Err(status);
    };

    // A host is not complete until its punycode form is checked.
    let until = if status == UriStatus::ValidHost {
        STAGE_PORT
    } else {
        stage + 1
    };
    let mut ctx = ParsingContext::for_component(input, &mut out, status, scheme);
    ctx.continue_until(until);
    let result = ctx.status;
    let authority_end = ctx.authority_end;

    if result.is_error() {
        return Err(result);
    }
    let recorded_end = match status {
        UriStatus::ValidHost | UriStatus::ValidPunycode => out.host().end(),
        UriStatus::ValidPath | UriStatus::ValidOpaquePath => out.path().end(),
        UriStatus::ValidQueries => out.queries().end(),
        UriStatus::ValidFragment => out.fragment().end(),
        _ => Some(authority_end),
    };
    if recorded_end == Some(input.len()) {
        Ok(out)
    } else {
        Err(UriStatus::InvalidCharacter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{HostKind, PathKind};

    fn run(input: &str) -> (UriComponents, ParseState) {
        let mut out = UriComponents::default();
        let mut ctx = ParsingContext::new(input, &mut out, None, ParseOptions::new());
        ctx.continue_parsing_uri();
        let state = ctx.save();
        (out, state)
    }

    fn get(input: &str, span: Span) -> Option<&str> {
        span.get(input)
    }

    #[test]
    fn full_parse() {
        let s = "https://user:pw@example.com:8443/a/b?x=1#frag";
        let (c, state) = run(s);
        assert_eq!(state.status, UriStatus::Valid);
        assert_eq!(get(s, c.scheme()), Some("https"));
        assert_eq!(get(s, c.username()), Some("user"));
        assert_eq!(get(s, c.password()), Some("pw"));
        assert_eq!(get(s, c.host()), Some("example.com"));
        assert_eq!(c.host_kind(), HostKind::Domain);
        assert_eq!(c.port_value(), Some(8443));
        assert_eq!(get(s, c.path()), Some("/a/b"));
        assert_eq!(get(s, c.queries()), Some("x=1"));
        assert_eq!(get(s, c.fragment()), Some("frag"));
        assert_eq!(get(s, c.authority()), Some("user:pw@example.com:8443"));
    }

    #[test]
    fn resumable() {
        let s = "http://example.com:8080/p?q#f";
        let mut out = UriComponents::default();
        let mut ctx = ParsingContext::new(s, &mut out, None, ParseOptions::new());
        ctx.continue_until(1);
        assert_eq!(ctx.status, UriStatus::ValidAuthority);
        let state = ctx.save();

        let mut ctx = ParsingContext::resume(s, &mut out, None, ParseOptions::new(), state);
        ctx.continue_until(5);
        assert_eq!(ctx.status, UriStatus::ValidPath);
        assert_eq!(ctx.pos, 23);
        let state = ctx.save();
        assert!(!out.has_path());
        assert_eq!(out.port_value(), Some(8080));

        let mut ctx = ParsingContext::resume(s, &mut out, None, ParseOptions::new(), state);
        ctx.continue_parsing_uri();
        assert_eq!(ctx.status, UriStatus::Valid);
        assert_eq!(get(s, out.fragment()), Some("f"));
    }

    #[test]
    fn single_states() {
        let c = parse_component("example.com", UriStatus::ValidHost, SchemeKind::Special(0)).unwrap();
        assert_eq!(c.host_kind(), HostKind::Domain);
        assert_eq!(
            parse_component("example.com:80", UriStatus::ValidHost, SchemeKind::Special(0)),
            Err(UriStatus::InvalidCharacter)
        );
        assert_eq!(
            parse_component("-bad.com", UriStatus::ValidHost, SchemeKind::Special(0)),
            Err(UriStatus::BeginWithHyphen)
        );

        let c = parse_component("/a/b", UriStatus::ValidPath, SchemeKind::None).unwrap();
        assert_eq!(c.path_kind(), PathKind::Hierarchical);
        assert_eq!(
            parse_component("/a?b", UriStatus::ValidPath, SchemeKind::None),
            Err(UriStatus::InvalidCharacter)
        );
        assert!(parse_component("a=1&b", UriStatus::ValidQueries, SchemeKind::None).is_ok());
        assert_eq!(
            parse_component("a#b", UriStatus::ValidQueries, SchemeKind::None),
            Err(UriStatus::InvalidCharacter)
        );
        assert_eq!(
            parse_component("%zz", UriStatus::ValidFragment, SchemeKind::None),
            Err(UriStatus::InvalidPercentEncoding)
        );
    }

    #[test]
    fn lenient_warnings() {
        let s = "http://example.com/a b%";
        let mut out = UriComponents::default();
        let options = ParseOptions::new().allow_invalid_characters(true);
        let warnings = parse_into(s, &mut out, None, options).unwrap();
        assert!(warnings.contains(Warnings::INVALID_CHARACTER));
        assert!(warnings.contains(Warnings::INVALID_PERCENT_ENCODING));
        assert_eq!(get(s, out.path()), Some("/a b%"));
    }

    #[test]
    fn lenient_domain_stays_strict() {
        let options = ParseOptions::new().allow_invalid_characters(true);
        for (s, index, status) in [
            ("http://exa mple.com/", 10, UriStatus::InvalidCharacter),
            ("http://a%zz.com/", 8, UriStatus::InvalidPercentEncoding),
            ("http://a%20b.com/", 7, UriStatus::InvalidCharacter),
        ] {
            let mut out = UriComponents::default();
            let err = parse_into(s, &mut out, None, options).unwrap_err();
            assert_eq!((err.index(), err.status()), (index, status), "{s}");
        }
    }
}
