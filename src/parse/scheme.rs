use super::{ParsingContext, MAX_LEN};
use crate::{
    components::{ComponentStore, HostKind, Inherit, OwnedComponents, PathKind, Span},
    pct_enc::table,
    scheme::SchemeKind,
    status::{UriStatus, Warnings},
};

/// Returns the index of the `:` closing a scheme at the start of `bytes`.
pub(crate) fn scheme_end(bytes: &[u8]) -> Option<usize> {
    let (first, rest) = bytes.split_first()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let len = rest.iter().take_while(|&&x| table::SCHEME.allows_byte(x)).count();
    (rest.get(len) == Some(&b':')).then_some(len + 1)
}

/// `[A-Za-z][:|]` followed by a slash, `?`, `#` or the end.
pub(crate) fn starts_with_drive_letter(bytes: &[u8]) -> bool {
    match bytes {
        [letter, b':' | b'|', rest @ ..] => {
            letter.is_ascii_alphabetic() && matches!(rest.first(), None | Some(b'/' | b'\\' | b'?' | b'#'))
        }
        _ => false,
    }
}

impl<S: ComponentStore> ParsingContext<'_, S> {
    pub(super) fn parse_scheme(&mut self) {
        if self.end == 0 {
            if let Some(base) = self.base {
                for part in [Inherit::Scheme, Inherit::Authority, Inherit::Path, Inherit::Queries] {
                    self.out.inherit(base, part);
                }
                self.status = UriStatus::Valid;
                return;
            }
            return self.fail(0, UriStatus::EmptyString);
        }
        if self.end > MAX_LEN {
            return self.fail(0, UriStatus::TooLong);
        }

        let Some(end) = scheme_end(self.bytes()) else {
            return self.parse_no_scheme();
        };
        self.out.set_scheme(self.input, Span::new(0, end));
        self.scheme = SchemeKind::of(&self.input[..end]);
        self.pos = end + 1;

        match self.scheme {
            SchemeKind::File => self.parse_file(),
            SchemeKind::Special(_) => {
                let scheme = &self.input[..end];
                let same_base = self.base.filter(|base| {
                    base.path_kind() == PathKind::Hierarchical
                        && base.scheme().is_some_and(|s| s.eq_ignore_ascii_case(scheme))
                });
                let rest = &self.bytes()[self.pos..];
                match same_base {
                    Some(base) if !rest.first().is_some_and(|&x| self.is_slash(x)) => {
                        self.parse_relative(base);
                    }
                    _ => {
                        self.skip_authority_slashes();
                        self.status = UriStatus::ValidAuthority;
                    }
                }
            }
            SchemeKind::Other | SchemeKind::None => {
                let rest = &self.bytes()[self.pos..];
                self.status = if rest.starts_with(b"//") {
                    self.pos += 2;
                    UriStatus::ValidAuthority
                } else if rest.starts_with(b"/") {
                    UriStatus::ValidPath
                } else {
                    UriStatus::ValidOpaquePath
                };
            }
        }
    }

    /// Skips the slashes that introduce the authority of a special URI.
    fn skip_authority_slashes(&mut self) {
        let rest = &self.bytes()[self.pos..];
        let count = rest.iter().take_while(|&&x| x == b'/' || x == b'\\').count();
        if !rest.starts_with(b"//") {
            self.warn(Warnings::MISSING_FOLLOWING_SOLIDUS, self.pos);
        }
        if rest[..count].contains(&b'\\') {
            self.warn(Warnings::REVERSE_SOLIDUS_USED, self.pos);
        }
        self.pos += count;
    }

    fn parse_no_scheme(&mut self) {
        if let Some(base) = self.base {
            if base.path_kind() == PathKind::Opaque {
                if self.bytes().first() != Some(&b'#') {
                    return self.fail(0, UriStatus::MissingSchemeNonRelativeUrl);
                }
                for part in [Inherit::Scheme, Inherit::Path, Inherit::Queries] {
                    self.out.inherit(base, part);
                }
                self.pos = 1;
                self.status = UriStatus::ValidFragment;
                return;
            }
            self.out.inherit(base, Inherit::Scheme);
            self.scheme = base.scheme().map_or(SchemeKind::None, SchemeKind::of);
            return if self.scheme == SchemeKind::File {
                self.parse_file()
            } else {
                self.parse_relative(base)
            };
        }

        if self.options.require_scheme {
            return self.fail(0, UriStatus::MissingSchemeNonRelativeUrl);
        }
        let first_seg_end = self.find_from(0, |x| matches!(x, b'/' | b'?' | b'#'));
        if let Some(i) = self.bytes()[..first_seg_end].iter().position(|&x| x == b':') {
            return self.fail(i, UriStatus::SchemeEndedUnexpectedly);
        }
        self.status = if self.bytes().starts_with(b"//") {
            self.pos = 2;
            UriStatus::ValidAuthority
        } else {
            UriStatus::ValidPath
        };
    }

    /// Takes the components missing from a reference from a hierarchical base.
    fn parse_relative(&mut self, base: &OwnedComponents) {
        let rest = &self.bytes()[self.pos..];
        match rest.first() {
            None => {
                for part in [Inherit::Authority, Inherit::Path, Inherit::Queries] {
                    self.out.inherit(base, part);
                }
                self.status = UriStatus::Valid;
            }
            Some(b'?') => {
                self.out.inherit(base, Inherit::Authority);
                self.out.inherit(base, Inherit::Path);
                self.pos += 1;
                self.status = UriStatus::ValidQueries;
            }
            Some(b'#') => {
                for part in [Inherit::Authority, Inherit::Path, Inherit::Queries] {
                    self.out.inherit(base, part);
                }
                self.pos += 1;
                self.status = UriStatus::ValidFragment;
            }
            Some(&x) if self.is_slash(x) => {
                if rest.get(1).is_some_and(|&y| self.is_slash(y)) {
                    if self.scheme.is_special() {
                        self.skip_authority_slashes();
                    } else {
                        self.pos += 2;
                    }
                    self.status = UriStatus::ValidAuthority;
                } else {
                    self.out.inherit(base, Inherit::Authority);
                    self.status = UriStatus::ValidPath;
                }
            }
            Some(_) => {
                self.out.inherit(base, Inherit::Authority);
                self.merge_path = true;
                self.status = UriStatus::ValidPath;
            }
        }
    }

    /// Handles what follows `file:`, or a reference against a `file` base.
    fn parse_file(&mut self) {
        let rest = &self.bytes()[self.pos..];
        let slash = |x: &u8| *x == b'/' || *x == b'\\';
        let base = self.base.filter(|base| base.scheme() == Some("file"));

        if rest.len() >= 2 && slash(&rest[0]) && slash(&rest[1]) {
            if rest[..2].contains(&b'\\') {
                self.warn(Warnings::REVERSE_SOLIDUS_USED, self.pos);
            }
            self.pos += 2;
            self.status = UriStatus::ValidAuthority;
            return;
        }

        match base {
            Some(base) if !rest.first().is_some_and(slash) => match rest.first() {
                None => {
                    for part in [Inherit::Authority, Inherit::Path, Inherit::Queries] {
                        self.out.inherit(base, part);
                    }
                    self.status = UriStatus::Valid;
                }
                Some(b'?') => {
                    self.out.inherit(base, Inherit::Authority);
                    self.out.inherit(base, Inherit::Path);
                    self.pos += 1;
                    self.status = UriStatus::ValidQueries;
                }
                Some(b'#') => {
                    for part in [Inherit::Authority, Inherit::Path, Inherit::Queries] {
                        self.out.inherit(base, part);
                    }
                    self.pos += 1;
                    self.status = UriStatus::ValidFragment;
                }
                Some(_) => {
                    self.out.inherit(base, Inherit::Authority);
                    self.merge_path = !starts_with_drive_letter(rest);
                    self.status = UriStatus::ValidPath;
                }
            },
            Some(base) => {
                self.out.inherit(base, Inherit::Authority);
                self.status = UriStatus::ValidPath;
            }
            None => {
                let span = Span::new(self.pos, self.pos);
                self.out.set_host(self.input, span, HostKind::Empty);
                self.host = span;
                self.status = UriStatus::ValidPath;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_boundaries() {
        assert_eq!(scheme_end(b"http://a"), Some(4));
        assert_eq!(scheme_end(b"a+b-c.d:x"), Some(7));
        assert_eq!(scheme_end(b"urn:"), Some(3));
        assert_eq!(scheme_end(b"1http:"), None);
        assert_eq!(scheme_end(b"ht_tp:"), None);
        assert_eq!(scheme_end(b"http"), None);
        assert_eq!(scheme_end(b":"), None);
        assert_eq!(scheme_end(b""), None);
    }

    #[test]
    fn drive_letters() {
        assert!(starts_with_drive_letter(b"C:"));
        assert!(starts_with_drive_letter(b"c|/x"));
        assert!(starts_with_drive_letter(b"C:\\x"));
        assert!(!starts_with_drive_letter(b"C:x"));
        assert!(!starts_with_drive_letter(b"1:/"));
        assert!(!starts_with_drive_letter(b"C"));
    }
}
