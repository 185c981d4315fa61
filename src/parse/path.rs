use super::{scheme::starts_with_drive_letter, ParsingContext};
use crate::{
    components::{ComponentStore, PathKind, Span},
    pct_enc::{table, Table},
    scheme::SchemeKind,
    status::{UriStatus, Warnings},
};

const SPECIAL_PATH: Table = table::PATH.or(Table::new(b"\\"));

impl<S: ComponentStore> ParsingContext<'_, S> {
    pub(super) fn parse_path(&mut self) {
        let start = self.pos;
        let end = self.find_from(start, |x| x == b'?' || x == b'#');
        let bytes = self.bytes();

        let table = if self.scheme.is_special() {
            if let Some(i) = bytes[start..end].iter().position(|&x| x == b'\\') {
                self.warn(Warnings::REVERSE_SOLIDUS_USED, start + i);
            }
            SPECIAL_PATH
        } else {
            table::PATH
        };

        // The `|` of a drive letter is let through and rewritten later.
        let letter = start + usize::from(bytes.get(start) == Some(&b'/'));
        let valid = if self.scheme == SchemeKind::File
            && starts_with_drive_letter(&bytes[letter..end])
            && bytes[letter + 1] == b'|'
        {
            self.check(start, letter + 1, table) && self.check(letter + 2, end, table)
        } else {
            self.check(start, end, table)
        };
        if !valid {
            return;
        }

        let span = Span::new(start, end);
        match self.base {
            Some(base) if self.merge_path => self.out.merge_path(base, self.input, span),
            _ => self.out.set_path(self.input, span, PathKind::Hierarchical),
        }
        self.advance_to(end);
    }

    pub(super) fn parse_opaque_path(&mut self) {
        let start = self.pos;
        let end = self.find_from(start, |x| x == b'?' || x == b'#');
        if !self.check(start, end, table::PATH) {
            return;
        }
        self.out
            .set_path(self.input, Span::new(start, end), PathKind::Opaque);
        self.advance_to(end);
    }

    pub(super) fn parse_queries(&mut self) {
        let start = self.pos;
        let end = self.find_from(start, |x| x == b'#');
        if !self.check(start, end, table::QUERY) {
            return;
        }
        self.out.set_queries(self.input, Span::new(start, end));
        self.advance_to(end);
    }

    pub(super) fn parse_fragment(&mut self) {
        let (start, end) = (self.pos, self.end);
        if !self.check(start, end, table::FRAGMENT) {
            return;
        }
        self.out.set_fragment(self.input, Span::new(start, end));
        self.pos = end;
        self.status = UriStatus::Valid;
    }
}
