//! Dot-segment removal and path normalization.

use alloc::{string::String, vec::Vec};

/// Options for segment-wise path normalization.
///
/// # Examples
///
/// ```
/// use uri_kit::normalize::{normalize_segments, NormalizeOptions};
///
/// let segs = vec!["..", "a", "", "b", ".", ""];
/// assert_eq!(normalize_segments(segs.clone(), NormalizeOptions::new()), ["..", "a", "", "b", ""]);
///
/// let options = NormalizeOptions::new().remove_leading(true).remove_empty_segments(true);
/// assert_eq!(normalize_segments(segs, options), ["a", "b", ""]);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[must_use]
pub struct NormalizeOptions {
    remove_leading: bool,
    remove_empty_segments: bool,
}

impl NormalizeOptions {
    /// Creates options that keep leading `..` segments and empty segments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a `..` with no preceding segment to remove is dropped.
    ///
    /// This defaults to `false`, which keeps such a segment.
    pub fn remove_leading(mut self, value: bool) -> Self {
        self.remove_leading = value;
        self
    }

    /// Sets whether empty segments other than the last are dropped.
    ///
    /// This defaults to `false`.
    pub fn remove_empty_segments(mut self, value: bool) -> Self {
        self.remove_empty_segments = value;
        self
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SegKind {
    Dot,
    DoubleDot,
    Normal,
}

/// Classifies a segment, treating `%2E` as `.`.
fn classify_segment(seg: &str) -> SegKind {
    let rest = match seg.strip_prefix('.') {
        Some(rest) => rest,
        None => match seg.get(..3) {
            Some(pct) if pct.eq_ignore_ascii_case("%2e") => &seg[3..],
            _ => return SegKind::Normal,
        },
    };
    if rest.is_empty() {
        SegKind::Dot
    } else if rest == "." || rest.eq_ignore_ascii_case("%2e") {
        SegKind::DoubleDot
    } else {
        SegKind::Normal
    }
}

/// Normalizes a sequence of path segments.
///
/// `.` segments are removed. A `..` segment removes itself and the preceding
/// segment unless that is a kept `..`. A `.` or `..` in last position leaves
/// an empty last segment so that the path keeps its trailing slash.
///
/// Applying this function twice gives the same result as applying it once.
pub fn normalize_segments<S>(segments: Vec<S>, options: NormalizeOptions) -> Vec<S>
where
    S: AsRef<str> + Default,
{
    let n = segments.len();
    let mut out: Vec<S> = Vec::with_capacity(n);

    for (i, seg) in segments.into_iter().enumerate() {
        let last = i + 1 == n;
        match classify_segment(seg.as_ref()) {
            SegKind::Dot => {
                if last {
                    out.push(S::default());
                }
            }
            SegKind::DoubleDot => {
                let removable = out
                    .last()
                    .is_some_and(|prev| classify_segment(prev.as_ref()) != SegKind::DoubleDot);
                if removable {
                    out.pop();
                } else if !options.remove_leading {
                    out.push(seg);
                    continue;
                }
                if last {
                    out.push(S::default());
                }
            }
            SegKind::Normal => {
                if !seg.as_ref().is_empty() || last || !options.remove_empty_segments {
                    out.push(seg);
                }
            }
        }
    }
    out
}

/// Removes dot segments from a path and appends the result onto `out`.
///
/// This is the algorithm of RFC 3986 section 5.2.4: a `..` that would climb
/// above the first segment is dropped.
///
/// ```
/// use uri_kit::normalize::remove_dot_segments;
///
/// let mut buf = String::new();
/// remove_dot_segments(&mut buf, "/a/b/c/./../../g");
/// assert_eq!(buf, "/a/g");
///
/// buf.clear();
/// remove_dot_segments(&mut buf, "mid/content=5/../6");
/// assert_eq!(buf, "mid/6");
/// ```
pub fn remove_dot_segments(out: &mut String, path: &str) {
    if path.is_empty() {
        return;
    }
    let (absolute, rest) = match path.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, path),
    };
    let segments: Vec<&str> = rest.split('/').collect();
    let segments = normalize_segments(segments, NormalizeOptions::new().remove_leading(true));

    if absolute {
        out.push('/');
    }
    for (i, seg) in segments.iter().enumerate() {
        if i != 0 {
            out.push('/');
        }
        out.push_str(seg);
    }
}
