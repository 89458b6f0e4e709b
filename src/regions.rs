// src/regions.rs
//
// Carves a document into ordinary markup and raw regions (script, style,
// pre, textarea) so the tokenizer never looks inside the latter.
//
// Matching is single pass and non-nested: an opener pairs with the first
// following closer of the same kind. An opener without a closer stays in
// ordinary markup and scanning resumes right after its '<'.

use crate::tags::{is_name_char, RawKind};
use memchr::memchr;

/// A maximal slice of the document: ordinary markup or one raw region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Markup(&'a str),
    Raw(RawRegion<'a>),
}

impl<'a> Segment<'a> {
    /// The literal source text of the segment.
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Markup(s) => s,
            Segment::Raw(r) => r.as_str(),
        }
    }
}

/// The full literal text of a preserved element, tags included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRegion<'a> {
    kind: RawKind,
    text: &'a str,
    /// End of the opening tag (exclusive).
    open_end: usize,
    /// Start of the closing tag.
    close_start: usize,
}

impl<'a> RawRegion<'a> {
    pub fn kind(&self) -> RawKind {
        self.kind
    }

    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn open_tag(&self) -> &'a str {
        &self.text[..self.open_end]
    }

    pub fn body(&self) -> &'a str {
        &self.text[self.open_end..self.close_start]
    }

    pub fn close_tag(&self) -> &'a str {
        &self.text[self.close_start..]
    }
}

/// Partition `doc` into segments, in document order, with no gaps.
///
/// Empty markup between adjacent raw regions is not emitted.
pub fn extract(doc: &str) -> Vec<Segment<'_>> {
    let bytes = doc.as_bytes();
    let n = bytes.len();
    let mut out = Vec::new();

    let mut markup_start = 0usize;
    let mut i = 0usize;
    while let Some(off) = memchr(b'<', &bytes[i..]) {
        let lt = i + off;
        match match_region(doc, lt) {
            Some(region) => {
                if markup_start < lt {
                    out.push(Segment::Markup(&doc[markup_start..lt]));
                }
                i = lt + region.text.len();
                markup_start = i;
                out.push(Segment::Raw(region));
            }
            None => i = lt + 1,
        }
        if i >= n {
            break;
        }
    }
    if markup_start < n {
        out.push(Segment::Markup(&doc[markup_start..]));
    }
    out
}

/// Try to match a whole raw region whose opening tag starts at `lt`.
fn match_region(doc: &str, lt: usize) -> Option<RawRegion<'_>> {
    let bytes = doc.as_bytes();
    let kind = opener_kind(bytes, lt)?;

    let Some(gt) = memchr(b'>', &bytes[lt..]).map(|off| lt + off) else {
        tracing::trace!(at = lt, kind = kind.name(), "unterminated raw-region opening tag");
        return None;
    };
    let open_end = gt + 1;

    let Some((close_start, close_end)) = find_close_tag(bytes, open_end, kind.name().as_bytes())
    else {
        tracing::trace!(at = lt, kind = kind.name(), "raw region without closing tag");
        return None;
    };

    Some(RawRegion {
        kind,
        text: &doc[lt..close_end],
        open_end: open_end - lt,
        close_start: close_start - lt,
    })
}

/// `<name` followed by a name boundary, for one of the raw kinds.
fn opener_kind(bytes: &[u8], lt: usize) -> Option<RawKind> {
    let start = lt + 1;
    let mut end = start;
    while end < bytes.len() && is_name_char(bytes[end]) {
        end += 1;
    }
    match bytes.get(end) {
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
        _ => return None,
    }
    // The name is ASCII, so this never splits a character.
    let name = std::str::from_utf8(&bytes[start..end]).ok()?;
    RawKind::from_name(name)
}

/// Find `</name` + ASCII whitespace + `>` at or after `from`, ignoring case.
/// Returns (start_of_close_tag, end_of_close_tag).
fn find_close_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<(usize, usize)> {
    let n = bytes.len();
    let mut i = from;
    while i < n {
        let pos = i + memchr(b'<', &bytes[i..])?;
        let name_start = pos + 2;
        let name_end = name_start + name.len();
        if name_end <= n
            && bytes[pos + 1] == b'/'
            && bytes[name_start..name_end].eq_ignore_ascii_case(name)
        {
            let mut k = name_end;
            while k < n && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < n && bytes[k] == b'>' {
                return Some((pos, k + 1));
            }
        }
        i = pos + 1;
    }
    None
}
