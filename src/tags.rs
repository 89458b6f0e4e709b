// src/tags.rs
//
// Element tables and tag inspection shared by the extractor, the tokenizer
// and the indentation engine.

/* =============================== Core sets =============================== */

/// Elements that never open an indentation level.
pub(crate) fn is_inline(name: &str) -> bool {
    matches_ignore_ascii_case(
        name,
        &[
            "a", "abbr", "b", "cite", "code", "del", "dfn", "em", "i", "ins", "kbd", "mark", "q",
            "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var",
        ],
    )
}

/// Elements emitted on one line that never change depth. Any other tag
/// needs a trailing `/>` for that.
pub(crate) fn is_void(name: &str) -> bool {
    matches_ignore_ascii_case(name, &["br", "hr", "img", "input", "meta", "link"])
}

fn matches_ignore_ascii_case(name: &str, set: &[&str]) -> bool {
    set.iter().any(|s| name.eq_ignore_ascii_case(s))
}

#[inline]
pub(crate) fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

#[inline]
fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == b'\x0c'
}

/* ============================== Raw kinds =============================== */

/// Elements whose interior is never tokenized as markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawKind {
    Script,
    Style,
    Pre,
    Textarea,
}

impl RawKind {
    pub const ALL: [RawKind; 4] = [RawKind::Script, RawKind::Style, RawKind::Pre, RawKind::Textarea];

    pub fn name(self) -> &'static str {
        match self {
            RawKind::Script => "script",
            RawKind::Style => "style",
            RawKind::Pre => "pre",
            RawKind::Textarea => "textarea",
        }
    }

    pub fn from_name(name: &str) -> Option<RawKind> {
        RawKind::ALL
            .into_iter()
            .find(|kind| name.eq_ignore_ascii_case(kind.name()))
    }

    /// `pre` and `textarea` keep their content byte-for-byte.
    pub fn preserves_whitespace(self) -> bool {
        matches!(self, RawKind::Pre | RawKind::Textarea)
    }
}

/* =============================== Tag parsing ============================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TagKind {
    Start,
    End,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>`, `<![CDATA[...]]>`, `<?xml ...?>`
    Declaration,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TagInfo<'a> {
    pub name: &'a str,
    pub kind: TagKind,
    pub self_closing: bool,
}

impl TagInfo<'_> {
    /// Neither inline, void nor self-closing: opens (or closes) a level.
    pub fn is_block(&self) -> bool {
        !self.self_closing && !is_void(self.name) && !is_inline(self.name)
    }

    pub fn raw_kind(&self) -> Option<RawKind> {
        RawKind::from_name(self.name)
    }
}

/// Extract tag name, kind and self-closing flag from raw `<...>` text.
pub(crate) fn parse_tag_info(tag: &str) -> TagInfo<'_> {
    let bytes = tag.as_bytes();
    let n = bytes.len();

    if tag.starts_with("<!--") {
        return TagInfo { name: "", kind: TagKind::Comment, self_closing: false };
    }
    if tag.starts_with("<!") || tag.starts_with("<?") {
        return TagInfo { name: "", kind: TagKind::Declaration, self_closing: false };
    }

    let mut i = 1;
    let mut kind = TagKind::Start;
    if i < n && bytes[i] == b'/' {
        kind = TagKind::End;
        i += 1;
    }
    let start = i;
    while i < n && is_name_char(bytes[i]) {
        i += 1;
    }
    let name = &tag[start..i];

    // self-closing? check before '>'
    let mut j = if bytes.last() == Some(&b'>') { n - 1 } else { n };
    while j > 0 && is_ws(bytes[j - 1]) {
        j -= 1;
    }
    let self_closing = kind == TagKind::Start && j >= 2 && bytes[j - 1] == b'/';

    TagInfo { name, kind, self_closing }
}

/* ======================== Inside-tag normalization ====================== */

/// Collapse the whitespace of a tag that was wrapped over several lines.
///
/// Outside quotes every whitespace run becomes one space, except a run that
/// contains a newline and touches `=`, which disappears. Inside quotes only
/// runs containing a newline are collapsed.
pub(crate) fn normalize_tag(tag: &str) -> String {
    if tag.len() < 2 || !tag.starts_with('<') || !tag.ends_with('>') {
        return tag.to_string();
    }
    let inner: Vec<char> = tag[1..tag.len() - 1].chars().collect();
    let n = inner.len();

    let mut buf = String::with_capacity(tag.len());
    let mut quote: Option<char> = None;
    let mut i = 0usize;

    let push_space_once = |buf: &mut String| {
        if !buf.ends_with(' ') {
            buf.push(' ');
        }
    };

    while i < n {
        let c = inner[i];
        if !c.is_ascii_whitespace() {
            match quote {
                Some(q) if c == q => quote = None,
                None if c == '"' || c == '\'' => quote = Some(c),
                _ => {}
            }
            buf.push(c);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < n && inner[i].is_ascii_whitespace() {
            i += 1;
        }
        let saw_nl = inner[run_start..i].iter().any(|&c| c == '\n' || c == '\r');

        if quote.is_some() {
            if saw_nl {
                push_space_once(&mut buf);
            } else {
                buf.extend(&inner[run_start..i]);
            }
            continue;
        }

        let left = buf.chars().last();
        let right = inner.get(i).copied();
        if saw_nl && (left == Some('=') || right == Some('=')) {
            // newline-run touching '=' → no space
        } else {
            push_space_once(&mut buf);
        }
    }

    let body = buf.trim_matches(' ');
    let mut out = String::with_capacity(body.len() + 2);
    out.push('<');
    out.push_str(body);
    out.push('>');
    out
}
