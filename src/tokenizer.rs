// src/tokenizer.rs
//
// Lazy tag/text tokenizer for ordinary markup. It has no quote awareness: a
// tag runs from '<' to the next '>', so attribute values containing '>' are
// not supported. Comments are the exception and run to "-->".

use crate::regions::{self, RawRegion, Segment};
use memchr::{memchr, memmem};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &[u8] = b"-->";

/// Unit consumed by the indentation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal `<...>` text, comments and declarations included.
    Tag(&'a str),
    /// Text between tags, untrimmed. Never whitespace-only.
    Text(&'a str),
    /// A whole script/style/pre/textarea element.
    Raw(RawRegion<'a>),
}

/// Tokens of one ordinary markup segment.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(src: &'a str) -> Self {
        Tokens { src, pos: 0 }
    }

    /// Start of the next tag at or after `from`, or the end of input.
    fn next_tag_start(&self, from: usize) -> usize {
        let bytes = self.src.as_bytes();
        let n = bytes.len();
        let mut i = from;
        while let Some(off) = memchr(b'<', &bytes[i..]) {
            let lt = i + off;
            // No '>' anywhere after this '<': nothing left can be a tag.
            let Some(gt) = memchr(b'>', &bytes[lt + 1..]) else {
                return n;
            };
            if gt > 0 {
                return lt;
            }
            // "<>" is text
            i = lt + 1;
        }
        n
    }
}

/// End (exclusive) of the tag starting at `lt`, if one starts there.
fn tag_end(bytes: &[u8], lt: usize) -> Option<usize> {
    if bytes[lt..].starts_with(COMMENT_START.as_bytes()) {
        let body = lt + COMMENT_START.len();
        if let Some(off) = memmem::find(&bytes[body..], COMMENT_END) {
            return Some(body + off + COMMENT_END.len());
        }
    }
    match memchr(b'>', &bytes[lt + 1..]) {
        Some(off) if off > 0 => Some(lt + 1 + off + 1),
        _ => None,
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        loop {
            let start = self.pos;
            if start >= bytes.len() {
                return None;
            }

            if bytes[start] == b'<' {
                if let Some(end) = tag_end(bytes, start) {
                    self.pos = end;
                    return Some(Token::Tag(&self.src[start..end]));
                }
            }

            let skip = usize::from(bytes[start] == b'<');
            let end = self.next_tag_start(start + skip);
            self.pos = end;
            let text = &self.src[start..end];
            if !text.trim().is_empty() {
                return Some(Token::Text(text));
            }
        }
    }
}

/// The unified token stream of a whole document: ordinary segments are
/// tokenized, raw regions pass through as single tokens.
pub fn tokenize(doc: &str) -> DocumentTokens<'_> {
    DocumentTokens {
        segments: regions::extract(doc).into_iter(),
        markup: None,
    }
}

#[derive(Debug)]
pub struct DocumentTokens<'a> {
    segments: std::vec::IntoIter<Segment<'a>>,
    markup: Option<Tokens<'a>>,
}

impl<'a> Iterator for DocumentTokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(tok) = self.markup.as_mut().and_then(|t| t.next()) {
                return Some(tok);
            }
            self.markup = None;
            match self.segments.next()? {
                Segment::Markup(s) => self.markup = Some(Tokens::new(s)),
                Segment::Raw(r) => return Some(Token::Raw(r)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::RawKind;

    fn toks(s: &str) -> Vec<Token<'_>> {
        Tokens::new(s).collect()
    }

    #[test]
    fn splits_tags_and_text() {
        assert_eq!(
            toks("<div><p>Hello</p></div>"),
            vec![
                Token::Tag("<div>"),
                Token::Tag("<p>"),
                Token::Text("Hello"),
                Token::Tag("</p>"),
                Token::Tag("</div>"),
            ]
        );
    }

    #[test]
    fn whitespace_only_runs_are_dropped_and_text_is_untrimmed() {
        assert_eq!(
            toks("<ul>\n  <li> one </li>\n</ul>"),
            vec![
                Token::Tag("<ul>"),
                Token::Tag("<li>"),
                Token::Text(" one "),
                Token::Tag("</li>"),
                Token::Tag("</ul>"),
            ]
        );
    }

    #[test]
    fn unclosed_tag_becomes_trailing_text() {
        assert_eq!(
            toks("<p>a</p>b <i c=\"d\""),
            vec![
                Token::Tag("<p>"),
                Token::Text("a"),
                Token::Tag("</p>"),
                Token::Text("b <i c=\"d\""),
            ]
        );
        assert_eq!(toks("<"), vec![Token::Text("<")]);
    }

    #[test]
    fn empty_angle_pair_is_text() {
        assert_eq!(
            toks("a <> b<br>"),
            vec![Token::Text("a <> b"), Token::Tag("<br>")]
        );
    }

    #[test]
    fn comments_may_contain_gt() {
        assert_eq!(
            toks("<!-- a > b --><p>"),
            vec![Token::Tag("<!-- a > b -->"), Token::Tag("<p>")]
        );
    }

    #[test]
    fn unterminated_comment_uses_plain_tag_rule() {
        assert_eq!(
            toks("<!-- a > b"),
            vec![Token::Tag("<!-- a >"), Token::Text(" b")]
        );
    }

    #[test]
    fn document_stream_interleaves_raw_regions() {
        let tokens: Vec<_> = tokenize("<div><style>a{}</style>x</div>").collect();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], Token::Tag("<div>"));
        let Token::Raw(r) = tokens[1] else { panic!("expected raw region") };
        assert_eq!(r.kind(), RawKind::Style);
        assert_eq!(tokens[2], Token::Text("x"));
        assert_eq!(tokens[3], Token::Tag("</div>"));
    }
}
