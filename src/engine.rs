// src/engine.rs
//
// Indentation engine: walks the token stream once, tracking nesting depth and
// the current content mode, and emits one output line per token.
//
// script/style tags move depth like any block tag, but the bodies they carry
// are laid out by the mini formatters and appended as self-contained blocks,
// ignoring that depth.

use std::borrow::Cow;

use crate::indent;
use crate::regions::RawRegion;
use crate::tags::{is_inline, normalize_tag, parse_tag_info, RawKind, TagKind};
use crate::tokenizer::Token;
use crate::{css, js, Options};

/// Where text tokens are routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Markup,
    Script,
    Style,
}

/// Per-run state. Built fresh for each document and consumed by `finish`.
pub(crate) struct Formatter<'o> {
    options: &'o Options,
    depth: usize,
    mode: Mode,
    /// Inside pre/textarea whose closing tag was never found.
    preserve_whitespace: bool,
    lines: Vec<String>,
}

impl<'o> Formatter<'o> {
    pub fn new(options: &'o Options) -> Self {
        Formatter {
            options,
            depth: 0,
            mode: Mode::Markup,
            preserve_whitespace: false,
            lines: Vec::new(),
        }
    }

    pub fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Tag(tag) => self.tag(tag),
            Token::Text(text) => self.text(text),
            Token::Raw(region) => self.raw(region),
        }
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.depth
    }

    /* ================================ Tags ================================ */

    fn tag(&mut self, tag: &str) {
        let info = parse_tag_info(tag);
        match info.kind {
            TagKind::Comment => self.push_indented(tag),
            TagKind::Declaration => self.push_tag(tag),
            TagKind::Start => {
                if !info.self_closing {
                    if let Some(kind) = info.raw_kind() {
                        self.enter(kind);
                    }
                }
                self.push_tag(tag);
                if info.is_block() {
                    self.depth += 1;
                }
            }
            TagKind::End => {
                if let Some(kind) = info.raw_kind() {
                    self.leave(kind);
                }
                if !is_inline(info.name) {
                    self.depth = self.depth.saturating_sub(1);
                }
                self.push_tag(tag);
            }
        }
    }

    fn enter(&mut self, kind: RawKind) {
        match kind {
            RawKind::Script => self.mode = Mode::Script,
            RawKind::Style => self.mode = Mode::Style,
            RawKind::Pre | RawKind::Textarea => self.preserve_whitespace = true,
        }
    }

    fn leave(&mut self, kind: RawKind) {
        match kind {
            RawKind::Script | RawKind::Style => self.mode = Mode::Markup,
            RawKind::Pre | RawKind::Textarea => self.preserve_whitespace = false,
        }
    }

    /* ================================ Text ================================ */

    fn text(&mut self, text: &str) {
        let width = self.options.indent_width;
        match self.mode {
            Mode::Script => self.push_block(js::format_js(text, width)),
            Mode::Style => self.push_block(css::format_css(text, width)),
            Mode::Markup if self.preserve_whitespace => self.lines.push(text.to_string()),
            Mode::Markup => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    self.push_indented(trimmed);
                }
            }
        }
    }

    /* ============================ Raw regions ============================= */

    fn raw(&mut self, region: RawRegion<'_>) {
        let kind = region.kind();
        if kind.preserves_whitespace() {
            // One line: the body must sit byte-for-byte between its tags.
            let mut line = indent::line(
                self.depth,
                self.options.indent_width,
                &self.tag_text(region.open_tag()),
            );
            line.push_str(region.body());
            line.push_str(&self.tag_text(region.close_tag()));
            self.lines.push(line);
            return;
        }

        self.push_tag(region.open_tag());
        self.depth += 1;
        let outer = self.mode;
        self.enter(kind);
        if !region.body().trim().is_empty() {
            self.text(region.body());
        }
        self.mode = outer;
        self.depth = self.depth.saturating_sub(1);
        self.push_tag(region.close_tag());
    }

    /* =============================== Output =============================== */

    fn tag_text<'t>(&self, tag: &'t str) -> Cow<'t, str> {
        if self.options.reflow_multiline_tags && tag.contains(['\n', '\r']) {
            Cow::Owned(normalize_tag(tag))
        } else {
            Cow::Borrowed(tag)
        }
    }

    fn push_tag(&mut self, tag: &str) {
        let tag = self.tag_text(tag);
        let line = indent::line(self.depth, self.options.indent_width, &tag);
        self.lines.push(line);
    }

    fn push_indented(&mut self, content: &str) {
        let line = indent::line(self.depth, self.options.indent_width, content);
        self.lines.push(line);
    }

    fn push_block(&mut self, block: String) {
        if !block.trim().is_empty() {
            self.lines.push(block);
        }
    }
}
