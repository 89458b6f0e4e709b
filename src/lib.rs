//! deminify-html: re-indent minified HTML.
//!
//! The document is carved into ordinary markup and raw regions (`script`,
//! `style`, `pre`, `textarea`), the markup is split into tag and text
//! tokens, and one pass over the tokens emits one line per tag or text run,
//! indented by nesting depth.
//!
//! - Inline elements (`span`, `a`, `em`, ...), void elements and `/>` tags
//!   never change depth.
//! - `style` and `script` bodies go through small brace-based CSS/JS
//!   reformatters whose output keeps its own indentation.
//! - `pre` and `textarea` bodies are copied byte-for-byte.
//! - Malformed markup never fails: unmatched closers clamp depth at zero and
//!   unterminated tags or regions degrade to plain text.
//!
//! # Example
//! ```
//! let out = deminify_html::format("<div><p>Hello</p></div>", 2);
//! assert_eq!(out, "<div>\n  <p>\n    Hello\n  </p>\n</div>");
//! ```

pub mod css;
mod engine;
pub mod error;
pub mod files;
mod indent;
pub mod js;
pub mod regions;
mod tags;
pub mod tokenizer;

pub use error::{Error, Result};
pub use regions::{RawRegion, Segment};
pub use tags::RawKind;
pub use tokenizer::Token;

use engine::Formatter;

/// Formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Collapse the whitespace of tags written over several lines so each
    /// tag fits on its output line.
    pub reflow_multiline_tags: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            indent_width: 2,
            reflow_multiline_tags: true,
        }
    }
}

/// Re-indent `document` with `indent_width` spaces per level.
pub fn format(document: &str, indent_width: usize) -> String {
    let options = Options {
        indent_width,
        ..Options::default()
    };
    format_with_options(document, &options)
}

/// Re-indent `document` with explicit options.
pub fn format_with_options(document: &str, options: &Options) -> String {
    let mut formatter = Formatter::new(options);
    for token in tokenizer::tokenize(document) {
        formatter.feed(token);
    }
    let out = formatter.finish();
    tracing::debug!(
        input_bytes = document.len(),
        output_bytes = out.len(),
        "formatted document"
    );
    out
}
