// src/js.rs
//
// Statement/brace reformatter for the body of a <script> element. Not a
// JavaScript parser: a ';' or brace inside a string, regex literal or
// comment is split like any other.

use crate::indent;

/// Reformat a script: break after `;`, `{` and `}`, then indent by brace
/// depth. Blank input comes back unchanged.
pub fn format_js(source: &str, indent_width: usize) -> String {
    if source.trim().is_empty() {
        return source.to_string();
    }

    let js = break_after(source.trim(), ';', ";");
    let js = break_after(&js, '{', " {");
    let js = break_after(&js, '}', "}");

    let mut out: Vec<String> = Vec::new();
    let mut level = 0usize;
    for line in js.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.ends_with('{') {
            out.push(indent::line(level, indent_width, line));
            level += 1;
        } else if line.starts_with('}') {
            level = level.saturating_sub(1);
            out.push(indent::line(level, indent_width, line));
        } else {
            out.push(indent::line(level, indent_width, line));
        }
    }
    out.join("\n")
}

/// Replace every `ch` and the whitespace after it with `replacement` and a
/// newline.
fn break_after(src: &str, ch: char, replacement: &str) -> String {
    let mut out = String::with_capacity(src.len() + src.len() / 8);
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ch {
            out.push(c);
            continue;
        }
        out.push_str(replacement);
        out.push('\n');
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
    }
    out
}
