// src/css.rs
//
// Line/brace reformatter for the body of a <style> element. It knows nothing
// about strings, comments or braces inside values.

use crate::indent;

const MEDIA: &str = "@media";

/// Reformat a stylesheet: one selector, brace or declaration per line,
/// indented by brace depth. Blank input comes back unchanged.
pub fn format_css(source: &str, indent_width: usize) -> String {
    if source.trim().is_empty() {
        return source.to_string();
    }

    let css = collapse_whitespace(source.trim());
    let css = break_media_preludes(&css);
    let css = isolate_braces(&css);
    let css = break_after_semicolons(&css);

    let mut out: Vec<String> = Vec::new();
    let mut level = 0usize;
    for line in css.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line == "}" {
            level = level.saturating_sub(1);
        }
        out.push(indent::line(level, indent_width, line));
        if line.ends_with('{') {
            level += 1;
        }
    }
    out.join("\n")
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    out
}

/// `@media <prelude>{` → `@media <prelude> {` + newline.
fn break_media_preludes(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut rest = s;
    while let Some(at) = rest.find(MEDIA) {
        let after = at + MEDIA.len();
        match rest[after..].find('{') {
            Some(off) if off > 0 => {
                let brace = after + off;
                out.push_str(&rest[..brace]);
                out.push_str(" {\n");
                rest = &rest[brace + 1..];
            }
            _ => {
                out.push_str(&rest[..after]);
                rest = &rest[after..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn isolate_braces(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        if c == '{' || c == '}' {
            out.push('\n');
            out.push(c);
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

fn break_after_semicolons(s: &str) -> String {
    s.replace(';', ";\n")
}
