// src/indent.rs

/// `content` prefixed by `level * width` spaces.
pub(crate) fn line(level: usize, width: usize, content: &str) -> String {
    let pad = level * width;
    let mut out = String::with_capacity(pad + content.len());
    out.extend(std::iter::repeat(' ').take(pad));
    out.push_str(content);
    out
}
