//! Fixed-width padding helpers shared by the normalizer and the encoder.

/// Left-pads `s` with zeros up to `width` characters, keeping a leading sign in front.
///
/// Strings already at or over `width` are returned unchanged, never truncated.
pub(crate) fn zfill(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let zeros = "0".repeat(width - len);
    match s.strip_prefix(['-', '+']) {
        Some(rest) => format!("{}{}{}", &s[..1], zeros, rest),
        None => format!("{}{}", zeros, s),
    }
}

/// Right-pads `s` with spaces up to `width` characters.
pub(crate) fn ljust(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// A run of `width` spaces for fields left blank.
pub(crate) fn blank(width: usize) -> String {
    " ".repeat(width)
}
