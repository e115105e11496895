//! # Line Normalizer
//!
//! Canonicalizes pasted order-list text into trimmed, single-spaced, non-empty lines.

use log::{debug, trace};

// Same set as a JavaScript `\s`: Unicode White_Space without NEL (U+0085), plus the BOM
fn is_blank(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Collapse internal whitespace runs to a single space and trim both ends
///
/// # Examples
///
/// ```rust
/// use order_cards::line_normalizer::normalize_line;
///
/// assert_eq!(normalize_line("  Krzesło \t  biurowe  "), "Krzesło biurowe");
/// ```
pub fn normalize_line(line: &str) -> String {
    line.split(is_blank)
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Split raw text into normalized, non-empty lines
///
/// Both `\n` and `\r\n` line breaks are accepted. Source order is preserved and
/// nothing is deduplicated here.
///
/// # Examples
///
/// ```rust
/// use order_cards::line_normalizer::normalize_lines;
///
/// let lines = normalize_lines("123.456.78\r\n\r\n   Krzesło  \n4");
/// assert_eq!(lines, vec!["123.456.78", "Krzesło", "4"]);
/// ```
pub fn normalize_lines(raw: &str) -> Vec<String> {
    let lines: Vec<String> = raw
        .lines()
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect();

    debug!(
        "Normalized {} raw bytes into {} lines",
        raw.len(),
        lines.len()
    );
    trace!("Normalized lines: {:?}", lines);
    lines
}
