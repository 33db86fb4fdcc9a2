use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x0C|\r?\n[ \t]*\r?\n").unwrap());

/// Separator placed between structural units (elements, pages).
pub const UNIT_SEPARATOR: &str = "\n\n";

/// Join structural units in order, one blank line between each.
pub fn join_units<I, S>(units: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    units
        .into_iter()
        .map(|u| u.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(UNIT_SEPARATOR)
}

/// Split raw text into trimmed, non-empty paragraph elements.
///
/// Paragraphs are separated by blank lines or form feeds (page breaks).
pub fn split_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Number of characters left after trimming surrounding whitespace.
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}
