use std::sync::OnceLock;

use regex::Regex;

/// A parenthetical series marker such as `(Series 03)` or `(series 3)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMarker {
    /// Byte offset of the opening parenthesis
    pub start: usize,
    /// Byte offset one past the closing parenthesis
    pub end: usize,
    /// Parsed series number
    pub index: u32,
    /// Digits as they appear in the text, leading zeros included
    pub digits: String,
}

fn series_regex() -> &'static Regex {
    static SERIES_RE: OnceLock<Regex> = OnceLock::new();
    SERIES_RE.get_or_init(|| Regex::new(r"(?i)\(series\s*(\d+)\)").expect("series marker pattern is valid"))
}

/// Find the first case-insensitive `(series N)` marker in `text`.
///
/// Returns `None` when there is no marker or its number does not fit a `u32`.
pub fn find_series_marker(text: &str) -> Option<SeriesMarker> {
    let captures = series_regex().captures(text)?;
    let whole = captures.get(0)?;
    let digits = captures.get(1)?.as_str();

    Some(SeriesMarker {
        start: whole.start(),
        end: whole.end(),
        index: digits.parse().ok()?,
        digits: digits.to_string(),
    })
}
