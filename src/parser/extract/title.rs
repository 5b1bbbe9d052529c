use crate::parser::patterns::{group, has_word, HEARING_RE};

pub const DEFAULT_TITLE: &str = "ZONING BOARD OF ADJUSTMENT HEARING AGENDA";

/// Everything before the "Date of Hearing:" date, unless that leaves nothing
/// readable, in which case the listing's title (or [`DEFAULT_TITLE`]) is used.
pub fn extract(text: &str, default_title: Option<&str>) -> String {
    HEARING_RE
        .captures(text)
        .and_then(|caps| group(&caps, "title"))
        .filter(|title| has_word(title))
        .or_else(|| default_title.filter(|t| !t.trim().is_empty()))
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}
