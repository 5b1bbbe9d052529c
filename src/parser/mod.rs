pub mod extract;
pub mod listing;
pub mod patterns;

use chrono::{NaiveDate, NaiveDateTime};

use crate::meeting::Location;

/// One PDF page plus the fallbacks carried over from the listing row.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub text: &'a str,
    /// First page of the same document; hearing locations are printed there.
    pub cover: &'a str,
    pub default_title: Option<&'a str>,
    pub default_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageFields {
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub location: Location,
}

/// Run every field's fallback chain over one page. Pages without a single
/// 4-character word yield `None`.
pub fn extract_page(ctx: &PageContext) -> Option<PageFields> {
    if !patterns::has_word(ctx.text) {
        return None;
    }
    Some(PageFields {
        title: extract::title::extract(ctx.text, ctx.default_title),
        description: extract::description::extract(ctx.text),
        start: extract::start::extract(ctx.text, ctx.default_date),
        location: extract::location::extract(ctx.cover),
    })
}

/// 0001-01-01, used when no date can be recovered.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or_default()
}

// ── Tests ──
