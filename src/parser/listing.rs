use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::parser::sentinel_date;

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(r#"tr[class="data"]"#).unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    /// Absolute URL of the agenda document.
    pub href: String,
    /// Posted date from the second cell, or the sentinel date at midnight.
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub title: Option<String>,
    pub rows: Vec<ListingRow>,
}

/// Walk the `<tr class="data">` rows of an agenda listing page.
pub fn scan(html: &str, base: &Url) -> Listing {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE_SEL)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let mut rows = Vec::new();
    for row in doc.select(&ROW_SEL) {
        let Some(href) = row.select(&LINK_SEL).next().and_then(|a| a.value().attr("href")) else {
            debug!("Listing row without a link, skipping");
            continue;
        };
        let href = match base.join(href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Unusable agenda link {:?}: {}", href, e);
                continue;
            }
        };
        let date_text = row
            .select(&CELL_SEL)
            .nth(1)
            .map(|td| td.text().collect::<String>())
            .unwrap_or_default();
        rows.push(ListingRow {
            href,
            date: parse_posted_date(&date_text),
        });
    }

    debug!(rows = rows.len(), "Scanned listing page");
    Listing { title, rows }
}

/// `month/day/year`; anything else becomes the sentinel date.
pub fn parse_posted_date(text: &str) -> NaiveDateTime {
    let date = slash_date(text.trim()).unwrap_or_else(sentinel_date);
    date.and_time(NaiveTime::MIN)
}

fn slash_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('/').map(str::trim).collect();
    let [month, day, year] = parts.as_slice() else {
        return None;
    };
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
