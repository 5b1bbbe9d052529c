use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

// Spelled-out month names as they appear on hearing agendas.
const MONTH: &str = r"J(?:anuary|u(?:ne|ly))|February|Ma(?:rch|y)|A(?:pril|ugust)|(?:(?:Sept|Nov|Dec)em|Octo)ber";

/// Title, then a long-form date directly followed by "Date of Hearing:" or
/// "Time of Hearing:". `title` is greedy, so the last such date wins.
pub static HEARING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<title>[\s\S]*)(?P<date>(?P<month>{MONTH})\s+(?P<day>\d{{1,2}}),\s+(?P<year>\d{{4}}))[\s\S]?(?:Date|Time)\sof\sHearing:"
    ))
    .unwrap()
});

pub static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<month>{MONTH})\s+(?P<day>\d{{1,2}}),\s+(?P<year>\d{{4}})"
    ))
    .unwrap()
});

pub static DATE_ABBR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sept?|Oct|Nov|Dec)\s+(?P<day>\d{1,2}),?\s+(?P<year>\d{4})",
    )
    .unwrap()
});

/// `H:MM`, the agenda body, a long blank gap, then an optional
/// `name-prefix` + `street number .. zip code` tail.
pub static AGENDA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<hour>\d{1,2}):(?P<minute>\d{2})(?P<description>[\s\S]*?)\n{8,50}(?:(?P<address1>.*?)(?P<address2>\d{1,9}[\s\S]*\d{5}))?",
    )
    .unwrap()
});

pub static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(?P<description>[\s\S]*?)\n{8,50}").unwrap());

pub static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<hour>\d{1,2}):(?P<minute>\d{2})").unwrap());

pub static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,9}[\s\S]*?\d{5}").unwrap());

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w{4}").unwrap());

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Month number for a full or 3-letter month name, any case.
pub fn month_number(name: &str) -> Option<u32> {
    let lower = name.trim().to_lowercase();
    if lower == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == lower || (lower.len() == 3 && m.starts_with(&lower)))
        .map(|i| i as u32 + 1)
}

/// Capitalized full month name for a month number.
pub fn month_name(month: u32) -> Option<String> {
    let name = MONTHS.get(month.checked_sub(1)? as usize)?;
    let mut chars = name.chars();
    let first = chars.next()?.to_ascii_uppercase();
    Some(std::iter::once(first).chain(chars).collect())
}

/// Coarse "this is real text" check: at least one 4-character word.
pub fn has_word(text: &str) -> bool {
    WORD_RE.is_match(text)
}

/// Named group as a non-empty str. An empty capture counts as no match.
pub fn group<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str()).filter(|s| !s.is_empty())
}

/// Calendar date from `month`, `day` and `year` groups.
pub fn captured_date(caps: &Captures) -> Option<NaiveDate> {
    let month = month_number(group(caps, "month")?)?;
    let day = group(caps, "day")?.parse().ok()?;
    let year = group(caps, "year")?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_table_is_case_insensitive() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("MAY"), Some(5));
        assert_eq!(month_number("dec"), Some(12));
        assert_eq!(month_number("Sept"), Some(9));
        assert_eq!(month_number("Janu"), None);
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn full_month_names_round_trip() {
        for month in 1..=12 {
            let name = month_name(month).unwrap();
            let text = format!("{} 7, 2020", name);
            let caps = DATE_RE.captures(&text).unwrap();
            let date = captured_date(&caps).unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2020, month, 7).unwrap(), "{}", text);
        }
    }

    #[test]
    fn abbreviated_month_names_round_trip() {
        for month in 1..=12 {
            let abbr: String = month_name(month).unwrap().chars().take(3).collect();
            let text = format!("{} 21 2018", abbr);
            let caps = DATE_ABBR_RE.captures(&text).unwrap();
            let date = captured_date(&caps).unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2018, month, 21).unwrap(), "{}", text);
        }
    }

    #[test]
    fn sept_abbreviation() {
        let caps = DATE_ABBR_RE.captures("Hearing Sept 12, 2019").unwrap();
        assert_eq!(&caps["month"], "Sept");
        assert_eq!(captured_date(&caps), NaiveDate::from_ymd_opt(2019, 9, 12));
    }

    #[test]
    fn impossible_date_is_none() {
        let caps = DATE_RE.captures("February 30, 2019").unwrap();
        assert_eq!(captured_date(&caps), None);
    }

    #[test]
    fn month_name_bounds() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_name(9).as_deref(), Some("September"));
    }

    #[test]
    fn word_check() {
        assert!(has_word("a zoning page"));
        assert!(!has_word("12 a b\n\n-- . ab"));
        assert!(!has_word(""));
    }

    #[test]
    fn empty_group_is_miss() {
        let caps = HEARING_RE
            .captures("January 10, 2019 Date of Hearing: 6:30")
            .unwrap();
        assert_eq!(group(&caps, "title"), None);
        assert_eq!(group(&caps, "year"), Some("2019"));
    }
}
