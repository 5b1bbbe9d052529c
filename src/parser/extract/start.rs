use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::parser::patterns::{
    captured_date, group, AGENDA_RE, DATE_ABBR_RE, DATE_RE, HEARING_RE, TIME_RE,
};
use crate::parser::sentinel_date;

/// Meeting start. Date and time resolve on their own chains, each ending in
/// the listing's date, then the sentinel date / midnight.
pub fn extract(text: &str, default: Option<NaiveDateTime>) -> NaiveDateTime {
    let date = date(text)
        .or_else(|| default.map(|d| d.date()))
        .unwrap_or_else(sentinel_date);
    let time = time(text)
        .or_else(|| default.map(|d| d.time()))
        .unwrap_or(NaiveTime::MIN);
    date.and_time(time)
}

fn date(text: &str) -> Option<NaiveDate> {
    [&*HEARING_RE, &*DATE_RE, &*DATE_ABBR_RE]
        .into_iter()
        .find_map(|re| captured_date(&re.captures(text)?))
}

fn time(text: &str) -> Option<NaiveTime> {
    [&*AGENDA_RE, &*TIME_RE]
        .into_iter()
        .find_map(|re| hour_minute(re, text))
}

fn hour_minute(re: &Regex, text: &str) -> Option<NaiveTime> {
    let caps = re.captures(text)?;
    let hour = group(&caps, "hour")?.parse().ok()?;
    let minute = group(&caps, "minute")?.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}
