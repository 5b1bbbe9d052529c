use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::Result;
use crate::meeting::{Classification, Link, Location, Meeting, Status};
use crate::parser::patterns::{group, month_number};
use crate::parser::sentinel_date;
use crate::pipeline::Pipeline;
use crate::spiders::{ParseOutput, Response, Spider};

pub const NAME: &str = "alle_sanitary";
const AGENCY: &str = "Allegheny County Sanitary Authority (ALCOSAN)";
const TIMEZONE: &str = "America/New_York";
const ALLOWED_DOMAINS: &[&str] = &["www.alcosan.org"];
const START_URLS: &[&str] =
    &["http://www.alcosan.org/BoardofDirectors/2015MeetingSchedule/tabid/195/Default.aspx"];

const TITLE: &str = "ALCOSAN Board Meeting";
const DESCRIPTION: &str = "board meeting";
const LOCATION_NAME: &str = "William C. Trefz Boardroom";
const LOCATION_ADDRESS: &str = "3300 Preble Avenue, Pittsburgh, PA 15233";

static PARAGRAPH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static SCHEDULE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<month>[A-Za-z]+)\.?\s+(?P<day>\d{1,2}),\s*(?P<year>\d{4})").unwrap()
});

/// ALCOSAN board meetings: every line of the schedule paragraph naming a
/// weekday is a 4:30 PM meeting.
#[derive(Debug, Clone)]
pub struct AlleSanitary {
    pipeline: Pipeline,
}

impl AlleSanitary {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    fn meeting(&self, line: &str, response: &Response) -> Meeting {
        let date = schedule_date(line).unwrap_or_else(|| {
            warn!("Unparseable schedule line {:?}", line);
            sentinel_date()
        });
        let start_time = NaiveTime::from_hms_opt(16, 30, 0).unwrap_or(NaiveTime::MIN);

        let meeting = Meeting {
            title: TITLE.to_string(),
            description: DESCRIPTION.to_string(),
            classification: Classification::NotClassified,
            start: date.and_time(start_time),
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: Location {
                name: LOCATION_NAME.to_string(),
                address: LOCATION_ADDRESS.to_string(),
                coordinates: None,
            },
            links: vec![Link {
                href: String::new(),
                title: String::new(),
                page: None,
            }],
            source: response.url.clone(),
            status: Status::Tentative,
            id: String::new(),
        };
        self.pipeline.finalize(NAME, meeting)
    }
}

impl Spider for AlleSanitary {
    fn name(&self) -> &'static str {
        NAME
    }

    fn agency(&self) -> &'static str {
        AGENCY
    }

    fn timezone(&self) -> &'static str {
        TIMEZONE
    }

    fn allowed_domains(&self) -> &'static [&'static str] {
        ALLOWED_DOMAINS
    }

    fn start_urls(&self) -> &'static [&'static str] {
        START_URLS
    }

    fn parse(&self, response: &Response) -> Result<ParseOutput> {
        let mut out = ParseOutput::default();
        for line in schedule_lines(&response.text()) {
            if line.contains("day") {
                out.add_item(self.meeting(&line, response));
            }
        }
        debug!("{}: {} meetings", response.url, out.items.len());
        Ok(out)
    }
}

/// Text of each `<br>`-separated line of the first paragraph.
fn schedule_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Some(paragraph) = doc.select(&PARAGRAPH_SEL).next() else {
        return Vec::new();
    };
    BR_RE
        .split(&paragraph.inner_html())
        .map(|chunk| {
            Html::parse_fragment(chunk)
                .root_element()
                .text()
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

fn schedule_date(line: &str) -> Option<NaiveDate> {
    let caps = SCHEDULE_DATE_RE.captures(line)?;
    let month = month_number(group(&caps, "month")?)?;
    let day = group(&caps, "day")?.parse().ok()?;
    let year = group(&caps, "year")?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spiders::RequestMeta;
    use chrono::NaiveDateTime;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn parse_fixture() -> ParseOutput {
        let html = std::fs::read_to_string("tests/fixtures/alcosan_schedule.html").unwrap();
        let response = Response {
            url: START_URLS[0].to_string(),
            body: html.into_bytes(),
            meta: RequestMeta::default(),
        };
        AlleSanitary::new(Pipeline::at(at(2019, 2, 23, 0, 0)))
            .parse(&response)
            .unwrap()
    }

    #[test]
    fn one_meeting_per_weekday_line() {
        let out = parse_fixture();
        assert_eq!(out.items.len(), 5);
        assert!(out.requests.is_empty());
        let starts: Vec<_> = out.items.iter().map(|m| m.start).collect();
        assert_eq!(starts[0], at(2019, 1, 17, 16, 30));
        assert_eq!(starts[3], at(2019, 4, 18, 16, 30));
    }

    #[test]
    fn malformed_line_gets_sentinel_date() {
        let out = parse_fixture();
        assert_eq!(out.items[4].start, at(1, 1, 1, 16, 30));
    }

    #[test]
    fn fixed_fields() {
        let out = parse_fixture();
        let m = &out.items[0];
        assert_eq!(m.title, TITLE);
        assert_eq!(m.description, DESCRIPTION);
        assert_eq!(m.classification, Classification::NotClassified);
        assert_eq!(m.location.name, LOCATION_NAME);
        assert_eq!(m.location.address, LOCATION_ADDRESS);
        assert_eq!(m.links, vec![Link { href: String::new(), title: String::new(), page: None }]);
        assert_eq!(m.source, START_URLS[0]);
        assert_eq!(m.status, Status::Passed);
        assert_eq!(m.id, "alle_sanitary/201901171630/x/alcosan_board_meeting");
        assert_eq!(out.items[2].status, Status::Tentative);
    }

    #[test]
    fn lines_split_on_br() {
        let lines = schedule_lines("<p>Monday, May 6, 2019<br/>Tuesday, June 4, 2019<BR>Notes</p><p>other</p>");
        assert_eq!(lines, vec!["Monday, May 6, 2019", "Tuesday, June 4, 2019", "Notes"]);
    }

    #[test]
    fn no_paragraph_no_lines() {
        assert!(schedule_lines("<div>Thursday, January 17, 2019</div>").is_empty());
    }
}
