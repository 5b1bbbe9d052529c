use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;

use crate::meeting::{Meeting, Status};

static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

const CANCEL_WORDS: &[&str] = &["cancel", "rescheduled", "postpone"];

/// Derives `status` and `id` for assembled meetings.
///
/// `now` is captured once so a whole crawl classifies past meetings against
/// the same instant.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    now: NaiveDateTime,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    pub fn at(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn finalize(&self, spider: &str, mut meeting: Meeting) -> Meeting {
        meeting.status = self.status(&meeting);
        meeting.id = meeting_id(spider, &meeting);
        meeting
    }

    pub fn status(&self, meeting: &Meeting) -> Status {
        let text = format!("{} {}", meeting.title, meeting.description).to_lowercase();
        if CANCEL_WORDS.iter().any(|w| text.contains(w)) {
            Status::Cancelled
        } else if meeting.start < self.now {
            Status::Passed
        } else {
            Status::Tentative
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// `{spider}/{YYYYMMDDHHMM}/x/{underscore_title}`
pub fn meeting_id(spider: &str, meeting: &Meeting) -> String {
    let title = NON_ALNUM_RE
        .replace_all(&meeting.title, "_")
        .trim_matches('_')
        .to_lowercase();
    format!("{}/{}/x/{}", spider, meeting.start.format("%Y%m%d%H%M"), title)
}
