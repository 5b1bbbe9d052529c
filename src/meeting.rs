use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    #[serde(rename = "Board")]
    Board,
    #[serde(rename = "Not classified")]
    NotClassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Cancelled,
    Tentative,
    Passed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub title: String,
    /// Zero-based page of the linked document the meeting was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

/// One public meeting, as handed to the downstream pipeline.
///
/// `status` and `id` are filled by [`crate::pipeline::Pipeline::finalize`]
/// right before the record is emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meeting {
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: Status,
    pub id: String,
}
