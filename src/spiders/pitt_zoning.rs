use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::meeting::{Classification, Link, Meeting, Status};
use crate::parser::{self, listing, PageContext, PageFields};
use crate::pdf;
use crate::pipeline::Pipeline;
use crate::spiders::{ParseOutput, Request, RequestMeta, Response, Spider};

pub const NAME: &str = "pitt_zoning";
const AGENCY: &str = "Pittsburgh Zoning Board of Adjustment";
const TIMEZONE: &str = "America/New_York";
const ALLOWED_DOMAINS: &[&str] = &["pittsburghpa.gov", "apps.pittsburghpa.gov"];
const START_URLS: &[&str] = &["http://pittsburghpa.gov/dcp/zba-schedule"];
const LINK_TITLE: &str = "Agenda PDF";

/// Zoning Board of Adjustment: a listing of agenda PDFs, one meeting per
/// readable page of each agenda.
#[derive(Debug, Clone)]
pub struct PittZoning {
    pipeline: Pipeline,
}

impl PittZoning {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    fn assemble(&self, fields: PageFields, page: usize, response: &Response) -> Meeting {
        let meeting = Meeting {
            title: fields.title,
            description: fields.description,
            classification: Classification::Board,
            start: fields.start,
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: fields.location,
            links: vec![Link {
                href: response.url.clone(),
                title: LINK_TITLE.to_string(),
                page: Some(page),
            }],
            source: response.url.clone(),
            status: Status::Tentative,
            id: String::new(),
        };
        self.pipeline.finalize(NAME, meeting)
    }
}

impl Spider for PittZoning {
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

    /// One document request per listing row, carrying the page title and
    /// posted date as fallbacks.
    fn parse(&self, response: &Response) -> Result<ParseOutput> {
        debug!("Parsing listing {}", response.url);
        let base = Url::parse(&response.url)?;
        let listing = listing::scan(&response.text(), &base);

        let mut out = ParseOutput::default();
        for row in listing.rows {
            debug!("Found agenda {}", row.href);
            out.add_request(Request::document(
                row.href,
                RequestMeta {
                    title: listing.title.clone(),
                    date: Some(row.date),
                },
            ));
        }
        Ok(out)
    }

    fn parse_document(&self, response: &Response) -> Result<ParseOutput> {
        debug!("Parsing agenda {}", response.url);
        let text = pdf::extract_page_texts(&response.body)?;
        let cover = text.pages.first().map(String::as_str).unwrap_or_default();
        // listing title first, then the document's own title
        let default_title = response.meta.title.as_deref().or(text.title.as_deref());

        let mut out = ParseOutput::default();
        for (page, page_text) in text.pages.iter().enumerate() {
            let ctx = PageContext {
                text: page_text,
                cover,
                default_title,
                default_date: response.meta.date,
            };
            match parser::extract_page(&ctx) {
                Some(fields) => out.add_item(self.assemble(fields, page, response)),
                None => debug!("Page {} of {} has no readable text, skipping", page, response.url),
            }
        }

        info!(
            "{}: {} meetings from {} pages",
            response.url,
            out.items.len(),
            text.pages.len()
        );
        Ok(out)
    }
}
