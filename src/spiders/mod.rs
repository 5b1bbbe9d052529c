pub mod alle_sanitary;
pub mod pitt_zoning;

use std::borrow::Cow;

use chrono::NaiveDateTime;
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::meeting::Meeting;
use crate::pipeline::Pipeline;

pub use alle_sanitary::AlleSanitary;
pub use pitt_zoning::PittZoning;

/// Which spider method handles a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Listing,
    Document,
}

/// Values a listing row hands to the document it links to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestMeta {
    pub title: Option<String>,
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub callback: Callback,
    pub meta: RequestMeta,
}

impl Request {
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            callback: Callback::Listing,
            meta: RequestMeta::default(),
        }
    }

    pub fn document(url: impl Into<String>, meta: RequestMeta) -> Self {
        Self {
            url: url.into(),
            callback: Callback::Document,
            meta,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub body: Vec<u8>,
    pub meta: RequestMeta,
}

impl Response {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Meetings and follow-up requests produced by one callback.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub items: Vec<Meeting>,
    pub requests: Vec<Request>,
}

impl ParseOutput {
    pub fn add_item(&mut self, item: Meeting) {
        self.items.push(item);
    }

    pub fn add_request(&mut self, request: Request) {
        self.requests.push(request);
    }
}

pub trait Spider {
    fn name(&self) -> &'static str;
    fn agency(&self) -> &'static str;
    fn timezone(&self) -> &'static str;
    fn allowed_domains(&self) -> &'static [&'static str];
    fn start_urls(&self) -> &'static [&'static str];

    /// Handle a start URL response.
    fn parse(&self, response: &Response) -> Result<ParseOutput>;

    /// Handle a linked document. Spiders that never request documents keep
    /// the empty default.
    fn parse_document(&self, _response: &Response) -> Result<ParseOutput> {
        Ok(ParseOutput::default())
    }

    fn start_requests(&self) -> Vec<Request> {
        self.start_urls().iter().map(|u| Request::listing(*u)).collect()
    }

    fn dispatch(&self, callback: Callback, response: &Response) -> Result<ParseOutput> {
        match callback {
            Callback::Listing => self.parse(response),
            Callback::Document => self.parse_document(response),
        }
    }

    /// Whether `url` is on one of the allowed domains or a subdomain of one.
    fn allows(&self, url: &str) -> bool {
        let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
            return false;
        };
        self.allowed_domains()
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
    }
}

pub const SPIDER_NAMES: &[&str] = &[pitt_zoning::NAME, alle_sanitary::NAME];

pub fn all(pipeline: Pipeline) -> Vec<Box<dyn Spider>> {
    vec![
        Box::new(PittZoning::new(pipeline)),
        Box::new(AlleSanitary::new(pipeline)),
    ]
}

pub fn by_name(name: &str, pipeline: Pipeline) -> Result<Box<dyn Spider>> {
    all(pipeline)
        .into_iter()
        .find(|s| s.name() == name)
        .ok_or_else(|| ScrapeError::UnknownSpider(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup() {
        let p = Pipeline::default();
        assert_eq!(by_name("pitt_zoning", p).unwrap().name(), "pitt_zoning");
        assert_eq!(by_name("alle_sanitary", p).unwrap().name(), "alle_sanitary");
        assert!(matches!(by_name("nope", p), Err(ScrapeError::UnknownSpider(_))));
        let names: Vec<_> = all(p).iter().map(|s| s.name()).collect();
        assert_eq!(names, SPIDER_NAMES);
    }

    #[test]
    fn allowed_domains_include_subdomains() {
        let s = PittZoning::new(Pipeline::default());
        assert!(s.allows("http://pittsburghpa.gov/dcp/zba-schedule"));
        assert!(s.allows("http://apps.pittsburghpa.gov/redtail/images/a.pdf"));
        assert!(!s.allows("http://notpittsburghpa.gov/a.pdf"));
        assert!(!s.allows("not a url"));
    }

    #[test]
    fn start_requests_use_listing_callback() {
        let s = AlleSanitary::new(Pipeline::default());
        let reqs = s.start_requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].callback, Callback::Listing);
        assert!(reqs[0].url.starts_with("http://www.alcosan.org/"));
    }
}
