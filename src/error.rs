use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to decode PDF: {0}")]
    Decode(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unknown spider: {0}")]
    UnknownSpider(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
