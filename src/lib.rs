pub mod crawl;
pub mod error;
pub mod fetch;
pub mod meeting;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod settings;
pub mod spiders;

pub use error::{Result, ScrapeError};
pub use meeting::Meeting;
pub use spiders::{Callback, ParseOutput, Request, RequestMeta, Response, Spider};
