use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};
use crate::settings::Settings;
use crate::spiders::{Request, Response};

/// Sequential HTTP fetcher with exponential backoff on 429 and 5xx.
pub struct Fetcher {
    client: reqwest::Client,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_retries: settings.max_retries,
            backoff: Duration::from_millis(settings.backoff_ms),
        })
    }

    pub async fn fetch(&self, request: &Request) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(request).await {
                Err(ScrapeError::Status { status, .. })
                    if should_retry(status) && attempt < self.max_retries =>
                {
                    let backoff = backoff_delay(self.backoff, attempt);
                    warn!(
                        "HTTP {} on {} (attempt {}/{}), backing off {:.1}s",
                        status,
                        request.url,
                        attempt + 1,
                        self.max_retries,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn fetch_once(&self, request: &Request) -> Result<Response> {
        debug!("GET {}", request.url);
        let resp = self.client.get(&request.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }
        let url = resp.url().to_string();
        let body = resp.bytes().await?.to_vec();
        Ok(Response {
            url,
            body,
            meta: request.meta.clone(),
        })
    }
}

/// `base * 2^attempt`, saturating so a large configured retry count never
/// overflows.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

fn should_retry(status: u16) -> bool {
    StatusCode::from_u16(status)
        .map(|s| s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error())
        .unwrap_or(false)
}
