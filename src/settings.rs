use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const DEFAULT_USER_AGENT: &str = concat!("city_scrapers/", env!("CARGO_PKG_VERSION"));

/// Crawl driver settings, overridable through `CITY_SCRAPERS_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("max_retries", 3_i64)?
            .set_default("backoff_ms", 2000_i64)?
            .set_default("timeout_secs", 30_i64)?
            .add_source(Environment::with_prefix("CITY_SCRAPERS").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 3,
            backoff_ms: 2000,
            timeout_secs: 30,
        }
    }
}
