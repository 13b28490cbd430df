// src/config.rs
// =============================================================================
// Immutable crawl settings.
//
// Everything the crawler needs to know that isn't a URL or a keyword lives
// here: the page budget, the identity string we send to servers, timeouts
// and the pause between requests. The struct is built once in main.rs and
// then only read.
// =============================================================================

use std::time::Duration;

use thiserror::Error;

/// Identity string sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/109.0";

pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DELAY_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be greater than 0")]
    NoWorkers,

    #[error("fetch timeout must be greater than 0 seconds")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum number of successful fetches in one run
    pub max_pages: usize,
    pub user_agent: String,
    pub fetch_timeout: Duration,
    /// Pause each worker takes after a successful fetch
    pub politeness_delay: Duration,
    pub workers: usize,
    /// Treat 4xx/5xx bodies as normal pages instead of fetch errors
    pub accept_error_pages: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            politeness_delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            workers: 1,
            accept_error_pages: false,
        }
    }
}

impl CrawlConfig {
    // A zero budget is fine (the crawl just ends immediately), but a crawl
    // with no workers or a zero timeout can't make progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
