// src/fetcher/http.rs
// =============================================================================
// The real page fetcher, backed by reqwest.
//
// Key functionality:
// - One GET request per URL, no retries
// - Fixed timeout and User-Agent, both taken from CrawlConfig
// - Every reqwest failure is sorted into Timeout / Connection / Protocol
// - Non-2xx answers become Protocol errors unless accept_error_pages is set
//
// Rust concepts:
// - Result<T, E>: fetch errors are values, never panics
// - Client is cheap to clone (it's an Arc internally) and pools connections
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, FetchErrorKind, FetchOutcome, Fetcher};
use crate::config::CrawlConfig;

pub struct HttpFetcher {
    client: Client,
    accept_error_pages: bool,
}

impl HttpFetcher {
    // Builds the HTTP client once; it's reused for every page in the crawl.
    pub fn new(config: &CrawlConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            accept_error_pages: config.accept_error_pages,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() && !self.accept_error_pages {
            return Err(FetchError::new(
                FetchErrorKind::Protocol,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        // Reading the body can still time out or hit a broken connection
        response.text().await.map_err(categorize_error)
    }
}

// Sorts a reqwest error into one of our three kinds.
//
// DNS failures and refused connections both show up as connect errors.
// TLS handshake problems usually do too; any certificate error that doesn't
// is caught by the message check and counted as a protocol problem.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    let kind = if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_connect() {
        FetchErrorKind::Connection
    } else if error.is_redirect() || error.is_status() || error.is_decode() {
        FetchErrorKind::Protocol
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        FetchErrorKind::Protocol
    } else if error.is_builder() || error.is_request() || error.is_body() {
        FetchErrorKind::Protocol
    } else {
        FetchErrorKind::Connection
    };

    FetchError::new(kind, error_string)
}
