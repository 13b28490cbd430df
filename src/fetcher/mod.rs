// src/fetcher/mod.rs
// =============================================================================
// Page fetching.
//
// The crawler only knows the Fetcher trait: "give me the markup for this
// URL, or tell me why you couldn't". That lets the tests swap in a fake
// fetcher with canned pages, while the binary uses HttpFetcher (reqwest).
//
// Submodules:
// - http: the reqwest implementation
// =============================================================================

mod http;

pub use http::HttpFetcher;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// The three ways a single fetch can fail.
///
/// All of them are per-page problems: the crawler logs them and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request or the body download took longer than the timeout
    Timeout,
    /// DNS lookup failed, connection refused or reset
    Connection,
    /// The server answered, but not with a usable page (bad status, TLS,
    /// redirect loop, undecodable body, malformed URL)
    Protocol,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Connection => "connection",
            FetchErrorKind::Protocol => "protocol",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} error: {detail}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub detail: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Markup on success, a categorized error otherwise.
pub type FetchOutcome = Result<String, FetchError>;

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}
