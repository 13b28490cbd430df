// src/extract/mod.rs
// =============================================================================
// Turning fetched markup into something the crawler can use.
//
// Submodules:
// - html: parses HTML into plaintext + (href, anchor text) pairs
// - filter: decides which of those links are worth crawling next
//
// Like the fetcher, extraction sits behind a trait so tests (or a future
// non-HTML parser) can plug in something else.
// =============================================================================

mod filter;
mod html;

pub use filter::{is_admissible, KeywordSet};
pub use html::HtmlExtractor;

use thiserror::Error;

/// One hyperlink found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// The raw href value, exactly as written in the page
    pub href: String,
    /// Visible text inside the <a> element
    pub anchor_text: String,
}

impl ExtractedLink {
    pub fn new(href: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            anchor_text: anchor_text.into(),
        }
    }
}

/// Everything we keep from a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub plaintext: String,
    /// Links in document order
    pub links: Vec<ExtractedLink>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },
}

pub trait Extractor: Send + Sync {
    fn extract(&self, markup: &str) -> Result<ExtractedPage, ExtractError>;
}
