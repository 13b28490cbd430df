// src/extract/html.rs
// =============================================================================
// This module extracts plaintext and links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, which repairs broken markup instead of failing
//
// Plaintext rendering:
// - Walk every text node in document order
// - Skip text inside <script>, <style>, <noscript> and <template>
// - Collapse whitespace inside each text run, one run per output line
//
// Links are returned exactly as written in the href attribute. We don't
// resolve relative links: the link filter only ever admits absolute
// https:// URLs anyway.
// =============================================================================

use scraper::{Html, Selector};

use super::{ExtractError, ExtractedLink, ExtractedPage, Extractor};

const ANCHOR_SELECTOR: &str = "a[href]";

// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HtmlExtractor {
    fn extract(&self, markup: &str) -> Result<ExtractedPage, ExtractError> {
        let document = Html::parse_document(markup);

        let plaintext = render_text(&document);
        let links = collect_links(&document)?;

        Ok(ExtractedPage { plaintext, links })
    }
}

// Renders the visible text of a document, one trimmed text run per line
fn render_text(document: &Html) -> String {
    let mut lines = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

// Collects (href, anchor text) for every <a> that has an href
fn collect_links(document: &Html) -> Result<Vec<ExtractedLink>, ExtractError> {
    let selector = Selector::parse(ANCHOR_SELECTOR).map_err(|e| ExtractError::Selector {
        selector: ANCHOR_SELECTOR.to_string(),
        reason: e.to_string(),
    })?;

    let links = document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let anchor_text: String = element.text().collect();
            Some(ExtractedLink::new(href, anchor_text))
        })
        .collect();

    Ok(links)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let ... else`?
//    - `let Some(text) = x else { continue };` binds text if x is Some,
//      otherwise runs the else block (which must leave the loop/function)
//
// 2. Why can't Html be kept around between awaits?
//    - scraper's Html isn't Send, so it must not live across an .await in
//      a tokio task. Extraction is synchronous and returns owned Strings.
// -----------------------------------------------------------------------------
