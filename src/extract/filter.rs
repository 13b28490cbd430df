// src/extract/filter.rs
// =============================================================================
// Decides which extracted links get crawled next.
//
// A link is admissible when BOTH hold:
// 1. Its href starts with "https://" (case-sensitive, plain http is skipped)
// 2. Its anchor text, lower-cased and split on whitespace, contains at least
//    one word from the keyword set
//
// Words must match whole: "news" matches "Latest news" but not "newsletter"
// or "news," (punctuation is part of the word).
//
// An empty keyword set admits nothing, so a crawl without a keyword file
// only fetches its seed pages.
// =============================================================================

use std::collections::HashSet;

use super::ExtractedLink;

const SECURE_SCHEME: &str = "https://";

/// Lower-cased relevance terms, fixed for the whole crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: HashSet<String>,
}

impl KeywordSet {
    /// Builds the set, lower-casing and trimming every word and dropping
    /// blank ones.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True if any whitespace-separated word of `text` is a keyword.
    pub fn matches(&self, text: &str) -> bool {
        if self.words.is_empty() {
            return false;
        }
        text.to_lowercase()
            .split_whitespace()
            .any(|token| self.words.contains(token))
    }
}

pub fn is_admissible(link: &ExtractedLink, keywords: &KeywordSet) -> bool {
    link.href.starts_with(SECURE_SCHEME) && keywords.matches(&link.anchor_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn news() -> KeywordSet {
        KeywordSet::new(["news"])
    }

    #[test]
    fn test_https_with_keyword_is_admitted() {
        let link = ExtractedLink::new("https://a.com", "Latest news");
        assert!(is_admissible(&link, &news()));
    }

    #[test]
    fn test_plain_http_is_rejected() {
        let link = ExtractedLink::new("http://b.com", "Latest news");
        assert!(!is_admissible(&link, &news()));
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        let link = ExtractedLink::new("HTTPS://a.com", "news");
        assert!(!is_admissible(&link, &news()));
    }

    #[test]
    fn test_relative_href_is_rejected() {
        let link = ExtractedLink::new("/news", "news");
        assert!(!is_admissible(&link, &news()));
    }

    #[test]
    fn test_keyword_match_ignores_case() {
        let link = ExtractedLink::new("https://a.com", "BREAKING NEWS");
        assert!(is_admissible(&link, &KeywordSet::new(["News"])));
    }

    #[test]
    fn test_substring_is_not_a_match() {
        let link = ExtractedLink::new("https://a.com", "Subscribe to our newsletter");
        assert!(!is_admissible(&link, &news()));
    }

    #[test]
    fn test_punctuation_stays_attached() {
        let link = ExtractedLink::new("https://a.com", "news, weather");
        assert!(!is_admissible(&link, &news()));
        assert!(is_admissible(&link, &KeywordSet::new(["weather"])));
    }

    #[test]
    fn test_empty_keyword_set_admits_nothing() {
        let link = ExtractedLink::new("https://a.com", "anything at all");
        assert!(!is_admissible(&link, &KeywordSet::default()));
    }

    #[test]
    fn test_keyword_set_normalizes_input() {
        let keywords = KeywordSet::new(["  Rust\n", "", "rust", "CRATES "]);
        assert_eq!(keywords.len(), 2);
        assert!(keywords.matches("rust"));
        assert!(keywords.matches("crates"));
    }
}
