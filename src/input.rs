// src/input.rs
// =============================================================================
// Reads the seed URL and keyword files.
//
// Both are plain text, one entry per line. Trailing whitespace (including
// Windows line endings) is trimmed and blank lines are skipped. Keywords
// are lower-cased by KeywordSet.
// =============================================================================

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::extract::KeywordSet;

pub fn read_seed_urls(path: &Path) -> Result<Vec<String>> {
    read_lines(path).with_context(|| format!("Failed to read seed URLs from {}", path.display()))
}

// No file means no keywords: only the seed pages get crawled.
pub fn read_keywords(path: Option<&Path>) -> Result<KeywordSet> {
    let Some(path) = path else {
        return Ok(KeywordSet::default());
    };

    let words = read_lines(path)
        .with_context(|| format!("Failed to read keywords from {}", path.display()))?;
    Ok(KeywordSet::new(words))
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
