// src/storage/file.rs
// =============================================================================
// Writes each page's text to <folder>/<sanitized url>.html
//
// Filename rules:
// - Every character outside [A-Za-z0-9_.- ] becomes a space
// - A trailing period becomes a space too
// - ".html" is appended (the content is plaintext, the suffix is historical)
//
// Example:
//   "https://example.com/a?b=1" -> "https   example.com a b 1.html"
//
// Files with the same derived name are overwritten without warning.
//
// There is no length limit. A URL with a long path or query string can
// produce a name over the filesystem's limit (255 bytes on most), and the
// write then fails with ENAMETOOLONG. That is a PersistError like any other
// write failure, so it ends the crawl.
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{PersistError, PersistenceSink};

const FILE_SUFFIX: &str = ".html";

// First alternative: anything outside the safe set.
// Second alternative: a period at the very end of the URL.
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\- ]|\.$").expect("filename pattern is valid"));

/// Derives the on-disk filename for a URL.
pub fn sanitize_filename(url: &str) -> String {
    let mut name = UNSAFE_CHARS.replace_all(url, " ").into_owned();
    name.push_str(FILE_SUFFIX);
    name
}

#[derive(Debug, Clone)]
pub struct FileSink {
    folder: PathBuf,
}

impl FileSink {
    /// Uses `folder` as the output directory, creating it if needed.
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let folder = folder.into();
        std::fs::create_dir_all(&folder).map_err(|source| PersistError::CreateDir {
            path: folder.clone(),
            source,
        })?;
        Ok(Self { folder })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }
}

#[async_trait]
impl PersistenceSink for FileSink {
    async fn persist(&self, url: &str, text: &str) -> Result<PathBuf, PersistError> {
        let path = self.folder.join(sanitize_filename(url));
        tokio::fs::write(&path, text.as_bytes())
            .await
            .map_err(|source| PersistError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
