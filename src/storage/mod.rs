// src/storage/mod.rs
// =============================================================================
// Saving page text.
//
// The crawler hands every successfully fetched page to a PersistenceSink.
// The binary uses FileSink (one file per URL in the output folder); tests
// use an in-memory sink.
//
// Unlike fetch errors, a failed write stops the whole crawl: if we can't
// write one page we almost certainly can't write the next one either.
// =============================================================================

mod file;

pub use file::FileSink;

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot create output folder {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Stores `text` for `url` and returns where it went.
    async fn persist(&self, url: &str, text: &str) -> Result<PathBuf, PersistError>;
}
