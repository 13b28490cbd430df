// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: the URLs we know about but haven't fetched yet.
//
// How it works:
// - A FIFO queue holds pending URLs (breadth-first order from the seeds)
// - A "seen" set remembers every URL that was ever enqueued
// - A URL goes into the seen set at the same moment it is queued, so the
//   same URL can never be queued (and therefore fetched) twice in one run
//
// URLs are compared as plain strings. "https://a.com" and "https://a.com/"
// are two different entries.
//
// Rust concepts:
// - VecDeque: push_back() / pop_front() give us a FIFO queue
// - HashSet::insert returns false when the value was already present
// =============================================================================

use std::collections::{HashSet, VecDeque};

use thiserror::Error;

/// Returned by [`Frontier::dequeue`] when nothing is left to crawl.
///
/// This isn't a failure, it's how the crawler knows it ran out of work.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("frontier is empty")]
pub struct FrontierEmpty;

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frontier from seed URLs, dropping repeated seeds.
    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frontier = Self::new();
        for seed in seeds {
            frontier.enqueue(seed);
        }
        frontier
    }

    /// Adds a URL to the tail of the queue unless it has been seen before.
    ///
    /// Returns true if the URL was actually queued.
    pub fn enqueue(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        // Only a first sighting makes it into the queue
        if self.seen.insert(url.clone()) {
            self.queue.push_back(url);
            true
        } else {
            false
        }
    }

    /// Removes and returns the oldest pending URL.
    pub fn dequeue(&mut self) -> Result<String, FrontierEmpty> {
        self.queue.pop_front().ok_or(FrontierEmpty)
    }

    /// Number of URLs still waiting to be fetched.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    /// Pending URLs in the order they would be fetched.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
