// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Breadth-first crawling starting from a list of seed URLs
// - Every URL is fetched at most once per run
// - A page budget: only successful fetches count against it
// - Polite crawling with a fixed delay after each fetched page
// - Optional pool of workers sharing one frontier
//
// Submodules:
// - frontier: the FIFO queue + seen set
// - controller: the crawl loop and its workers
// =============================================================================

mod controller;
mod frontier;

pub use controller::{CrawlReport, CrawlState, Crawler};
