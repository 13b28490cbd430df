// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct and clap generates the
// parsing code (plus --help and --version) from the attributes.
//
// The four main flags (--folder, --links, --keywords, --maxlimit) keep
// their short forms; everything else is long-only tuning.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{
    CrawlConfig, DEFAULT_DELAY_SECS, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "keyword-crawler",
    version = "0.1.0",
    about = "Saves the text of web pages, following links whose text matches your keywords",
    long_about = "keyword-crawler fetches every URL in the links file, saves each page's text into \
                  the output folder, and keeps crawling https:// links whose anchor text contains \
                  one of the keywords, until --maxlimit pages have been saved."
)]
pub struct Cli {
    /// Folder to save page text to (created if it doesn't exist)
    #[arg(short, long)]
    pub folder: PathBuf,

    /// Text file containing a list of links, one per line
    #[arg(short, long)]
    pub links: PathBuf,

    /// Text file containing 1 keyword per line for recursive link scraping
    ///
    /// Without it, only the pages in the links file are fetched.
    #[arg(short, long)]
    pub keywords: Option<PathBuf>,

    /// Maximum number of pages to save
    #[arg(short, long = "maxlimit", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_limit: usize,

    /// Seconds to wait after each saved page
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    pub delay: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Number of pages fetched concurrently (the delay applies per worker)
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    /// Save 4xx/5xx responses like normal pages instead of skipping them
    #[arg(long)]
    pub accept_error_pages: bool,

    /// Print the crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Show debug output (every enqueued link, worker activity)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_pages: self.max_limit,
            user_agent: self.user_agent.clone(),
            fetch_timeout: Duration::from_secs(self.timeout),
            politeness_delay: Duration::from_secs(self.delay),
            workers: self.workers,
            accept_error_pages: self.accept_error_pages,
        }
    }
}
