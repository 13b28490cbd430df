// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Read the seed URLs and keywords
// 4. Wire the real fetcher, extractor and file sink into the crawler
// 5. Run the crawl, print the report
// 6. Exit with proper code (0 = finished, 1 = interrupted, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod extract;
mod fetcher;
mod input;
mod storage;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use crawl::{CrawlReport, CrawlState, Crawler};
use extract::HtmlExtractor;
use fetcher::HttpFetcher;
use storage::FileSink;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished (budget used up or nothing left to crawl)
//   Ok(1) = crawl interrupted with Ctrl-C
//   Err   = bad arguments, unreadable input, or output folder not writable
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.crawl_config();
    config.validate()?;

    let seeds = input::read_seed_urls(&cli.links)?;
    let keywords = input::read_keywords(cli.keywords.as_deref())?;
    let sink = Arc::new(FileSink::new(&cli.folder)?);
    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;

    info!(
        "Crawling {} seed url(s) with {} keyword(s), saving up to {} page(s) to {}",
        seeds.len(),
        keywords.len(),
        config.max_pages,
        sink.folder().display()
    );

    if keywords.is_empty() {
        warn!("No keywords given, only the seed pages will be fetched");
    }

    let crawler = Crawler::new(
        config,
        keywords,
        seeds,
        Arc::new(fetcher),
        Arc::new(HtmlExtractor::new()),
        sink.clone(),
    );

    // First Ctrl-C lets the current page finish, a second one quits on the spot
    let stop = crawler.stop_handle();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if stop.is_stopped() {
                warn!("Interrupted again, exiting without waiting");
                std::process::exit(1);
            }
            warn!("Interrupted, stopping after the current page (Ctrl-C again to quit now)");
            stop.stop();
        }
    });

    let report = crawler.run().await?;
    print_report(&report, cli.json, sink.folder())?;

    Ok(match report.state {
        CrawlState::Stopped => 1,
        _ => 0,
    })
}

// Log level comes from the flags. JSON output keeps stderr quiet so the
// report is the only thing a script has to deal with.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || cli.json {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_report(report: &CrawlReport, json: bool, folder: &Path) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let reason = match report.state {
        CrawlState::Draining => "page limit reached",
        CrawlState::Exhausted => "no links left to crawl",
        CrawlState::Stopped => "interrupted",
        CrawlState::Running => "still running",
    };

    println!();
    println!("📊 Summary ({}):", reason);
    println!("   ✅ Saved: {}/{}", report.fetched, report.max_pages);
    println!("   ❌ Failed: {}", report.failed);
    println!("   🔗 New links queued: {}", report.discovered);
    println!("   ⏳ Left in queue: {}", report.pending.len());
    println!("   📁 Output: {}", folder.display());
    Ok(())
}
