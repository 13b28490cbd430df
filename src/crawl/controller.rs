// src/crawl/controller.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Seeds go into the frontier before anything is fetched
// 2. A worker takes the oldest URL from the frontier and fetches it
// 3. On failure: log it and move on (no budget used, nothing enqueued)
// 4. On success: extract text + links, save the text, enqueue the links
//    that pass the keyword filter, count one page against the budget,
//    then pause before the next request
// 5. Stop when the budget is used up (Draining), the frontier is empty
//    (Exhausted) or someone pressed Ctrl-C (Stopped)
//
// Workers:
// - The default is a single worker, which is a plain sequential crawl
// - With more workers, the frontier and counters live behind one mutex
// - Before fetching, a worker reserves a budget slot
//   (fetched + in_flight < max_pages), so the budget can never be exceeded
//   even when several fetches are in flight
// - The politeness delay is per worker: each worker pauses after each of
//   its own successful fetches
//
// Rust concepts:
// - Arc: shared ownership of the crawl context between tokio tasks
// - tokio::sync::Mutex / Notify: guarding the frontier and waking workers
// - Trait objects (Arc<dyn Fetcher>): the crawler doesn't care which
//   fetcher/extractor/sink it's given
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::frontier::Frontier;
use crate::config::CrawlConfig;
use crate::extract::{is_admissible, ExtractedPage, Extractor, KeywordSet};
use crate::fetcher::Fetcher;
use crate::storage::{PersistError, PersistenceSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    Running,
    /// The page budget was used up
    Draining,
    /// Nothing left in the frontier
    Exhausted,
    /// Interrupted from outside
    Stopped,
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("crawl worker failed: {0}")]
    Worker(#[from] JoinError),
}

/// Summary of a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub state: CrawlState,
    /// Successful fetches, i.e. budget used
    pub fetched: usize,
    pub failed: usize,
    /// Admissible links that were new to the frontier
    pub discovered: usize,
    pub max_pages: usize,
    pub written: Vec<PathBuf>,
    /// URLs that were queued but never fetched
    pub pending: Vec<String>,
}

// Everything the workers mutate. Only ever touched with the lock held.
struct Progress {
    frontier: Frontier,
    state: CrawlState,
    fetched: usize,
    in_flight: usize,
    failed: usize,
    discovered: usize,
    written: Vec<PathBuf>,
    aborted: bool,
}

impl Progress {
    fn finish(&mut self, state: CrawlState) {
        if self.state == CrawlState::Running {
            debug!("crawl state: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

struct Shared {
    progress: Mutex<Progress>,
    // Woken whenever progress changes in a way a waiting worker cares about
    changed: Notify,
    stop_requested: AtomicBool,
    stop_signal: Notify,
}

/// Cloneable handle that asks a running crawl to stop.
///
/// The current fetch finishes its iteration; no new URL is taken afterwards.
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        self.shared.stop_signal.notify_waiters();
        self.shared.changed.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stop_requested.load(Ordering::SeqCst)
    }
}

struct CrawlContext {
    config: CrawlConfig,
    keywords: KeywordSet,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    sink: Arc<dyn PersistenceSink>,
    shared: Arc<Shared>,
}

pub struct Crawler {
    ctx: Arc<CrawlContext>,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        keywords: KeywordSet,
        seeds: Vec<String>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        let frontier = Frontier::with_seeds(seeds);
        debug!("frontier seeded with {} url(s)", frontier.size());

        let shared = Arc::new(Shared {
            progress: Mutex::new(Progress {
                frontier,
                state: CrawlState::Running,
                fetched: 0,
                in_flight: 0,
                failed: 0,
                discovered: 0,
                written: Vec::new(),
                aborted: false,
            }),
            changed: Notify::new(),
            stop_requested: AtomicBool::new(false),
            stop_signal: Notify::new(),
        });

        Self {
            ctx: Arc::new(CrawlContext {
                config,
                keywords,
                fetcher,
                extractor,
                sink,
                shared,
            }),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.ctx.shared),
        }
    }

    /// Runs the crawl to completion.
    ///
    /// Fetch and extraction problems are logged and skipped. A write failure
    /// ends the crawl with an error.
    pub async fn run(self) -> Result<CrawlReport, CrawlError> {
        let workers = self.ctx.config.workers.max(1);

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let ctx = Arc::clone(&self.ctx);
                tokio::spawn(async move { ctx.run_worker(worker).await })
            })
            .collect();

        for result in future::try_join_all(handles).await? {
            result?;
        }

        let progress = self.ctx.shared.progress.lock().await;
        Ok(CrawlReport {
            state: progress.state,
            fetched: progress.fetched,
            failed: progress.failed,
            discovered: progress.discovered,
            max_pages: self.ctx.config.max_pages,
            written: progress.written.clone(),
            pending: progress.frontier.pending().map(str::to_owned).collect(),
        })
    }
}

impl CrawlContext {
    async fn run_worker(&self, worker: usize) -> Result<(), CrawlError> {
        debug!("worker {} started", worker);

        while let Some(url) = self.next_url().await {
            match self.fetcher.fetch(&url).await {
                Ok(markup) => {
                    if let Err(e) = self.process_page(&url, &markup).await {
                        self.abort().await;
                        return Err(e);
                    }
                    self.pause().await;
                }
                Err(error) => {
                    // A failed fetch is free: no budget, no delay
                    warn!("Failed to fetch {}: {}", url, error);
                    self.record_failure().await;
                }
            }
        }

        debug!("worker {} finished", worker);
        Ok(())
    }

    // Takes the next URL and reserves a budget slot for it, or returns None
    // once the crawl has reached a terminal state.
    async fn next_url(&self) -> Option<String> {
        let max_pages = self.config.max_pages;

        loop {
            // Registered before looking at progress so a wakeup sent between
            // the check and the wait isn't lost
            let changed = self.shared.changed.notified();

            {
                let mut progress = self.shared.progress.lock().await;

                if progress.aborted || progress.state != CrawlState::Running {
                    return None;
                }

                let terminal = if self.shared.stop_requested.load(Ordering::SeqCst) {
                    Some(CrawlState::Stopped)
                } else if progress.fetched >= max_pages {
                    Some(CrawlState::Draining)
                } else if progress.fetched + progress.in_flight < max_pages {
                    match progress.frontier.dequeue() {
                        Ok(url) => {
                            progress.in_flight += 1;
                            return Some(url);
                        }
                        Err(_) if progress.in_flight == 0 => Some(CrawlState::Exhausted),
                        // Other workers may still discover links
                        Err(_) => None,
                    }
                } else {
                    // Every remaining slot is reserved by an in-flight fetch
                    None
                };

                if let Some(state) = terminal {
                    progress.finish(state);
                    drop(progress);
                    self.shared.changed.notify_waiters();
                    return None;
                }
            }

            changed.await;
        }
    }

    async fn process_page(&self, url: &str, markup: &str) -> Result<(), CrawlError> {
        let page = match self.extractor.extract(markup) {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not extract {}: {}", url, e);
                ExtractedPage::default()
            }
        };

        let path = self.sink.persist(url, &page.plaintext).await?;

        let mut progress = self.shared.progress.lock().await;
        for link in page
            .links
            .iter()
            .filter(|link| is_admissible(link, &self.keywords))
        {
            if progress.frontier.enqueue(link.href.as_str()) {
                debug!("enqueued {} (from {})", link.href, url);
                progress.discovered += 1;
            }
        }
        progress.in_flight -= 1;
        progress.fetched += 1;
        progress.written.push(path);
        let fetched = progress.fetched;
        drop(progress);

        self.shared.changed.notify_waiters();
        info!("Processed {} ({}/{})", url, fetched, self.config.max_pages);
        Ok(())
    }

    async fn record_failure(&self) {
        let mut progress = self.shared.progress.lock().await;
        progress.in_flight -= 1;
        progress.failed += 1;
        drop(progress);

        self.shared.changed.notify_waiters();
    }

    // Wakes both waiters in next_url and workers sleeping in pause()
    async fn abort(&self) {
        self.shared.progress.lock().await.aborted = true;
        self.shared.changed.notify_waiters();
        self.shared.stop_signal.notify_waiters();
    }

    // Politeness delay; cut short by a stop request or by another worker's
    // write failure
    async fn pause(&self) {
        let delay = self.config.politeness_delay;
        if delay.is_zero() {
            return;
        }

        let stopped = self.shared.stop_signal.notified();
        if self.shared.stop_requested.load(Ordering::SeqCst)
            || self.shared.progress.lock().await.aborted
        {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = stopped => {}
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why register `notified()` before checking the state?
//    - notify_waiters() only wakes futures that already exist
//    - Creating the future first means a wakeup can't slip in between
//      "nothing to do" and "start waiting"
//
// 2. What does tokio::select! do?
//    - Runs several futures at once and continues with whichever finishes
//      first; the others are dropped
//    - Here: the politeness sleep races against a stop request
//
// 3. Why drop(progress) before notify_waiters()?
//    - Woken workers immediately try to lock the same mutex
//    - Releasing it first means they don't wake up just to wait again
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::path::Path;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::extract::{ExtractError, HtmlExtractor};
    use crate::fetcher::{FetchError, FetchErrorKind, FetchOutcome};

    // Serves canned pages; anything unknown is a connection error
    #[derive(Default)]
    struct MockFetcher {
        pages: HashMap<String, FetchOutcome>,
        calls: StdMutex<Vec<String>>,
    }

    impl MockFetcher {
        fn page(mut self, url: &str, markup: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(markup.to_string()));
            self
        }

        fn failing(mut self, url: &str, kind: FetchErrorKind) -> Self {
            self.pages
                .insert(url.to_string(), Err(FetchError::new(kind, "mock failure")));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> FetchOutcome {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().unwrap_or_else(|| {
                Err(FetchError::new(FetchErrorKind::Connection, "unknown host"))
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: StdMutex<Vec<(String, String)>>,
        broken: bool,
        // Fails only for this URL
        fail_on: Option<&'static str>,
    }

    impl MemorySink {
        fn saved_urls(&self) -> Vec<String> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PersistenceSink for MemorySink {
        async fn persist(&self, url: &str, text: &str) -> Result<PathBuf, PersistError> {
            let path = PathBuf::from(format!("{url}.txt"));
            if self.broken || self.fail_on.is_some_and(|bad| bad == url) {
                return Err(PersistError::Write {
                    path,
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            self.saved
                .lock()
                .unwrap()
                .push((url.to_string(), text.to_string()));
            Ok(path)
        }
    }

    struct BrokenExtractor;

    impl Extractor for BrokenExtractor {
        fn extract(&self, _markup: &str) -> Result<ExtractedPage, ExtractError> {
            Err(ExtractError::Selector {
                selector: "a[href]".to_string(),
                reason: "mock".to_string(),
            })
        }
    }

    fn config(max_pages: usize) -> CrawlConfig {
        CrawlConfig {
            max_pages,
            politeness_delay: Duration::ZERO,
            ..CrawlConfig::default()
        }
    }

    fn seeds(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|url| url.to_string()).collect()
    }

    fn crawler(
        config: CrawlConfig,
        keywords: &[&str],
        seed_urls: &[&str],
        fetcher: &Arc<MockFetcher>,
        sink: &Arc<MemorySink>,
    ) -> Crawler {
        Crawler::new(
            config,
            KeywordSet::new(keywords),
            seeds(seed_urls),
            fetcher.clone(),
            Arc::new(HtmlExtractor::new()),
            sink.clone(),
        )
    }

    #[tokio::test]
    async fn test_budget_reached_leaves_admissible_link_pending() {
        let fetcher = Arc::new(MockFetcher::default().page(
            "https://example.com",
            r#"<p>Home</p>
               <a href="https://a.com">Latest news</a>
               <a href="http://b.com">Other</a>"#,
        ));
        let sink = Arc::new(MemorySink::default());

        let report = crawler(config(1), &["news"], &["https://example.com"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        assert_eq!(report.state, CrawlState::Draining);
        assert_eq!(report.fetched, 1);
        assert_eq!(report.discovered, 1);
        assert_eq!(report.pending, vec!["https://a.com"]);
        assert_eq!(fetcher.calls(), vec!["https://example.com"]);
        assert_eq!(sink.saved_urls(), vec!["https://example.com"]);
        assert_eq!(
            report.written,
            vec![PathBuf::from("https://example.com.txt")]
        );
    }

    #[tokio::test]
    async fn test_timeout_on_only_seed_exhausts_without_cost() {
        let fetcher = Arc::new(
            MockFetcher::default().failing("https://slow.example", FetchErrorKind::Timeout),
        );
        let sink = Arc::new(MemorySink::default());

        let report = crawler(config(10), &["news"], &["https://slow.example"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        assert_eq!(report.state, CrawlState::Exhausted);
        assert_eq!(report.fetched, 0);
        assert_eq!(report.failed, 1);
        assert!(report.pending.is_empty());
        assert!(sink.saved_urls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_seed_is_fetched_once() {
        let fetcher = Arc::new(MockFetcher::default().page("https://a.com", "<p>a</p>"));
        let sink = Arc::new(MemorySink::default());

        let report = crawler(
            config(10),
            &[],
            &["https://a.com", "https://a.com"],
            &fetcher,
            &sink,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(fetcher.calls(), vec!["https://a.com"]);
        assert_eq!(report.fetched, 1);
        assert_eq!(report.state, CrawlState::Exhausted);
    }

    #[tokio::test]
    async fn test_visits_breadth_first_across_seeds_and_links() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .page("https://s1.com", r#"<a href="https://a.com">rust news</a>"#)
                .page("https://s2.com", r#"<a href="https://b.com">rust</a>"#)
                .page(
                    "https://a.com",
                    r#"<a href="https://c.com">more rust</a><a href="https://s1.com">rust</a>"#,
                )
                .page("https://b.com", "<p>leaf</p>")
                .page("https://c.com", "<p>leaf</p>"),
        );
        let sink = Arc::new(MemorySink::default());

        let report = crawler(
            config(100),
            &["rust"],
            &["https://s1.com", "https://s2.com"],
            &fetcher,
            &sink,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(
            fetcher.calls(),
            vec![
                "https://s1.com",
                "https://s2.com",
                "https://a.com",
                "https://b.com",
                "https://c.com",
            ]
        );
        assert_eq!(report.discovered, 3);
        assert_eq!(report.state, CrawlState::Exhausted);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_use_budget() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .failing("https://down.com", FetchErrorKind::Connection)
                .page("https://one.com", "<p>1</p>")
                .page("https://two.com", "<p>2</p>")
                .page("https://three.com", "<p>3</p>"),
        );
        let sink = Arc::new(MemorySink::default());

        let report = crawler(
            config(2),
            &[],
            &[
                "https://down.com",
                "https://one.com",
                "https://two.com",
                "https://three.com",
            ],
            &fetcher,
            &sink,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(report.state, CrawlState::Draining);
        assert_eq!(report.fetched, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(sink.saved_urls(), vec!["https://one.com", "https://two.com"]);
        assert_eq!(report.pending, vec!["https://three.com"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_politeness_delay() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .failing("https://a.com", FetchErrorKind::Timeout)
                .failing("https://b.com", FetchErrorKind::Connection)
                .failing("https://c.com", FetchErrorKind::Protocol),
        );
        let sink = Arc::new(MemorySink::default());
        let slow = CrawlConfig {
            politeness_delay: Duration::from_secs(5),
            ..config(10)
        };

        let run = crawler(
            slow,
            &[],
            &["https://a.com", "https://b.com", "https://c.com"],
            &fetcher,
            &sink,
        )
        .run();

        // One delay alone would be 5s
        let report = tokio::time::timeout(Duration::from_secs(1), run)
            .await
            .expect("failed fetches should not wait")
            .unwrap();

        assert_eq!(report.state, CrawlState::Exhausted);
        assert_eq!(report.failed, 3);
        assert_eq!(report.fetched, 0);
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_keywords_only_fetch_seeds() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .page("https://a.com", r#"<a href="https://b.com">news</a>"#)
                .page("https://b.com", "<p>b</p>"),
        );
        let sink = Arc::new(MemorySink::default());

        let report = crawler(config(10), &[], &["https://a.com"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), vec!["https://a.com"]);
        assert_eq!(report.discovered, 0);
    }

    #[tokio::test]
    async fn test_zero_budget_fetches_nothing() {
        let fetcher = Arc::new(MockFetcher::default().page("https://a.com", "<p>a</p>"));
        let sink = Arc::new(MemorySink::default());

        let report = crawler(config(0), &[], &["https://a.com"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        assert_eq!(report.state, CrawlState::Draining);
        assert!(fetcher.calls().is_empty());
        assert_eq!(report.pending, vec!["https://a.com"]);
    }

    #[tokio::test]
    async fn test_write_failure_aborts_the_crawl() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .page("https://a.com", "<p>a</p>")
                .page("https://b.com", "<p>b</p>"),
        );
        let sink = Arc::new(MemorySink {
            broken: true,
            ..MemorySink::default()
        });

        let result = crawler(
            config(10),
            &[],
            &["https://a.com", "https://b.com"],
            &fetcher,
            &sink,
        )
        .run()
        .await;

        assert!(matches!(result, Err(CrawlError::Persist(_))));
        assert_eq!(fetcher.calls(), vec!["https://a.com"]);
    }

    #[tokio::test]
    async fn test_write_failure_wakes_pausing_workers() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .page("https://a.com", "<p>a</p>")
                .page("https://b.com", "<p>b</p>"),
        );
        let sink = Arc::new(MemorySink {
            fail_on: Some("https://b.com"),
            ..MemorySink::default()
        });
        // One worker saves a.com and sleeps, the other fails on b.com
        let pooled = CrawlConfig {
            workers: 2,
            politeness_delay: Duration::from_secs(60),
            ..config(10)
        };

        let run = crawler(
            pooled,
            &[],
            &["https://a.com", "https://b.com"],
            &fetcher,
            &sink,
        )
        .run();

        let result = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("crawl should end well before the delay does");

        assert!(matches!(result, Err(CrawlError::Persist(_))));
        assert_eq!(sink.saved_urls(), vec!["https://a.com"]);
    }

    #[tokio::test]
    async fn test_extraction_failure_still_counts_the_page() {
        let fetcher = Arc::new(MockFetcher::default().page("https://a.com", "<p>a</p>"));
        let sink = Arc::new(MemorySink::default());

        let report = Crawler::new(
            config(10),
            KeywordSet::default(),
            seeds(&["https://a.com"]),
            fetcher.clone(),
            Arc::new(BrokenExtractor),
            sink.clone(),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(report.fetched, 1);
        assert_eq!(
            sink.saved.lock().unwrap().clone(),
            vec![("https://a.com".to_string(), String::new())]
        );
    }

    #[tokio::test]
    async fn test_stop_before_run_fetches_nothing() {
        let fetcher = Arc::new(MockFetcher::default().page("https://a.com", "<p>a</p>"));
        let sink = Arc::new(MemorySink::default());

        let crawler = crawler(config(10), &[], &["https://a.com"], &fetcher, &sink);
        let stop = crawler.stop_handle();
        stop.stop();
        assert!(stop.is_stopped());

        let report = crawler.run().await.unwrap();

        assert_eq!(report.state, CrawlState::Stopped);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stop_interrupts_politeness_delay() {
        let fetcher = Arc::new(
            MockFetcher::default()
                .page("https://a.com", "<p>a</p>")
                .page("https://b.com", "<p>b</p>"),
        );
        let sink = Arc::new(MemorySink::default());
        let slow = CrawlConfig {
            politeness_delay: Duration::from_secs(60),
            ..config(10)
        };

        let crawler = crawler(slow, &[], &["https://a.com", "https://b.com"], &fetcher, &sink);
        let stop = crawler.stop_handle();
        let run = tokio::spawn(crawler.run());

        // Give the worker time to finish the first page and start waiting
        tokio::time::sleep(Duration::from_millis(200)).await;
        stop.stop();

        let report = tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("crawl should stop well before the delay ends")
            .unwrap()
            .unwrap();

        assert_eq!(report.state, CrawlState::Stopped);
        assert_eq!(report.fetched, 1);
        assert_eq!(report.pending, vec!["https://b.com"]);
    }

    fn fan_out_fetcher(pages: usize) -> MockFetcher {
        // Page i links to pages 2i+1 and 2i+2, a binary tree of pages
        let mut fetcher = MockFetcher::default();
        for i in 0..pages {
            let markup = format!(
                r#"<a href="https://p{}.com">rust</a><a href="https://p{}.com">rust</a><a href="https://p0.com">rust</a>"#,
                2 * i + 1,
                2 * i + 2
            );
            fetcher = fetcher.page(&format!("https://p{i}.com"), &markup);
        }
        fetcher
    }

    #[tokio::test]
    async fn test_worker_pool_respects_budget_and_dedup() {
        let fetcher = Arc::new(fan_out_fetcher(64));
        let sink = Arc::new(MemorySink::default());
        let pooled = CrawlConfig {
            workers: 4,
            ..config(5)
        };

        let report = crawler(pooled, &["rust"], &["https://p0.com"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        let calls = fetcher.calls();
        let mut unique = calls.clone();
        unique.sort();
        unique.dedup();

        assert_eq!(report.state, CrawlState::Draining);
        assert_eq!(report.fetched, 5);
        assert_eq!(calls.len(), 5);
        assert_eq!(unique.len(), calls.len());
    }

    #[tokio::test]
    async fn test_worker_pool_exhausts_small_site() {
        // Pages 0..7 exist; links to 7..15 fail with connection errors
        let fetcher = Arc::new(fan_out_fetcher(7));
        let sink = Arc::new(MemorySink::default());
        let pooled = CrawlConfig {
            workers: 3,
            ..config(100)
        };

        let report = crawler(pooled, &["rust"], &["https://p0.com"], &fetcher, &sink)
            .run()
            .await
            .unwrap();

        let mut calls = fetcher.calls();
        calls.sort();
        let before = calls.len();
        calls.dedup();

        assert_eq!(report.state, CrawlState::Exhausted);
        assert_eq!(report.fetched, 7);
        assert_eq!(report.failed, 8);
        assert_eq!(before, 15);
        assert_eq!(calls.len(), 15);
        assert!(report.pending.is_empty());
    }

    #[test]
    fn test_report_serializes_state_in_snake_case() {
        let report = CrawlReport {
            state: CrawlState::Draining,
            fetched: 1,
            failed: 0,
            discovered: 1,
            max_pages: 1,
            written: vec![Path::new("out").join("x.html")],
            pending: vec!["https://a.com".to_string()],
        };

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["state"], "draining");
        assert_eq!(json["pending"][0], "https://a.com");
    }
}
