//! Download engine: one page in, many concurrent file downloads out.
//!
//! For each page the engine fetches the markup, extracts matching links,
//! plans a destination path per link, and spawns one Tokio task per link.
//! It joins every task before returning and reports how many succeeded.
//!
//! # Example
//!
//! ```no_run
//! use pagegrab_core::{DownloadEngine, DownloaderConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DownloaderConfig::new("https://example.com/archives");
//! let engine = DownloadEngine::new(config)?;
//! let report = engine
//!     .download_pages_report(
//!         ["https://example.com/archives", "https://example.com/archives?page=2"],
//!         ".zip",
//!         Path::new("./downloads"),
//!     )
//!     .await;
//! println!("Succeeded: {}, Failed: {}", report.total_succeeded(), report.total_failed());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::HttpClient;
use super::constants::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
use super::error::FetchError;
use super::filename::DestinationPlanner;
use super::storage::ensure_dir;
use crate::config::{ConfigError, DownloaderConfig};
use crate::parser::{LinkPattern, LinkPatternError};

const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CONCURRENCY) {
    Some(limit) => limit,
    None => panic!("DEFAULT_CONCURRENCY must be non-zero"),
};

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error("invalid concurrency value {value}: must be between 0 and {MAX_CONCURRENCY}")]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("cannot build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// How many downloads of one page may be in flight at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyLimit {
    /// At most this many requests in flight; further tasks wait for a permit.
    Bounded(NonZeroUsize),
    /// Every link's request starts immediately.
    Unbounded,
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self::Bounded(DEFAULT_LIMIT)
    }
}

impl ConcurrencyLimit {
    /// Maps a command-line count to a limit: `0` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] above the maximum (100).
    pub fn from_count(count: usize) -> Result<Self, EngineError> {
        match NonZeroUsize::new(count) {
            None => Ok(Self::Unbounded),
            Some(limit) if limit.get() <= MAX_CONCURRENCY => Ok(Self::Bounded(limit)),
            Some(_) => Err(EngineError::InvalidConcurrency { value: count }),
        }
    }

    /// Returns the permit count, or `None` when unbounded.
    #[must_use]
    pub fn permits(self) -> Option<usize> {
        match self {
            Self::Bounded(limit) => Some(limit.get()),
            Self::Unbounded => None,
        }
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(limit) => write!(f, "{limit}"),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Outcome counters for one page, updated from concurrent download tasks.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
    bytes: AtomicU64,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successfully completed downloads.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed downloads.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of downloads that finished either way.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    /// Returns the number of bytes written by completed downloads.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::SeqCst)
    }

    fn record_completed(&self, bytes: u64) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Why a page produced no downloads at all.
#[derive(Debug, thiserror::Error)]
pub enum PageSkip {
    /// The extension could not be turned into a link pattern.
    #[error("invalid link pattern: {0}")]
    InvalidPattern(#[source] LinkPatternError),

    /// The page itself could not be fetched.
    #[error("page fetch failed: {0}")]
    FetchFailed(#[source] FetchError),

    /// The page contained no matching links.
    #[error("no matching links")]
    NoLinks,

    /// The destination directory could not be created.
    #[error("destination unavailable: {0}")]
    DestinationUnavailable(#[source] FetchError),
}

/// Result of processing one page.
#[derive(Debug)]
pub struct PageReport {
    /// The page that was processed.
    pub page_url: String,
    /// Matching links found on the page.
    pub links_found: usize,
    /// Downloads that completed.
    pub succeeded: usize,
    /// Downloads that failed, panicked tasks included.
    pub failed: usize,
    /// Bytes written by completed downloads.
    pub bytes: u64,
    /// Set when the page was abandoned before any download started.
    pub skip: Option<PageSkip>,
}

impl PageReport {
    fn skipped(page_url: &str, skip: PageSkip) -> Self {
        Self {
            page_url: page_url.to_string(),
            links_found: 0,
            succeeded: 0,
            failed: 0,
            bytes: 0,
            skip: Some(skip),
        }
    }
}

/// Per-page reports of a multi-page run, in the order the pages were given.
#[derive(Debug, Default)]
pub struct RunReport {
    pages: Vec<PageReport>,
}

impl RunReport {
    /// Returns the page reports in processing order.
    #[must_use]
    pub fn pages(&self) -> &[PageReport] {
        &self.pages
    }

    /// Sum of successful downloads over all pages.
    #[must_use]
    pub fn total_succeeded(&self) -> usize {
        self.pages.iter().map(|page| page.succeeded).sum()
    }

    /// Sum of failed downloads over all pages.
    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.pages.iter().map(|page| page.failed).sum()
    }

    /// Number of pages abandoned before downloading.
    #[must_use]
    pub fn pages_skipped(&self) -> usize {
        self.pages.iter().filter(|page| page.skip.is_some()).count()
    }
}

/// Download engine for concurrent per-page file downloads.
///
/// # Concurrency Model
///
/// - Each link is downloaded in its own Tokio task
/// - All tasks of a page are spawned up front; with a bounded limit each task
///   acquires a semaphore permit before sending its request
/// - Permits are released when the task finishes (RAII)
/// - A failing or panicking task never affects its siblings
/// - Pages are processed one after another
#[derive(Debug)]
pub struct DownloadEngine {
    config: Arc<DownloaderConfig>,
    client: HttpClient,
    /// `None` when the concurrency limit is unbounded.
    semaphore: Option<Arc<Semaphore>>,
}

impl DownloadEngine {
    /// Creates an engine from a configuration, building its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid,
    /// [`EngineError::InvalidConcurrency`] for a bound above 100, and
    /// [`EngineError::ClientBuild`] if the HTTP client cannot be created.
    #[instrument(level = "debug", skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: DownloaderConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let concurrency = config.concurrency();
        if let Some(permits) = concurrency.permits()
            && permits > MAX_CONCURRENCY
        {
            return Err(EngineError::InvalidConcurrency { value: permits });
        }

        let client = HttpClient::from_config(&config).map_err(EngineError::ClientBuild)?;

        debug!(
            %concurrency,
            timeout_secs = config.timeout().as_secs(),
            collision = config.collision_policy().as_str(),
            "creating download engine"
        );

        Ok(Self {
            semaphore: concurrency
                .permits()
                .map(|permits| Arc::new(Semaphore::new(permits))),
            config: Arc::new(config),
            client,
        })
    }

    /// Returns the engine's configuration.
    #[must_use]
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Downloads every matching file linked from `page_url` into `output_dir`.
    ///
    /// Returns the number of files downloaded successfully. Failures are
    /// logged, never returned: an unreachable page yields zero.
    pub async fn download_page(&self, page_url: &str, extension: &str, output_dir: &Path) -> usize {
        self.download_page_report(page_url, extension, output_dir)
            .await
            .succeeded
    }

    /// Like [`download_page`](Self::download_page), returning the full report.
    ///
    /// Links are resolved against the configured base URL, not `page_url`.
    #[instrument(skip(self, output_dir), fields(output_dir = %output_dir.display()))]
    pub async fn download_page_report(
        &self,
        page_url: &str,
        extension: &str,
        output_dir: &Path,
    ) -> PageReport {
        let pattern = match LinkPattern::new(extension) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(error = %e, "skipping page");
                return PageReport::skipped(page_url, PageSkip::InvalidPattern(e));
            }
        };

        info!(page = %page_url, "processing page");

        let body = match self.client.fetch_page(page_url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(page = %page_url, error = %e, "could not fetch page");
                return PageReport::skipped(page_url, PageSkip::FetchFailed(e));
            }
        };

        let links = pattern.extract(&body, self.config.base_url());
        if links.is_empty() {
            info!(page = %page_url, "no matching links found");
            return PageReport::skipped(page_url, PageSkip::NoLinks);
        }
        info!(page = %page_url, count = links.len(), "found links");

        if let Err(e) = ensure_dir(output_dir).await {
            warn!(error = %e, "destination directory unavailable");
            return PageReport {
                links_found: links.len(),
                ..PageReport::skipped(page_url, PageSkip::DestinationUnavailable(e))
            };
        }

        let mut planner = DestinationPlanner::new(output_dir, self.config.collision_policy());
        let jobs: Vec<(String, PathBuf)> = links
            .into_iter()
            .map(|url| {
                let destination = planner.plan(&url);
                debug!(url = %url, path = %destination.display(), "planned destination");
                (url, destination)
            })
            .collect();
        let links_found = jobs.len();

        let stats = self.fan_out(jobs).await;

        let succeeded = stats.completed();
        let failed = stats.failed();
        info!(page = %page_url, succeeded, failed, bytes = stats.bytes(), "page complete");

        PageReport {
            page_url: page_url.to_string(),
            links_found,
            succeeded,
            failed,
            bytes: stats.bytes(),
            skip: None,
        }
    }

    /// Processes `pages` in order and returns the total number of files
    /// downloaded successfully.
    pub async fn download_pages<I, S>(&self, pages: I, extension: &str, output_dir: &Path) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.download_pages_report(pages, extension, output_dir)
            .await
            .total_succeeded()
    }

    /// Like [`download_pages`](Self::download_pages), returning every page report.
    ///
    /// A page that fails contributes zero and does not stop later pages.
    pub async fn download_pages_report<I, S>(
        &self,
        pages: I,
        extension: &str,
        output_dir: &Path,
    ) -> RunReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = RunReport::default();
        for page in pages {
            let page_report = self
                .download_page_report(page.as_ref(), extension, output_dir)
                .await;
            report.pages.push(page_report);
        }

        info!(
            pages = report.pages.len(),
            skipped = report.pages_skipped(),
            succeeded = report.total_succeeded(),
            failed = report.total_failed(),
            "run complete"
        );
        report
    }

    /// Spawns one task per job and waits for all of them.
    async fn fan_out(&self, jobs: Vec<(String, PathBuf)>) -> Arc<DownloadStats> {
        let stats = Arc::new(DownloadStats::new());
        let mut handles = Vec::with_capacity(jobs.len());

        for (url, destination) in jobs {
            let client = self.client.clone();
            let stats = Arc::clone(&stats);
            let semaphore = self.semaphore.clone();

            handles.push(tokio::spawn(async move {
                // Held until the task ends.
                let _permit = match semaphore {
                    Some(semaphore) => {
                        if let Ok(permit) = semaphore.acquire_owned().await {
                            Some(permit)
                        } else {
                            warn!(url = %url, "semaphore closed; download not started");
                            stats.increment_failed();
                            return;
                        }
                    }
                    None => None,
                };

                match client.fetch_file(&url, &destination).await {
                    Ok(bytes) => stats.record_completed(bytes),
                    Err(e) => {
                        warn!(url = %url, error = %e, "download failed");
                        stats.increment_failed();
                    }
                }
            }));
        }

        debug!(
            task_count = handles.len(),
            "waiting for downloads to complete"
        );

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "download task panicked");
                stats.increment_failed();
            }
        }

        stats
    }
}
