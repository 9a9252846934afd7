//! Page and file fetching, and the concurrent download engine.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Temporary-file writes, renamed into place only when complete
//! - Filenames from the last URL path segment, sanitized
//! - Overwrite or numeric-suffix handling of duplicate filenames
//! - Bounded or unbounded fan-out, one task per link
//!
//! # Example
//!
//! ```no_run
//! use pagegrab_core::download::HttpClient;
//! use pagegrab_core::DownloaderConfig;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::from_config(&DownloaderConfig::new("https://example.com/"))?;
//! let bytes = client
//!     .fetch_file("https://example.com/paper.pdf", Path::new("./downloads/paper.pdf"))
//!     .await?;
//! println!("Downloaded {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
mod filename;
mod storage;

pub use client::HttpClient;
pub use constants::DEFAULT_CONCURRENCY;
pub use engine::{
    ConcurrencyLimit, DownloadEngine, DownloadStats, EngineError, PageReport, PageSkip, RunReport,
};
pub use error::FetchError;
pub use filename::{CollisionPolicy, DEFAULT_FILENAME, extract_filename};
pub use storage::ensure_dir;
