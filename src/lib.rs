//! pagegrab core library
//!
//! Fetches HTML pages, finds links to files of a given extension, and
//! downloads those files concurrently into a local directory.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Immutable run configuration
//! - [`download`] - HTTP fetching and the concurrent download engine
//! - [`parser`] - Link extraction and URL resolution

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod parser;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, DownloaderConfig};
pub use download::{
    CollisionPolicy, ConcurrencyLimit, DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats,
    EngineError, FetchError, HttpClient, PageReport, PageSkip, RunReport, extract_filename,
};
pub use parser::{Resolution, extract_links, resolve_url};
