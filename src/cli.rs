//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use pagegrab_core::{CollisionPolicy, DEFAULT_CONCURRENCY};

/// Base URL used when none is given.
pub const DEFAULT_BASE_URL: &str = "https://example.com/archives";

/// Extension searched for when none is given.
pub const DEFAULT_EXTENSION: &str = ".bakent_fronted";

/// Download files linked from web pages.
///
/// Fetches each page, finds `href` links containing the extension, and
/// downloads the linked files concurrently into the output directory.
#[derive(Parser, Debug)]
#[command(name = "pagegrab")]
#[command(author, version, about)]
pub struct Args {
    /// Pages to scan, in order (defaults to the base URL)
    #[arg(value_name = "PAGE_URL")]
    pub pages: Vec<String>,

    /// Base URL that relative links are resolved against
    #[arg(short = 'b', long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Extension a link must contain to be downloaded
    #[arg(short = 'e', long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Directory downloaded files are written to
    #[arg(short = 'o', long, default_value = "downloads")]
    pub output_dir: PathBuf,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (1-3600)
    #[arg(short = 't', long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    /// Maximum concurrent downloads per page (1-100, 0 for unlimited)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub concurrency: u8,

    /// What to do when two links share a filename
    #[arg(long, value_enum, default_value_t = CollisionArg::Overwrite)]
    pub on_collision: CollisionArg,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Pages to process: the positional URLs, or the base URL alone.
    pub fn page_urls(&self) -> Vec<String> {
        if self.pages.is_empty() {
            vec![self.base_url.clone()]
        } else {
            self.pages.clone()
        }
    }
}

/// Command-line spelling of [`CollisionPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    /// Later downloads replace earlier ones
    Overwrite,
    /// Keep every file, numbering duplicates (name_2.ext)
    Suffix,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Overwrite => Self::Overwrite,
            CollisionArg::Suffix => Self::Suffix,
        }
    }
}
