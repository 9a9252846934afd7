//! CLI entry point for pagegrab.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pagegrab_core::{ConcurrencyLimit, DownloadEngine, DownloaderConfig};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stdout().is_terminal())
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config = DownloaderConfig::new(args.base_url.clone())
        .with_timeout(Duration::from_secs(args.timeout))
        .with_concurrency(ConcurrencyLimit::from_count(usize::from(args.concurrency))?)
        .with_collision_policy(args.on_collision.into());
    if let Some(user_agent) = &args.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }

    let engine = DownloadEngine::new(config).context("cannot start downloader")?;

    let pages = args.page_urls();
    info!(
        pages = pages.len(),
        extension = %args.extension,
        output_dir = %args.output_dir.display(),
        "pagegrab starting"
    );

    let report = engine
        .download_pages_report(&pages, &args.extension, &args.output_dir)
        .await;

    info!(
        succeeded = report.total_succeeded(),
        failed = report.total_failed(),
        pages_skipped = report.pages_skipped(),
        "Download complete"
    );

    Ok(())
}
