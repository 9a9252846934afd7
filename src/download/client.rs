//! HTTP client wrapper for fetching pages and files.
//!
//! This module provides the `HttpClient` struct: one GET per call, success
//! only on `200 OK`, no retries. File bodies are streamed to disk.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::error::FetchError;
use super::filename::filename_from_url;
use super::storage::{PartialFile, ensure_dir};
use crate::config::DownloaderConfig;

/// HTTP client for page and file downloads.
///
/// Created once and cloned into every download task; clones share one
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use pagegrab_core::{DownloaderConfig, HttpClient};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DownloaderConfig::new("https://example.com/archives");
/// let client = HttpClient::from_config(&config)?;
/// let page = client.fetch_page("https://example.com/archives").await?;
/// let bytes = client
///     .fetch_file("https://example.com/a.zip", Path::new("./downloads/a.zip"))
///     .await?;
/// println!("page had {} chars, wrote {bytes} bytes", page.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client sending `user_agent` with the given timeouts.
    ///
    /// `timeout` bounds each whole request, body included.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialised.
    #[instrument(level = "debug")]
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }

    /// Creates a client from the user agent and timeouts in `config`.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialised.
    pub fn from_config(config: &DownloaderConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.user_agent(),
            config.timeout(),
            config.connect_timeout(),
        )
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server answers with any status other than 200
    /// - The body cannot be read
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::body_read(url, e))?;
        debug!(chars = body.len(), "page fetched");
        Ok(body)
    }

    /// Downloads `url` to `destination`, replacing any existing file there.
    ///
    /// The parent directory is created if needed. The body is streamed into a
    /// temporary sibling file which is renamed onto `destination` only after
    /// the whole body has been written.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`fetch_page`](Self::fetch_page), plus
    /// [`FetchError::CreateDir`] and [`FetchError::Write`] for filesystem
    /// failures.
    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    pub async fn fetch_file(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        if let Some(parent) = destination.parent() {
            ensure_dir(parent).await?;
        }

        let response = self.get(url).await?;

        let (partial, file) = PartialFile::create(destination).await?;
        debug!(temp = %partial.temp_path().display(), "streaming to temporary file");
        let bytes = stream_to_file(file, response, url, partial.temp_path()).await?;
        partial.commit().await?;

        let filename = destination.file_name().map_or_else(
            || display_name(url),
            |name| name.to_string_lossy().into_owned(),
        );
        info!(%filename, bytes, "downloaded");

        Ok(bytes)
    }

    /// Sends a GET and accepts only `200 OK`.
    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "rejecting non-200 response");
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

/// Streams the response body into `file`, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::body_read(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::write(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::write(file_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .await
        .map_err(|e| FetchError::write(file_path, e))?;

    Ok(bytes_written)
}

fn display_name(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |u| filename_from_url(&u))
}
