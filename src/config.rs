//! Immutable run configuration shared by every download task.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::download::constants::{CONNECT_TIMEOUT, MAX_TIMEOUT, REQUEST_TIMEOUT};
use crate::download::{CollisionPolicy, ConcurrencyLimit};
use crate::user_agent::default_user_agent;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL does not parse as an absolute URL.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Why it was rejected.
        reason: url::ParseError,
    },

    /// The user agent is empty.
    #[error("user agent must not be empty")]
    EmptyUserAgent,

    /// A timeout is outside the accepted range.
    #[error(
        "invalid {name} {millis}ms: must be between 1s and {}s",
        MAX_TIMEOUT.as_secs()
    )]
    InvalidTimeout {
        /// Which timeout (`timeout` or `connect timeout`).
        name: &'static str,
        /// The rejected value in milliseconds.
        millis: u128,
    },
}

/// Settings for one downloader run.
///
/// Built once at startup, validated, then shared read-only behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pagegrab_core::{CollisionPolicy, ConcurrencyLimit, DownloaderConfig};
///
/// let config = DownloaderConfig::new("https://example.com/archives")
///     .with_timeout(Duration::from_secs(60))
///     .with_concurrency(ConcurrencyLimit::Unbounded)
///     .with_collision_policy(CollisionPolicy::Suffix);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    concurrency: ConcurrencyLimit,
    collision_policy: CollisionPolicy,
}

impl DownloaderConfig {
    /// Creates a configuration with default settings for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: default_user_agent(),
            timeout: REQUEST_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            concurrency: ConcurrencyLimit::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    /// Sets the `User-Agent` header sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the whole-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets how many downloads of one page may be in flight at once.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: ConcurrencyLimit) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets what happens when two links map to the same filename.
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn concurrency(&self) -> ConcurrencyLimit {
        self.concurrency
    }

    #[must_use]
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Checks every value against the accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|reason| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        })?;

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }

        validate_timeout("timeout", self.timeout)?;
        validate_timeout("connect timeout", self.connect_timeout)?;

        Ok(())
    }
}

fn validate_timeout(name: &'static str, value: Duration) -> Result<(), ConfigError> {
    if value < Duration::from_secs(1) || value > MAX_TIMEOUT {
        return Err(ConfigError::InvalidTimeout {
            name,
            millis: value.as_millis(),
        });
    }
    Ok(())
}
