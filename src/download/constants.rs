//! Constants for the download module (timeouts, concurrency bounds).

use std::time::Duration;

/// Default whole-request timeout (30 seconds), body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest timeout accepted by configuration validation (1 hour).
pub const MAX_TIMEOUT: Duration = Duration::from_secs(3600);

/// Default number of downloads in flight per page.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Largest bounded concurrency accepted.
pub const MAX_CONCURRENCY: usize = 100;
