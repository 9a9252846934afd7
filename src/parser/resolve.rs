//! Best-effort resolution of page links against a base URL.

use tracing::debug;
use url::Url;

use super::error::ResolveError;

/// Outcome of resolving a link against a base URL.
///
/// `Fallback` carries the raw link unchanged, so every resolution still yields
/// a usable string; callers that care can inspect the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The link was joined onto the base and serialized as an absolute URL.
    Resolved(String),
    /// Resolution failed; the raw link is kept.
    Fallback {
        /// The link text exactly as it was given.
        raw: String,
        /// Why resolution did not happen.
        reason: ResolveError,
    },
}

impl Resolution {
    /// Returns true when the raw link was kept because resolution failed.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Returns the URL string to use: the resolved form, or the raw link.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(url) => url,
            Self::Fallback { raw, .. } => raw,
        }
    }

    /// Consumes the resolution and returns the URL string to use.
    #[must_use]
    pub fn into_url_string(self) -> String {
        match self {
            Self::Resolved(url) => url,
            Self::Fallback { raw, .. } => raw,
        }
    }
}

/// Resolves `link` against `base`.
///
/// Absolute links come back in their normalized form; relative links are
/// joined per RFC 3986. If either side fails to parse, the link is returned
/// unchanged inside [`Resolution::Fallback`].
///
/// # Examples
///
/// ```
/// use pagegrab_core::parser::resolve_url;
///
/// let resolved = resolve_url("https://example.com/archives/", "files/a.zip");
/// assert_eq!(resolved.as_str(), "https://example.com/archives/files/a.zip");
/// ```
#[must_use]
pub fn resolve_url(base: &str, link: &str) -> Resolution {
    let base_url = match Url::parse(base) {
        Ok(url) => url,
        Err(e) => {
            debug!(base, link, error = %e, "base URL does not parse, keeping raw link");
            return Resolution::Fallback {
                raw: link.to_string(),
                reason: ResolveError::invalid_base(base, &e),
            };
        }
    };

    match base_url.join(link) {
        Ok(joined) => Resolution::Resolved(joined.to_string()),
        Err(e) => {
            debug!(base, link, error = %e, "link does not resolve, keeping raw link");
            Resolution::Fallback {
                raw: link.to_string(),
                reason: ResolveError::invalid_link(link, &e),
            }
        }
    }
}

/// Resolves `link` against `base` and returns the string, discarding any
/// fallback reason.
#[must_use]
pub fn resolve_url_lossy(base: &str, link: &str) -> String {
    resolve_url(base, link).into_url_string()
}
