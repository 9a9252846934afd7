//! Error types for link resolution.

use thiserror::Error;

/// Why a link could not be resolved against the base URL.
///
/// Resolution never fails outright: the raw link is used as-is and this
/// error travels alongside it in [`Resolution::Fallback`](super::Resolution).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The base URL itself does not parse.
    #[error("invalid base URL '{base}': {reason}")]
    InvalidBase {
        /// The base URL that failed to parse
        base: String,
        /// Parser message
        reason: String,
    },

    /// The candidate link cannot be joined onto the base.
    #[error("cannot resolve '{link}' against base: {reason}")]
    InvalidLink {
        /// The raw link text
        link: String,
        /// Parser message
        reason: String,
    },
}

impl ResolveError {
    /// Creates an `InvalidBase` error from a `url` parse failure.
    #[must_use]
    pub fn invalid_base(base: &str, error: &url::ParseError) -> Self {
        Self::InvalidBase {
            base: base.to_string(),
            reason: error.to_string(),
        }
    }

    /// Creates an `InvalidLink` error from a `url` parse failure.
    #[must_use]
    pub fn invalid_link(link: &str, error: &url::ParseError) -> Self {
        Self::InvalidLink {
            link: link.to_string(),
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_message_names_base() {
        let err = ResolveError::invalid_base("::nope", &url::ParseError::RelativeUrlWithoutBase);
        let msg = err.to_string();
        assert!(msg.contains("::nope"), "should contain base: {msg}");
        assert!(msg.contains("invalid base"), "should say base is invalid: {msg}");
    }

    #[test]
    fn test_invalid_link_message_names_link() {
        let err = ResolveError::invalid_link("http://[::1", &url::ParseError::InvalidIpv6Address);
        let msg = err.to_string();
        assert!(msg.contains("http://[::1"), "should contain link: {msg}");
    }
}
