//! Default User-Agent string for outbound requests.

/// Default User-Agent for page and file requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("pagegrab/{version} (bulk-file-fetcher)")
}
