//! Page parsing: finding file links and resolving them to absolute URLs.
//!
//! # Example
//!
//! ```
//! use pagegrab_core::parser::extract_links;
//!
//! let page = r#"<a href="/pub/a.iso">a</a> <a href="notes.txt">n</a>"#;
//! let links = extract_links(page, ".iso", "https://mirror.example.org/");
//! assert_eq!(links, vec!["https://mirror.example.org/pub/a.iso".to_string()]);
//! ```

mod error;
mod links;
mod resolve;

pub use error::ResolveError;
pub use links::{LinkPattern, LinkPatternError, extract_links};
pub use resolve::{Resolution, resolve_url, resolve_url_lossy};
