//! Extraction of file links from raw page markup.
//!
//! This is a pattern match over `href` attributes, not an HTML parser: a
//! link qualifies when its quoted value contains the target extension
//! anywhere, so `archive.zip.html` matches the extension `.zip`.

use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::resolve::resolve_url;

/// Errors building a [`LinkPattern`].
#[derive(Debug, Error)]
pub enum LinkPatternError {
    /// The extension could not be compiled into a pattern (size limits).
    #[error("cannot build link pattern for '{extension}': {source}")]
    Regex {
        /// The extension that was requested.
        extension: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// A compiled matcher for `href` values containing one file extension.
#[derive(Debug, Clone)]
pub struct LinkPattern {
    extension: String,
    regex: Regex,
}

impl LinkPattern {
    /// Compiles a matcher for `extension`, treating it as literal text.
    ///
    /// An empty extension is contained in every value, so it matches every
    /// quoted `href`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkPatternError::Regex`] if the escaped pattern exceeds
    /// regex limits.
    pub fn new(extension: &str) -> Result<Self, LinkPatternError> {
        let pattern = format!(
            r#"(?i:href)\s*=\s*['"]([^'"]*{}[^'"]*)['"]"#,
            regex::escape(extension)
        );
        let regex = Regex::new(&pattern).map_err(|source| LinkPatternError::Regex {
            extension: extension.to_string(),
            source,
        })?;
        Ok(Self {
            extension: extension.to_string(),
            regex,
        })
    }

    /// The extension this pattern matches.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns every matching link in document order, resolved against `base_url`.
    ///
    /// Links that cannot be resolved are kept in their raw form.
    #[tracing::instrument(skip(self, page), fields(extension = %self.extension, page_len = page.len()))]
    #[must_use]
    pub fn extract(&self, page: &str, base_url: &str) -> Vec<String> {
        let links: Vec<String> = self
            .regex
            .captures_iter(page)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .map(|raw| {
                trace!(link = raw, "found link candidate");
                let resolution = resolve_url(base_url, raw);
                if resolution.is_fallback() {
                    debug!(link = raw, "using unresolved link");
                }
                resolution.into_url_string()
            })
            .collect();

        debug!(count = links.len(), "extracted links");
        links
    }
}

/// Extracts links whose `href` value contains `extension`, resolved against
/// `base_url`, in document order.
///
/// An extension that cannot form a pattern yields no links.
///
/// # Examples
///
/// ```
/// use pagegrab_core::parser::extract_links;
///
/// let page = r#"<a href="a.zip">A</a> <a href="b.pdf">B</a>"#;
/// let links = extract_links(page, ".zip", "https://example.com/files/");
/// assert_eq!(links, vec!["https://example.com/files/a.zip".to_string()]);
/// ```
#[must_use]
pub fn extract_links(page: &str, extension: &str, base_url: &str) -> Vec<String> {
    match LinkPattern::new(extension) {
        Ok(pattern) => pattern.extract(page, base_url),
        Err(e) => {
            warn!(extension, error = %e, "no links extracted");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EXT: &str = ".bakent_fronted";
    const BASE: &str = "https://example.com/";

    #[test]
    fn test_extract_links_keeps_only_matching_in_document_order() {
        let page = r#"
            <html><body>
                <a href="file1.bakent_fronted">File 1</a>
                <a href="document.pdf">PDF</a>
                <a href="/downloads/file2.bakent_fronted">File 2</a>
                <a href="image.jpg">Image</a>
                <a href="https://other.com/file3.bakent_fronted">File 3</a>
            </body></html>
        "#;

        let links = extract_links(page, EXT, BASE);

        assert_eq!(
            links,
            vec![
                "https://example.com/file1.bakent_fronted",
                "https://example.com/downloads/file2.bakent_fronted",
                "https://other.com/file3.bakent_fronted",
            ]
        );
    }

    #[test]
    fn test_extract_links_matches_substring_not_only_suffix() {
        let page = r#"<a href="archive.bakent_fronted.html">x</a>"#;
        let links = extract_links(page, EXT, BASE);
        assert_eq!(links, vec!["https://example.com/archive.bakent_fronted.html"]);
    }

    #[test]
    fn test_extract_links_escapes_pattern_characters() {
        // "." must not match arbitrary characters.
        let page = r#"<a href="fileXzip">no</a><a href="file.zip">yes</a>"#;
        let links = extract_links(page, ".zip", BASE);
        assert_eq!(links, vec!["https://example.com/file.zip"]);

        let page = r#"<a href="a(1)+.tar">paren</a>"#;
        let links = extract_links(page, "(1)+.tar", BASE);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_extract_links_accepts_single_quotes_and_spacing() {
        let page = "<a href = 'one.bakent_fronted'>1</a><a HREF=\"two.bakent_fronted\">2</a>";
        let links = extract_links(page, EXT, BASE);
        assert_eq!(
            links,
            vec![
                "https://example.com/one.bakent_fronted",
                "https://example.com/two.bakent_fronted",
            ]
        );
    }

    #[test]
    fn test_extract_links_trims_whitespace_inside_quotes() {
        let page = r#"<a href="  spaced.bakent_fronted ">s</a>"#;
        let links = extract_links(page, EXT, BASE);
        assert_eq!(links, vec!["https://example.com/spaced.bakent_fronted"]);
    }

    #[test]
    fn test_extract_links_no_matches() {
        let page = r#"<a href="document.pdf">PDF</a><a href="image.jpg">img</a>"#;
        assert!(extract_links(page, EXT, BASE).is_empty());
    }

    #[test]
    fn test_extract_links_empty_page() {
        assert!(extract_links("", EXT, BASE).is_empty());
    }

    #[test]
    fn test_extract_links_malformed_html_still_matches_attribute() {
        let page = r#"<a href="file.bakent_fronted">unterminated <div"#;
        let links = extract_links(page, EXT, BASE);
        assert_eq!(links, vec!["https://example.com/file.bakent_fronted"]);
    }

    #[test]
    fn test_extract_links_encodes_spaces_in_resolved_url() {
        let page = r#"<a href="file with spaces.bakent_fronted">x</a>"#;
        let links = extract_links(page, EXT, BASE);
        assert_eq!(links.len(), 1);
        assert!(links[0].contains("file%20with%20spaces.bakent_fronted"));
    }

    #[test]
    fn test_extract_links_keeps_duplicates() {
        let page = r#"<a href="a.zip">1</a><a href="a.zip">2</a>"#;
        assert_eq!(extract_links(page, ".zip", BASE).len(), 2);
    }

    #[test]
    fn test_extract_links_ignores_text_outside_href() {
        let page = r#"<p>see notes.zip</p><img src="pic.zip">"#;
        assert!(extract_links(page, ".zip", BASE).is_empty());
    }

    #[test]
    fn test_extract_links_unresolvable_base_keeps_raw() {
        let page = r#"<a href="a.zip">1</a>"#;
        assert_eq!(extract_links(page, ".zip", "not a base"), vec!["a.zip"]);
    }

    #[test]
    fn test_empty_extension_matches_every_href() {
        let page = r#"<a href="a.zip">1</a><a href='b.pdf'>2</a><img src="c.png">"#;

        let links = extract_links(page, "", BASE);

        assert_eq!(
            links,
            vec!["https://example.com/a.zip", "https://example.com/b.pdf"]
        );
        assert_eq!(LinkPattern::new("").unwrap().extension(), "");
    }

    #[test]
    fn test_link_pattern_reports_extension() {
        let pattern = LinkPattern::new(".iso").unwrap();
        assert_eq!(pattern.extension(), ".iso");
    }
}
