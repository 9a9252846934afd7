//! Filename extraction, sanitization, and destination planning.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use url::Url;

/// Name used when a URL has no usable last path segment.
pub const DEFAULT_FILENAME: &str = "downloaded_file";

/// What to do when two links map to the same destination filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Write to the same path; the last download to finish wins.
    #[default]
    Overwrite,
    /// Keep every file: `name.ext`, then `name_2.ext`, `name_3.ext`, ...
    Suffix,
}

impl CollisionPolicy {
    /// Returns the stable label used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Suffix => "suffix",
        }
    }
}

/// Returns the local filename for a URL: its last non-empty path segment,
/// percent-decoded and sanitized.
///
/// Falls back to [`DEFAULT_FILENAME`] when the URL does not parse or its path
/// is empty or `/`.
///
/// # Examples
///
/// ```
/// use pagegrab_core::download::{DEFAULT_FILENAME, extract_filename};
///
/// assert_eq!(extract_filename("https://x.com/dir/report.pdf"), "report.pdf");
/// assert_eq!(extract_filename("https://x.com/"), DEFAULT_FILENAME);
/// assert_eq!(extract_filename("https://x.com"), DEFAULT_FILENAME);
/// ```
#[must_use]
pub fn extract_filename(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    filename_from_url(&parsed)
}

pub(crate) fn filename_from_url(url: &Url) -> String {
    let Some(last) = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
    else {
        return DEFAULT_FILENAME.to_string();
    };

    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    sanitize_filename(&decoded)
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems
/// (`/ \ : * ? " < > |` and control characters) with `_`, and rewrites
/// `.`/`..` so the name can never leave the destination directory.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Assigns destination paths for the files of one page.
///
/// Planning happens before any download starts, so suffix numbering never
/// races between concurrent tasks.
#[derive(Debug)]
pub(crate) struct DestinationPlanner<'a> {
    dir: &'a Path,
    policy: CollisionPolicy,
    reserved: HashSet<PathBuf>,
}

impl<'a> DestinationPlanner<'a> {
    pub(crate) fn new(dir: &'a Path, policy: CollisionPolicy) -> Self {
        Self {
            dir,
            policy,
            reserved: HashSet::new(),
        }
    }

    /// Returns the destination for `url` under the planner's directory.
    pub(crate) fn plan(&mut self, url: &str) -> PathBuf {
        let filename = extract_filename(url);
        let path = match self.policy {
            CollisionPolicy::Overwrite => self.dir.join(&filename),
            CollisionPolicy::Suffix => self.unique_path(&filename),
        };
        self.reserved.insert(path.clone());
        path
    }

    /// `file.zip`, then `file_2.zip`, `file_3.zip`, ... skipping names already
    /// planned for this page or present on disk.
    fn unique_path(&self, filename: &str) -> PathBuf {
        let base_path = self.dir.join(filename);
        if self.is_free(&base_path) {
            return base_path;
        }

        let (stem, ext) = match filename.rfind('.') {
            Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
            _ => (filename, ""),
        };

        (2usize..)
            .map(|i| self.dir.join(format!("{stem}_{i}{ext}")))
            .find(|candidate| self.is_free(candidate))
            .unwrap_or(base_path)
    }

    fn is_free(&self, path: &Path) -> bool {
        !self.reserved.contains(path) && !path.exists()
    }
}
