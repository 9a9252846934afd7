//! Filesystem side of downloads: directory creation and temporary files that
//! only reach their destination once fully written.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::{DirBuilder, File};
use tracing::debug;

use super::error::FetchError;

/// Distinguishes temporary files of concurrent downloads to the same name.
static PART_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Creates `dir` and any missing parents (mode 0o755 on Unix).
///
/// # Errors
///
/// Returns [`FetchError::CreateDir`] if the directory cannot be created.
pub async fn ensure_dir(dir: &Path) -> Result<(), FetchError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);

    builder
        .create(dir)
        .await
        .map_err(|e| FetchError::create_dir(dir, e))
}

/// A download in progress, written next to its destination under a hidden
/// temporary name.
///
/// [`commit`](Self::commit) renames it onto the destination. Dropping it
/// without committing removes the temporary file, so a failed or interrupted
/// download never leaves a truncated file at the destination path.
#[derive(Debug)]
pub(crate) struct PartialFile {
    temp_path: PathBuf,
    destination: PathBuf,
    committed: bool,
}

impl PartialFile {
    /// Creates the temporary file for `destination` and opens it for writing.
    pub(crate) async fn create(destination: &Path) -> Result<(Self, File), FetchError> {
        let temp_path = temp_path_for(destination);
        let file = File::create(&temp_path)
            .await
            .map_err(|e| FetchError::write(temp_path.clone(), e))?;

        Ok((
            Self {
                temp_path,
                destination: destination.to_path_buf(),
                committed: false,
            },
            file,
        ))
    }

    pub(crate) fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Moves the finished file onto its destination, replacing any existing file.
    pub(crate) async fn commit(mut self) -> Result<PathBuf, FetchError> {
        tokio::fs::rename(&self.temp_path, &self.destination)
            .await
            .map_err(|e| FetchError::write(self.destination.clone(), e))?;
        self.committed = true;
        Ok(self.destination.clone())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.temp_path) {
            Ok(()) => debug!(path = %self.temp_path.display(), "removed partial file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                debug!(path = %self.temp_path.display(), error = %e, "could not remove partial file");
            }
        }
    }
}

/// `dir/.pagegrab-<pid>-<seq>.part` for destination `dir/name`.
///
/// The name does not embed the destination's, so any name the filesystem
/// accepts for the destination also leaves room for the temporary file.
fn temp_path_for(destination: &Path) -> PathBuf {
    let seq = PART_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let temp_name = format!(".pagegrab-{}-{seq}.part", std::process::id());
    destination.with_file_name(temp_name)
}
