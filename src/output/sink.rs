//! Persistence of fetched resource bodies under the download root

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors local to saving a single resource
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened to a resource handed to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The body was written to this path
    Saved(PathBuf),

    /// Dry run: the body would have been written to this path
    Reported(PathBuf),
}

/// Writes resource bodies below a download root, or only reports them in dry-run mode
#[derive(Debug, Clone)]
pub struct DownloadSink {
    root: PathBuf,
    dry_run: bool,
}

impl DownloadSink {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Persists `body` at `relpath` below the download root
    ///
    /// Missing parent directories are created and an existing file is
    /// overwritten. In dry-run mode nothing touches the filesystem and the
    /// path that would have been written is reported instead.
    pub async fn persist(&self, relpath: &Path, body: &[u8]) -> Result<SaveOutcome, SinkError> {
        let fullpath = self.root.join(relpath);

        if self.dry_run {
            tracing::info!(path = %fullpath.display(), "would save");
            return Ok(SaveOutcome::Reported(fullpath));
        }

        if let Some(parent) = fullpath.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SinkError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tracing::info!(path = %fullpath.display(), "saving");
        tokio::fs::write(&fullpath, body)
            .await
            .map_err(|source| SinkError::Write {
                path: fullpath.clone(),
                source,
            })?;

        Ok(SaveOutcome::Saved(fullpath))
    }
}
