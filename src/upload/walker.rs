//! Directory traversal
//!
//! Enumerates every regular file beneath a root directory. Order is whatever
//! the filesystem yields. Symlinks are not descended into: a link to a
//! directory is skipped, a link to a file is returned, a dangling link fails
//! the walk.

use super::UploadError;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Walks a directory tree and collects its regular files
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Collect every regular file under the root
    ///
    /// Stops at the first entry that cannot be read or statted.
    pub fn walk(&self) -> Result<Vec<PathBuf>, UploadError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|source| UploadError::Walk {
                path: self.root.clone(),
                source,
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.into_path();
            let metadata = std::fs::metadata(&path).map_err(|source| UploadError::Stat {
                path: path.clone(),
                source,
            })?;

            if metadata.is_dir() {
                continue;
            }

            if !metadata.is_file() {
                tracing::warn!(path = %path.display(), "Skipping special file");
                continue;
            }

            files.push(path);
        }

        tracing::debug!(
            root = %self.root.display(),
            files = files.len(),
            "Directory walk completed"
        );

        Ok(files)
    }

    /// Run [`TreeWalker::walk`] on the blocking thread pool
    pub async fn walk_blocking(self) -> Result<Vec<PathBuf>, UploadError> {
        tokio::task::spawn_blocking(move || self.walk())
            .await
            .map_err(|e| UploadError::Worker(e.to_string()))?
    }
}

/// Make `path` absolute and remove `.` and `..` components lexically
///
/// Symlinks are not resolved.
pub fn clean_absolute(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut cleaned = PathBuf::new();

    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    Ok(cleaned)
}
