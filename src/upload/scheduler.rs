//! Upload scheduler
//!
//! Decides between single-file and directory mode, then runs the uploads.
//!
//! # Directory mode
//!
//! ```text
//! Walking -> Dispatching (<= N in flight) -> Draining -> Success | Aborted
//! ```
//!
//! - The whole file list is materialized before the first dispatch.
//! - A worker slot is a semaphore permit. The dispatch loop waits for a free
//!   permit before spawning each worker; the worker gives it back when its
//!   upload attempt returns, whether it succeeded or not.
//! - After the first failure no new job is dispatched. Workers already in
//!   flight run to completion and the first error is returned once all of
//!   them have settled.

use super::key::KeyNamer;
use super::walker::{clean_absolute, TreeWalker};
use super::{
    FileUploader, ObjectStore, RunReport, UploadError, UploadJob, UploadMode, UploadOutcome,
};
use crate::config::Config;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Runs one complete upload pass for a [`Config`]
pub struct UploadScheduler {
    config: Arc<Config>,
    uploader: FileUploader,
    namer: KeyNamer,
}

impl UploadScheduler {
    pub fn new(config: Arc<Config>, store: Arc<dyn ObjectStore>) -> Self {
        let namer = KeyNamer::new(config.bucket_prefix.clone());
        Self {
            config,
            uploader: FileUploader::new(store),
            namer,
        }
    }

    /// Upload the configured source
    ///
    /// Returns the first error encountered; there is no partial-success
    /// result.
    pub async fn run(&self) -> Result<RunReport, UploadError> {
        let source = &self.config.source;
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|e| UploadError::Stat {
                path: source.clone(),
                source: e,
            })?;

        if metadata.is_dir() {
            self.run_directory().await
        } else if metadata.is_file() {
            self.run_single_file().await
        } else {
            Err(UploadError::UnsupportedSource(source.clone()))
        }
    }

    async fn run_single_file(&self) -> Result<RunReport, UploadError> {
        let source = &self.config.source;
        tracing::info!(
            mode = %UploadMode::SingleFile,
            source = %source.display(),
            "Uploading single file"
        );

        let job = UploadJob {
            source: source.clone(),
            bucket: self.config.bucket.clone(),
            key: self.namer.single_file(source),
            acl: self.config.permissions.clone(),
        };

        let outcome = self.uploader.upload(job).await?;

        Ok(RunReport {
            mode: UploadMode::SingleFile,
            files: 1,
            bytes: outcome.bytes,
        })
    }

    async fn run_directory(&self) -> Result<RunReport, UploadError> {
        let source = &self.config.source;
        let root = clean_absolute(source).map_err(|e| UploadError::Stat {
            path: source.clone(),
            source: e,
        })?;

        let files = TreeWalker::new(root.clone()).walk_blocking().await?;

        tracing::info!(
            mode = %UploadMode::Directory,
            root = %root.display(),
            files = files.len(),
            concurrency = self.config.concurrency,
            "Uploading directory"
        );

        self.dispatch(&root, files).await
    }

    async fn dispatch(&self, root: &Path, files: Vec<PathBuf>) -> Result<RunReport, UploadError> {
        let slots = Arc::new(Semaphore::new(self.config.concurrency));
        let aborted = Arc::new(AtomicBool::new(false));
        let mut workers = JoinSet::new();
        let mut tally = Tally::default();

        for file in files {
            let permit = match slots.clone().acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed.
                Err(e) => {
                    tally.record(Ok(Err(UploadError::Worker(e.to_string()))));
                    break;
                }
            };

            while let Some(result) = workers.try_join_next() {
                tally.record(result);
            }

            if aborted.load(Ordering::Acquire) || tally.failed() {
                tracing::debug!("Dispatch stopped after upload failure");
                break;
            }

            let job = UploadJob {
                key: self.namer.directory(root, &file),
                source: file,
                bucket: self.config.bucket.clone(),
                acl: self.config.permissions.clone(),
            };

            let uploader = self.uploader.clone();
            let aborted = aborted.clone();
            workers.spawn(async move {
                let result = uploader.upload(job).await;
                if result.is_err() {
                    aborted.store(true, Ordering::Release);
                }
                drop(permit);
                result
            });
        }

        tracing::debug!(in_flight = workers.len(), "Draining upload workers");
        while let Some(result) = workers.join_next().await {
            tally.record(result);
        }

        tally.finish()
    }
}

/// Completion counts and the first error seen
#[derive(Default)]
struct Tally {
    files: usize,
    bytes: u64,
    first_error: Option<UploadError>,
}

impl Tally {
    fn record(&mut self, result: Result<Result<UploadOutcome, UploadError>, JoinError>) {
        let error = match result {
            Ok(Ok(outcome)) => {
                self.files += 1;
                self.bytes += outcome.bytes;
                return;
            }
            Ok(Err(e)) => e,
            Err(e) => UploadError::Worker(e.to_string()),
        };

        if self.first_error.is_none() {
            self.first_error = Some(error);
        } else {
            tracing::error!(error = %error, "Upload failed");
        }
    }

    fn failed(&self) -> bool {
        self.first_error.is_some()
    }

    fn finish(self) -> Result<RunReport, UploadError> {
        match self.first_error {
            Some(e) => Err(e),
            None => Ok(RunReport {
                mode: UploadMode::Directory,
                files: self.files,
                bytes: self.bytes,
            }),
        }
    }
}
