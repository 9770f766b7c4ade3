//! Single-file upload
//!
//! Opens one local file and hands it to the store as the object body. The
//! file handle moves into the request and is closed on every exit path.

use super::{ObjectStore, UploadError, UploadJob, UploadOutcome};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::File;

/// Uploads one file per job through an [`ObjectStore`]
#[derive(Clone)]
pub struct FileUploader {
    store: Arc<dyn ObjectStore>,
}

impl FileUploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload the job's source file to its bucket and key
    ///
    /// No retries: an open failure or a store failure is returned as is.
    pub async fn upload(&self, job: UploadJob) -> Result<UploadOutcome, UploadError> {
        tracing::info!(
            source = %job.source.display(),
            bucket = %job.bucket,
            key = %job.key,
            "Upload {} to {}/{}",
            job.source.display(),
            job.bucket,
            job.key
        );

        let file = File::open(&job.source)
            .await
            .map_err(|source| UploadError::Open {
                path: job.source.clone(),
                source,
            })?;

        let bytes = file
            .metadata()
            .await
            .map_err(|source| UploadError::Open {
                path: job.source.clone(),
                source,
            })?
            .len();

        let start_time = Instant::now();
        let response = self
            .store
            .put_object(&job.bucket, &job.key, file, &job.acl)
            .await?;

        tracing::debug!(
            key = %job.key,
            bytes = bytes,
            etag = ?response.etag,
            duration_ms = start_time.elapsed().as_millis(),
            "PutObject upload completed"
        );

        Ok(UploadOutcome {
            key: job.key,
            bytes,
            etag: response.etag,
        })
    }
}
