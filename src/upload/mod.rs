//! Upload module
//!
//! The upload pipeline: key derivation, directory traversal, single-file
//! transfer and the bounded-concurrency scheduler that drives a run.

use crate::s3::{S3Client, S3ClientError, S3PutObjectResponse};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs::File;

pub mod file;
pub mod key;
pub mod scheduler;
pub mod walker;

pub use file::FileUploader;
pub use scheduler::UploadScheduler;

/// Upload errors
///
/// Every variant is fatal to the run.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Cannot stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source {} is neither a regular file nor a directory", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store error: {0}")]
    Store(#[from] S3ClientError),

    #[error("Upload worker failed: {0}")]
    Worker(String),
}

/// One file to upload
///
/// Built right before dispatch and owned by the worker that runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub source: PathBuf,
    pub bucket: String,
    pub key: String,
    pub acl: String,
}

/// Result of a successful single-file upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub key: String,
    pub bytes: u64,
    pub etag: Option<String>,
}

/// How the configured source was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    SingleFile,
    Directory,
}

impl fmt::Display for UploadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadMode::SingleFile => f.write_str("file"),
            UploadMode::Directory => f.write_str("directory"),
        }
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: UploadMode,
    pub files: usize,
    pub bytes: u64,
}

/// Store capability used by the pipeline
///
/// Implementations must tolerate concurrent calls from every worker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store the contents of `body` at `key` in `bucket` with canned ACL `acl`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: File,
        acl: &str,
    ) -> Result<S3PutObjectResponse, S3ClientError>;
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: File,
        acl: &str,
    ) -> Result<S3PutObjectResponse, S3ClientError> {
        S3Client::put_object(self, bucket, key, body, acl).await
    }
}
