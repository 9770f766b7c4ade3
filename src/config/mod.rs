//! Configuration module for Tree Uploadr
//!
//! Holds the immutable run configuration built once from the command line and
//! shared read-only by every upload worker for the duration of the run.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::Semaphore;

pub mod cli;

pub use cli::{Args, LogFormat};

/// Default object-store endpoint
pub const DEFAULT_ENDPOINT: &str = "https://hb.bizmrg.com";

/// Default store region
pub const DEFAULT_REGION: &str = "ru-msk";

/// Default access-control policy applied to uploaded objects
pub const DEFAULT_PERMISSIONS: &str = "private";

/// Default number of simultaneous uploads in directory mode
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Canned ACLs accepted by S3-compatible stores
pub const CANNED_ACLS: &[&str] = &[
    "private",
    "public-read",
    "public-read-write",
    "authenticated-read",
    "aws-exec-read",
    "bucket-owner-read",
    "bucket-owner-full-control",
];

// ============================================================================
// Validation Helpers
// ============================================================================

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Run configuration
///
/// Built once at startup and never mutated afterwards. Workers receive it
/// behind an `Arc`.
#[derive(Clone)]
pub struct Config {
    /// Object-store endpoint URL
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    /// Canned ACL applied to every uploaded object
    pub permissions: String,
    /// Local file or directory to upload
    pub source: PathBuf,
    pub bucket: String,
    /// Prepended to every derived object key
    pub bucket_prefix: String,
    /// Maximum simultaneous uploads in directory mode
    pub concurrency: usize,
    /// Use path-style bucket addressing instead of virtual-hosted style
    pub force_path_style: bool,
}

impl Config {
    /// Create a configuration for `source` and `bucket` with every other
    /// setting at its default.
    pub fn new(source: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            access_key: String::new(),
            secret_key: String::new(),
            permissions: DEFAULT_PERMISSIONS.to_string(),
            source: source.into(),
            bucket: bucket.into(),
            bucket_prefix: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            force_path_style: false,
        }
    }

    /// Validate the configuration
    ///
    /// Runs before any filesystem or network access, so a bad flag aborts the
    /// run before the first upload is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "A source file or directory must be given".into(),
            ));
        }

        if self.bucket.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "A destination bucket must be given".into(),
            ));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "Concurrency must be at least 1".into(),
            ));
        }

        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::ValidationError(format!(
                "Concurrency {} exceeds the maximum of {}",
                self.concurrency,
                Semaphore::MAX_PERMITS
            )));
        }

        if !is_valid_http_url(&self.endpoint) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid endpoint '{}': must start with http:// or https://",
                self.endpoint
            )));
        }

        if !CANNED_ACLS.contains(&self.permissions.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid permissions '{}': must be one of {}",
                self.permissions,
                CANNED_ACLS.join(", ")
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("permissions", &self.permissions)
            .field("source", &self.source)
            .field("bucket", &self.bucket)
            .field("bucket_prefix", &self.bucket_prefix)
            .field("concurrency", &self.concurrency)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}
