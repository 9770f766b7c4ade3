//! Tree Uploadr Library
//!
//! Uploads a single file, or every file in a directory tree, to an
//! S3-compatible bucket. Relative directory structure is kept as key
//! prefixes.
//!
//! # Features
//!
//! - **Bounded Concurrency**: At most N uploads in flight in directory mode
//! - **Fail Fast**: The first error stops dispatch and aborts the run
//! - **S3 Compatible**: Any endpoint speaking the S3 PutObject API
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tree_uploadr::{config::Config, s3::S3Client, upload::UploadScheduler};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = Config::new("./site", "my-bucket");
//!     config.bucket_prefix = "www".into();
//!     config.validate()?;
//!
//!     let client = S3Client::from_config(&config).await?;
//!     let scheduler = UploadScheduler::new(Arc::new(config), Arc::new(client));
//!     let report = scheduler.run().await?;
//!     println!("Uploaded {} files", report.files);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod s3;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use upload::{RunReport, UploadError, UploadScheduler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
