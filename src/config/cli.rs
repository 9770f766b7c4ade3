//! Command-line flags

use super::{
    Config, DEFAULT_CONCURRENCY, DEFAULT_ENDPOINT, DEFAULT_PERMISSIONS, DEFAULT_REGION,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Tree Uploadr - upload a file or a directory tree to an S3-compatible bucket
#[derive(Parser, Debug)]
#[command(name = "tree-uploadr")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Object storage endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub uri: String,

    /// Object storage region
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Access key id
    #[arg(long = "key-id", default_value = "")]
    pub key_id: String,

    /// Secret access key
    #[arg(long, default_value = "", hide_default_value = true)]
    pub secret: String,

    /// Access permissions (canned ACL) for uploaded objects
    #[arg(long, default_value = DEFAULT_PERMISSIONS)]
    pub permissions: String,

    /// Source for upload (file or directory)
    #[arg(long, default_value = "")]
    pub source: PathBuf,

    /// Destination bucket
    #[arg(long, default_value = "")]
    pub bucket: String,

    /// Key prefix prepended to every object key
    #[arg(long = "bucket-prefix", default_value = "")]
    pub bucket_prefix: String,

    /// Maximum number of simultaneous uploads
    #[arg(long = "thread-num", default_value_t = DEFAULT_CONCURRENCY)]
    pub thread_num: usize,

    /// Use path-style addressing (bucket in the URL path)
    #[arg(long = "path-style")]
    pub path_style: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Args {
    /// Build the run configuration from the parsed flags
    pub fn to_config(&self) -> Config {
        Config {
            endpoint: self.uri.clone(),
            region: self.region.clone(),
            access_key: self.key_id.clone(),
            secret_key: self.secret.clone(),
            permissions: self.permissions.clone(),
            source: self.source.clone(),
            bucket: self.bucket.clone(),
            bucket_prefix: self.bucket_prefix.clone(),
            concurrency: self.thread_num,
            force_path_style: self.path_style,
        }
    }
}
