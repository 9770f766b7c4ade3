//! S3 Credentials Module
//!
//! Resolves the access key pair used to sign store requests.
//!
//! # Resolution order
//!
//! 1. `--key-id` / `--secret` flags, when either is non-empty
//! 2. `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
//! 3. The empty pair, which the store will reject
//!
//! # Example
//!
//! ```
//! use tree_uploadr::config::Config;
//! use tree_uploadr::s3::CredentialsProvider;
//!
//! let mut config = Config::new("/tmp/report.csv", "bucket");
//! config.access_key = "access-key".into();
//! config.secret_key = "secret-key".into();
//!
//! let creds = CredentialsProvider::from_config(&config).unwrap();
//! assert_eq!(creds.access_key_id(), "access-key");
//! assert_eq!(creds.secret_access_key(), "secret-key");
//! ```

use crate::config::Config;
use std::fmt;
use thiserror::Error;

/// Credential loading errors
#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// Credentials for store authentication
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    /// Create new credentials
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Create credentials with session token (for temporary credentials)
    pub fn with_session_token(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: Some(session_token.into()),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// True when neither half of the key pair is set
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty() && self.secret_access_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<Credentials> for aws_credential_types::Credentials {
    fn from(creds: Credentials) -> Self {
        aws_credential_types::Credentials::new(
            creds.access_key_id,
            creds.secret_access_key,
            creds.session_token,
            None,
            "tree-uploadr",
        )
    }
}

/// Factory methods for credential sources
pub struct CredentialsProvider;

impl CredentialsProvider {
    /// Load credentials from environment variables
    ///
    /// Looks for:
    /// - `AWS_ACCESS_KEY_ID`
    /// - `AWS_SECRET_ACCESS_KEY`
    /// - `AWS_SESSION_TOKEN` (optional)
    pub fn from_env() -> Result<Credentials, CredentialsError> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID").map_err(|_| {
            CredentialsError::MissingCredentials("AWS_ACCESS_KEY_ID not set".into())
        })?;

        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
            CredentialsError::MissingCredentials("AWS_SECRET_ACCESS_KEY not set".into())
        })?;

        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(match session_token {
            Some(token) => Credentials::with_session_token(access_key, secret_key, token),
            None => Credentials::new(access_key, secret_key),
        })
    }

    /// Load credentials from the run configuration
    ///
    /// Fails when both `access_key` and `secret_key` are empty.
    pub fn from_config(config: &Config) -> Result<Credentials, CredentialsError> {
        let creds = Credentials::new(config.access_key.clone(), config.secret_key.clone());
        if creds.is_empty() {
            return Err(CredentialsError::MissingCredentials(
                "key-id and secret not set".into(),
            ));
        }
        Ok(creds)
    }

    /// Resolve credentials: flags first, then the environment, then the
    /// empty pair.
    pub fn resolve(config: &Config) -> Credentials {
        if let Ok(creds) = Self::from_config(config) {
            return creds;
        }

        match Self::from_env() {
            Ok(creds) => {
                tracing::debug!("Using credentials from environment");
                creds
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "No credentials configured; requests will be sent with an empty key pair"
                );
                Credentials::new("", "")
            }
        }
    }
}
