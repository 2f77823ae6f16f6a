//! Credential error types.

use platforms_api::PlatformError;
use thiserror::Error;

/// Errors that can occur while obtaining a bearer credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The grant endpoint rejected the request or could not be reached.
    #[error("Token grant failed: {0}")]
    Grant(#[from] PlatformError),

    /// Client id or secret is empty.
    #[error("Missing client credential: {0}")]
    MissingClientCredential(&'static str),

    /// The refreshed token could not be written back.
    #[error("Failed to persist token: {0}")]
    Store(String),
}

impl CredentialError {
    /// Check if this error will not go away without a config change.
    pub fn requires_config_change(&self) -> bool {
        match self {
            Self::MissingClientCredential(_) => true,
            Self::Grant(e) => e.status().is_some_and(|s| s.is_client_error()),
            Self::Store(_) => false,
        }
    }
}

impl From<crate::Error> for CredentialError {
    fn from(err: crate::Error) -> Self {
        CredentialError::Store(err.to_string())
    }
}
