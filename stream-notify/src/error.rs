//! Application-wide error types.

use platforms_api::PlatformError;
use thiserror::Error;

use crate::credentials::CredentialError;
use crate::notification::DeliveryError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// The platform refused a data request because its API quota is spent.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Platform(e) if e.is_quota_exceeded())
    }
}
