//! Token persistence abstraction.
//!
//! The concrete implementation writes into the config file; see
//! [`crate::config::ConfigStore`].

use async_trait::async_trait;

use super::error::CredentialError;
use super::types::StoredToken;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a freshly granted token together with its expiry.
    async fn save_token(&self, token: &StoredToken) -> Result<(), CredentialError>;
}
