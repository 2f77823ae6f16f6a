//! Bearer credential providers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use platforms_api::twitch;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::error::CredentialError;
use super::store::TokenStore;
use super::types::{BearerToken, ClientCredentials, StoredToken};

/// Hands out valid bearer tokens.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a valid token, refreshing it first if the current one is
    /// missing or expired.
    ///
    /// A failed refresh is returned as-is; it is up to the caller whether to
    /// try again.
    async fn get_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<BearerToken, CredentialError>;

    /// Forget the current token so the next [`get_token`](Self::get_token)
    /// refreshes it.
    fn invalidate(&self);
}

/// Twitch app access tokens via the client-credentials grant.
///
/// The current token is kept in memory and written through to a
/// [`TokenStore`] whenever it is refreshed.
pub struct TwitchCredentialProvider {
    client: Client,
    grant_url: String,
    store: Arc<dyn TokenStore>,
    cached: Mutex<Option<StoredToken>>,
    /// Serializes refreshes so concurrent callers share one grant.
    refresh_lock: tokio::sync::Mutex<()>,
}

impl TwitchCredentialProvider {
    /// Create a provider seeded with a previously persisted token.
    pub fn new(client: Client, store: Arc<dyn TokenStore>, seed: Option<StoredToken>) -> Self {
        Self {
            client,
            grant_url: twitch::GRANT_URL.to_string(),
            store,
            cached: Mutex::new(seed),
            refresh_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Use a different token grant endpoint.
    pub fn with_grant_url(mut self, grant_url: impl Into<String>) -> Self {
        self.grant_url = grant_url.into();
        self
    }

    fn current(&self) -> Option<BearerToken> {
        self.cached
            .lock()
            .as_ref()
            .filter(|t| !t.is_expired(Utc::now()))
            .map(|t| t.token.clone())
    }

    async fn refresh(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<BearerToken, CredentialError> {
        if credentials.client_id.is_empty() {
            return Err(CredentialError::MissingClientCredential("client_id"));
        }
        if credentials.client_secret.is_empty() {
            return Err(CredentialError::MissingClientCredential("client_secret"));
        }

        debug!("Refreshing Twitch bearer token");
        let granted = twitch::request_app_token(
            &self.client,
            &self.grant_url,
            &credentials.client_id,
            &credentials.client_secret,
        )
        .await?;

        let stored = StoredToken::granted(granted.access_token, granted.expires_in, Utc::now());
        *self.cached.lock() = Some(stored.clone());

        // The token is usable even if it could not be written back.
        if let Err(e) = self.store.save_token(&stored).await {
            warn!(error = %e, "Failed to persist refreshed Twitch bearer token");
        }

        info!(expires_at = %stored.expires_at, "Refreshed Twitch bearer token");
        Ok(stored.token)
    }
}

#[async_trait]
impl CredentialProvider for TwitchCredentialProvider {
    async fn get_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<BearerToken, CredentialError> {
        if let Some(token) = self.current() {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.current() {
            return Ok(token);
        }
        self.refresh(credentials).await
    }

    fn invalidate(&self) {
        if self.cached.lock().take().is_some() {
            debug!("Invalidated Twitch bearer token");
        }
    }
}
