//! Client-credentials grant for Twitch app access tokens.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::helix::error_reason;
use crate::{PlatformError, Result};

pub const GRANT_URL: &str = "https://id.twitch.tv/oauth2/token";

/// App access token returned by the grant endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppAccessToken {
    pub access_token: String,
    /// Token validity in seconds.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Request a new app access token.
///
/// A single call; a non-success answer becomes [`PlatformError::Auth`] and is
/// not retried here.
pub async fn request_app_token(
    client: &Client,
    grant_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AppAccessToken> {
    let response = client
        .post(grant_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let reason = error_reason(response).await;
        return Err(PlatformError::Auth { status, reason });
    }

    let token: AppAccessToken = response.json().await?;
    debug!(expires_in = token.expires_in, "Obtained Twitch app access token");
    Ok(token)
}
