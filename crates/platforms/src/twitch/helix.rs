//! Bulk user and stream lookups against the Helix REST API.

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{HelixPage, HelixStream, TwitchStream, TwitchUser};
use crate::error::canonical_reason;
use crate::{PlatformError, Result};

pub const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Helix accepts at most this many `login`/`user_id` parameters per request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Helix client. Tokens are passed per call; the caller owns their lifecycle.
#[derive(Debug, Clone)]
pub struct TwitchClient {
    client: Client,
    base_url: String,
    client_id: String,
}

impl TwitchClient {
    pub fn new(client: Client, client_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: HELIX_BASE_URL.to_string(),
            client_id: client_id.into(),
        }
    }

    /// Point the client at a different Helix base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Look up users by login name.
    ///
    /// The result follows the order of `logins`. Logins are matched
    /// case-insensitively; unknown logins are dropped and duplicates collapse
    /// into a single entry.
    pub async fn get_users(&self, token: &str, logins: &[String]) -> Result<Vec<TwitchUser>> {
        let mut found = Vec::new();
        for chunk in logins.chunks(MAX_IDS_PER_REQUEST) {
            let query: Vec<(&str, &str)> = chunk.iter().map(|l| ("login", l.as_str())).collect();
            let page: HelixPage<TwitchUser> = self.get("users", token, &query).await?;
            found.extend(page.data);
        }

        let mut ordered = Vec::with_capacity(found.len());
        for login in logins {
            if let Some(pos) = found
                .iter()
                .position(|u| u.login.eq_ignore_ascii_case(login))
            {
                ordered.push(found.swap_remove(pos));
            }
        }

        debug!(
            requested = logins.len(),
            resolved = ordered.len(),
            "Resolved Twitch users"
        );
        Ok(ordered)
    }

    /// Look up live streams for the given users.
    ///
    /// Users without an entry in the response are offline.
    pub async fn get_streams(
        &self,
        token: &str,
        users: &[TwitchUser],
    ) -> Result<Vec<TwitchStream>> {
        let mut streams = Vec::new();
        for chunk in users.chunks(MAX_IDS_PER_REQUEST) {
            let mut query: Vec<(&str, &str)> =
                chunk.iter().map(|u| ("user_id", u.id.as_str())).collect();
            query.push(("first", "100"));

            let page: HelixPage<HelixStream> = self.get("streams", token, &query).await?;
            for entry in page.data {
                let Some(user) = chunk.iter().find(|u| u.id == entry.user_id) else {
                    debug!(user_id = %entry.user_id, "Ignoring stream of unrequested user");
                    continue;
                };
                streams.push(entry.into_stream(user.clone()));
            }
        }
        Ok(streams)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(token)
            .header("Client-Id", &self.client_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = error_reason(response).await;
            return Err(PlatformError::Request { status, reason });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct HelixError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Extract the human-readable reason from a Helix or OAuth error body.
pub(crate) async fn error_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<HelixError>(&body) {
        Ok(e) if !e.message.is_empty() => e.message,
        Ok(e) if !e.error.is_empty() => e.error,
        _ => canonical_reason(status),
    }
}
