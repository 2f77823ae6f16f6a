use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use platforms_api::twitch::{TwitchClient, TwitchStream, TwitchUser};
use reqwest::Client;
use tracing::debug;

use super::source::{Platform, PlatformClient};
use super::tracker::Tracked;
use crate::config::{AppConfig, TwitchSettings, WatchSettings};
use crate::credentials::{BearerToken, CredentialProvider};
use crate::notification::{Embed, twitch_embed};
use crate::{Error, Result};

impl Tracked for TwitchStream {
    fn channel_key(&self) -> &str {
        &self.user.id
    }

    fn stream_key(&self) -> &str {
        &self.id
    }
}

/// Twitch Helix source.
///
/// Bearer tokens come from the shared [`CredentialProvider`]. A request
/// answered with 401 is retried once with a freshly granted token.
pub struct TwitchSource {
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl TwitchSource {
    pub fn new(client: Client, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn helix(&self, settings: &TwitchSettings) -> TwitchClient {
        let helix = TwitchClient::new(self.client.clone(), settings.client_id.clone());
        match &settings.api_base {
            Some(base) => helix.with_base_url(base.clone()),
            None => helix,
        }
    }

    async fn with_token<T, F, Fut>(&self, settings: &TwitchSettings, call: F) -> Result<T>
    where
        F: Fn(BearerToken) -> Fut + Send,
        Fut: Future<Output = platforms_api::Result<T>> + Send,
        T: Send,
    {
        let credentials = settings.client_credentials();
        let token = self.credentials.get_token(&credentials).await?;
        match call(token).await {
            Err(e) if e.is_unauthorized() => {
                debug!(error = %e, "Twitch rejected the bearer token, refreshing");
                self.credentials.invalidate();
                let token = self.credentials.get_token(&credentials).await?;
                Ok(call(token).await?)
            }
            result => Ok(result?),
        }
    }
}

fn section(config: &AppConfig) -> Result<&TwitchSettings> {
    config
        .twitch
        .as_ref()
        .ok_or_else(|| Error::config("missing 'twitch' section"))
}

#[async_trait]
impl PlatformClient for TwitchSource {
    type Channel = TwitchUser;
    type Stream = TwitchStream;

    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    fn watch_settings<'a>(&self, config: &'a AppConfig) -> Option<&'a WatchSettings> {
        config.twitch.as_ref().map(|s| &s.watch)
    }

    fn channel_key<'a>(&self, channel: &'a TwitchUser) -> &'a str {
        &channel.id
    }

    async fn resolve_channels(
        &self,
        config: &AppConfig,
        names: &[String],
    ) -> Result<Vec<TwitchUser>> {
        let settings = section(config)?;
        let helix = &self.helix(settings);
        self.with_token(settings, move |token| async move {
            helix.get_users(token.as_str(), names).await
        })
        .await
    }

    async fn list_live_streams(
        &self,
        config: &AppConfig,
        channels: &[TwitchUser],
    ) -> Result<Vec<TwitchStream>> {
        let settings = section(config)?;
        let helix = &self.helix(settings);
        self.with_token(settings, move |token| async move {
            helix.get_streams(token.as_str(), channels).await
        })
        .await
    }

    fn render(&self, stream: &TwitchStream) -> Embed {
        twitch_embed(stream)
    }
}
