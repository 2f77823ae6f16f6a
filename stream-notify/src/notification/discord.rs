//! Discord bot channel.
//!
//! Posts embeds through the REST API with a bot token. The connection check
//! fetches the bot's own user.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{ChannelId, ChatSink, DeliveryError, Embed};
use crate::config::DEFAULT_DISCORD_API_BASE;

/// Discord channel configuration.
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token, sent as `Authorization: Bot <token>`.
    pub bot_token: String,
    /// REST base URL, without a trailing slash.
    pub api_base: String,
}

impl DiscordConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: DEFAULT_DISCORD_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"***")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    id: String,
    #[serde(default)]
    username: String,
}

/// Discord notification channel.
pub struct DiscordChannel {
    config: DiscordConfig,
    client: Client,
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn authorization(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    fn build_payload(embed: &Embed) -> serde_json::Value {
        json!({ "embeds": [embed] })
    }
}

#[async_trait]
impl ChatSink for DiscordChannel {
    fn sink_type(&self) -> &'static str {
        "discord"
    }

    async fn connect(&self) -> Result<(), DeliveryError> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.config.api_base))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected { status, body });
        }

        let user: CurrentUser = response.json().await?;
        debug!(id = %user.id, username = %user.username, "Logged in to Discord");
        Ok(())
    }

    async fn deliver(&self, channel: &ChannelId, embed: &Embed) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(format!(
                "{}/channels/{}/messages",
                self.config.api_base, channel
            ))
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .json(&Self::build_payload(embed))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(channel = %channel, title = %embed.title, "Discord message sent");
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DeliveryError::ChannelNotFound(channel.clone()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected { status, body })
    }
}
