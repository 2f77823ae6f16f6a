use std::time::Duration;

use serde::Deserialize;

use crate::Result;
use crate::credentials::{ClientCredentials, StoredToken};
use crate::notification::ChannelId;

/// Default polling interval per watcher.
pub const DEFAULT_INTERVAL_SECS: u64 = 120;

/// Intervals below this are raised to it.
pub const MIN_INTERVAL_SECS: u64 = 10;

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// The whole config document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub discord: DiscordSettings,
    #[serde(default)]
    pub twitch: Option<TwitchSettings>,
    #[serde(default)]
    pub youtube: Option<YouTubeSettings>,
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Chat delivery settings.
#[derive(Clone, Deserialize)]
pub struct DiscordSettings {
    /// Bot token. May be supplied through `DISCORD_BOT_TOKEN` instead.
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_discord_api_base(),
        }
    }
}

impl std::fmt::Debug for DiscordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSettings")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Settings shared by every watcher.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSettings {
    /// Destination chat channel.
    pub channel_id: ChannelId,
    /// Channel names to watch, in notification order.
    #[serde(default)]
    pub watchlist: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl WatchSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(MIN_INTERVAL_SECS))
    }
}

#[derive(Clone, Deserialize)]
pub struct TwitchSettings {
    pub client_id: String,
    pub client_secret: String,
    /// Last granted app access token.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Expiry of `bearer_token` as unix seconds.
    #[serde(default)]
    pub expiry: Option<f64>,
    /// Helix base URL override.
    #[serde(default)]
    pub api_base: Option<String>,
    /// Token grant URL override.
    #[serde(default)]
    pub grant_url: Option<String>,
    #[serde(flatten)]
    pub watch: WatchSettings,
}

impl TwitchSettings {
    pub fn client_credentials(&self) -> ClientCredentials {
        ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }

    pub fn stored_token(&self) -> Option<StoredToken> {
        StoredToken::from_persisted(self.bearer_token.as_deref(), self.expiry)
    }
}

impl std::fmt::Debug for TwitchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchSettings")
            .field("client_id", &self.client_id)
            .field("expiry", &self.expiry)
            .field("api_base", &self.api_base)
            .field("grant_url", &self.grant_url)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Deserialize)]
pub struct YouTubeSettings {
    pub api_key: String,
    /// Data API base URL override.
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(flatten)]
    pub watch: WatchSettings,
}

impl std::fmt::Debug for YouTubeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeSettings")
            .field("api_base", &self.api_base)
            .field("watch", &self.watch)
            .finish_non_exhaustive()
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_discord_api_base() -> String {
    DEFAULT_DISCORD_API_BASE.to_string()
}
