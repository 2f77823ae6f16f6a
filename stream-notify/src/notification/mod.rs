//! Chat notifications.
//!
//! Live streams are rendered into an [`Embed`] and posted to a chat channel
//! through a [`ChatSink`]. Delivery is best-effort: every failure is reported
//! as a [`DeliveryError`] and left to the caller to log.

mod discord;
mod embed;
mod error;
mod ready;

pub use discord::{DiscordChannel, DiscordConfig};
pub use embed::{
    Embed, EmbedAuthor, EmbedField, EmbedImage, TWITCH_COLOR, TWITCH_ICON_URL, YOUTUBE_COLOR,
    YOUTUBE_ICON_URL, format_thousands, relative_timestamp, twitch_embed, youtube_embed,
};
pub use error::DeliveryError;
pub use ready::{ReadyGate, ReadySignal, connect_until_ready, ready_gate};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

/// Identifier of a destination chat channel.
///
/// Accepts either a JSON number or a string in config; chat platforms hand
/// out 64-bit snowflakes that are easier to keep as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChannelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// A chat service that notifications are posted to.
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Get the sink type name.
    fn sink_type(&self) -> &'static str;

    /// Establish (or verify) the connection to the chat service.
    async fn connect(&self) -> Result<(), DeliveryError>;

    /// Post one notification to `channel`.
    async fn deliver(&self, channel: &ChannelId, embed: &Embed) -> Result<(), DeliveryError>;
}
