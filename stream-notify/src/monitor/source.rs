//! The per-platform half of a watcher.

use std::fmt;

use async_trait::async_trait;

use super::tracker::Tracked;
use crate::Result;
use crate::config::{AppConfig, WatchSettings};
use crate::notification::Embed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Twitch,
    YouTube,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitch => "twitch",
            Platform::YouTube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves watched names and lists live streams on one platform.
///
/// Every call receives the config loaded at the start of the tick; sources
/// read their own section from it and keep nothing between ticks except
/// credentials.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    type Channel: Send + Sync;
    type Stream: Tracked + Send + Sync;

    fn platform(&self) -> Platform;

    /// This platform's watch settings, if the section is present.
    fn watch_settings<'a>(&self, config: &'a AppConfig) -> Option<&'a WatchSettings>;

    /// Identifier the tracker keys this channel by.
    fn channel_key<'a>(&self, channel: &'a Self::Channel) -> &'a str;

    /// Resolve configured names to channels, keeping the order of `names`.
    /// Names that match nothing are dropped.
    async fn resolve_channels(
        &self,
        config: &AppConfig,
        names: &[String],
    ) -> Result<Vec<Self::Channel>>;

    /// Live streams among `channels`. Offline channels are simply absent.
    async fn list_live_streams(
        &self,
        config: &AppConfig,
        channels: &[Self::Channel],
    ) -> Result<Vec<Self::Stream>>;

    /// Render the notification for a stream that just went live.
    fn render(&self, stream: &Self::Stream) -> Embed;
}
