//! Configuration file.
//!
//! A single JSON document keyed by platform. It is loaded once per tick into
//! an [`AppConfig`] and passed down explicitly; the only writer is the token
//! persistence of the Twitch credential provider.

mod model;
mod store;

pub use model::{
    AppConfig, DEFAULT_DISCORD_API_BASE, DEFAULT_INTERVAL_SECS, DiscordSettings, MIN_INTERVAL_SECS,
    TwitchSettings, WatchSettings, YouTubeSettings,
};
pub use store::ConfigStore;
