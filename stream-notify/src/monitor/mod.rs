//! Live stream watchers.
//!
//! Each platform gets one [`Watcher`]: on every tick it loads the config,
//! asks its [`PlatformClient`] for the live streams of the watch list, diffs
//! them through the [`LiveStateTracker`] and posts one notification per
//! stream that went live.

mod source;
mod tracker;
mod twitch;
mod watcher;
mod youtube;

pub use source::{Platform, PlatformClient};
pub use tracker::{Diff, LiveStateTracker, OnlineState, Tracked, diff};
pub use twitch::TwitchSource;
pub use watcher::{TickOutcome, TickReport, Watcher};
pub use youtube::YouTubeSource;
