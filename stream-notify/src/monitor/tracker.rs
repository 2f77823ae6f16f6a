//! Live-state deduplication.
//!
//! A poll returns the streams that are live right now. [`diff`] compares that
//! against what has already been announced and yields only the streams that
//! went live since the last poll.

use std::collections::{HashMap, HashSet};

use tracing::trace;

/// A live stream as seen by the tracker.
pub trait Tracked {
    /// Identifier of the channel the stream belongs to.
    fn channel_key(&self) -> &str;

    /// Identifier of this particular broadcast.
    fn stream_key(&self) -> &str;
}

/// Channels believed to be live, mapped to the broadcast that was announced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnlineState {
    streams: HashMap<String, String>,
}

impl OnlineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.streams.contains_key(channel)
    }

    /// The announced broadcast of `channel`, if it is online.
    pub fn stream_of(&self, channel: &str) -> Option<&str> {
        self.streams.get(channel).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Online channel identifiers, in no particular order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OnlineState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            streams: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Result of one [`diff`].
#[derive(Debug)]
pub struct Diff<S> {
    /// Streams to announce, in watch-list order.
    pub newly_live: Vec<S>,
    /// The online state after this poll.
    pub next_online: OnlineState,
}

/// Work out which of `current_live` are new relative to `prior`.
///
/// `watched` holds the channel identifiers being watched, in notification
/// order. Streams of channels outside `watched` are ignored, and a channel
/// listed twice is handled once. A channel that is still online under a
/// different broadcast than the one announced is reported again.
pub fn diff<S: Tracked>(watched: &[String], current_live: Vec<S>, prior: &OnlineState) -> Diff<S> {
    let mut live: HashMap<String, S> = HashMap::with_capacity(current_live.len());
    for stream in current_live {
        live.entry(stream.channel_key().to_string()).or_insert(stream);
    }

    let mut seen = HashSet::with_capacity(watched.len());
    let mut newly_live = Vec::new();
    let mut next_online = OnlineState::new();

    for channel in watched {
        if !seen.insert(channel.as_str()) {
            continue;
        }
        let Some(stream) = live.remove(channel) else {
            if prior.contains(channel) {
                trace!(channel = %channel, "Channel went offline");
            }
            continue;
        };

        next_online
            .streams
            .insert(channel.clone(), stream.stream_key().to_string());
        if prior.stream_of(channel) != Some(stream.stream_key()) {
            newly_live.push(stream);
        }
    }

    Diff {
        newly_live,
        next_online,
    }
}

/// Owns the [`OnlineState`] of one watcher.
#[derive(Debug, Default)]
pub struct LiveStateTracker {
    online: OnlineState,
}

impl LiveStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one poll result and get back the streams to announce.
    pub fn observe<S: Tracked>(&mut self, watched: &[String], current_live: Vec<S>) -> Vec<S> {
        let Diff {
            newly_live,
            next_online,
        } = diff(watched, current_live, &self.online);
        self.online = next_online;
        newly_live
    }

    pub fn online(&self) -> &OnlineState {
        &self.online
    }
}
