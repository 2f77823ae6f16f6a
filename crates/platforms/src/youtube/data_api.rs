//! Channel and live-broadcast lookups against the YouTube Data API.
//!
//! The Data API has no bulk lookup by username, so channels are resolved one
//! request per name and live broadcasts one search per channel. Every search
//! costs 100 quota units, which is why quota exhaustion is common enough for
//! callers to treat it as an expected outcome.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{ChannelItem, ErrorEnvelope, ListResponse, SearchItem, YouTubeChannel, YouTubeStream};
use crate::error::canonical_reason;
use crate::{PlatformError, Result};

pub const DATA_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DATA_API_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different Data API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve a legacy username to its channel, if one exists.
    pub async fn get_channel(&self, name: &str) -> Result<Option<YouTubeChannel>> {
        let response: ListResponse<ChannelItem> = self
            .get("channels", &[("forUsername", name), ("part", "id,snippet")])
            .await?;
        Ok(response.items.into_iter().next().map(YouTubeChannel::from_item))
    }

    /// Resolve every name in order. Unknown names are dropped, and a channel
    /// reached through two names is kept once.
    pub async fn get_channels(&self, names: &[String]) -> Result<Vec<YouTubeChannel>> {
        let mut channels: Vec<YouTubeChannel> = Vec::with_capacity(names.len());
        for name in names {
            match self.get_channel(name).await? {
                Some(channel) if !channels.iter().any(|c| c.id == channel.id) => {
                    channels.push(channel)
                }
                Some(_) => {}
                None => debug!(name = %name, "No YouTube channel for name"),
            }
        }
        Ok(channels)
    }

    /// Most recent live broadcast of `channel`, if it is live.
    pub async fn get_live_stream(&self, channel: &YouTubeChannel) -> Result<Option<YouTubeStream>> {
        let response: ListResponse<SearchItem> = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel.id.as_str()),
                    ("type", "video"),
                    ("eventType", "live"),
                    ("maxResults", "1"),
                    ("order", "date"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .find_map(|item| YouTubeStream::from_item(channel.clone(), item)))
    }

    /// Live broadcasts for every channel, in channel order.
    pub async fn get_live_streams(&self, channels: &[YouTubeChannel]) -> Result<Vec<YouTubeStream>> {
        let mut streams = Vec::new();
        for channel in channels {
            if let Some(stream) = self.get_live_stream(channel).await? {
                streams.push(stream);
            }
        }
        Ok(streams)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.into_reason())
                .unwrap_or_else(|| canonical_reason(status));
            return Err(PlatformError::Request { status, reason });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
