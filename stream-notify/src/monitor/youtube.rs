use async_trait::async_trait;
use platforms_api::youtube::{YouTubeChannel, YouTubeClient, YouTubeStream};
use reqwest::Client;

use super::source::{Platform, PlatformClient};
use super::tracker::Tracked;
use crate::config::{AppConfig, WatchSettings, YouTubeSettings};
use crate::notification::{Embed, youtube_embed};
use crate::{Error, Result};

impl Tracked for YouTubeStream {
    fn channel_key(&self) -> &str {
        &self.channel.id
    }

    fn stream_key(&self) -> &str {
        &self.video_id
    }
}

/// YouTube Data API source, authenticated by the section's API key.
pub struct YouTubeSource {
    client: Client,
}

impl YouTubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn data_api(&self, config: &AppConfig) -> Result<YouTubeClient> {
        let settings = section(config)?;
        let api = YouTubeClient::new(self.client.clone(), settings.api_key.clone());
        Ok(match &settings.api_base {
            Some(base) => api.with_base_url(base.clone()),
            None => api,
        })
    }
}

fn section(config: &AppConfig) -> Result<&YouTubeSettings> {
    config
        .youtube
        .as_ref()
        .ok_or_else(|| Error::config("missing 'youtube' section"))
}

#[async_trait]
impl PlatformClient for YouTubeSource {
    type Channel = YouTubeChannel;
    type Stream = YouTubeStream;

    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn watch_settings<'a>(&self, config: &'a AppConfig) -> Option<&'a WatchSettings> {
        config.youtube.as_ref().map(|s| &s.watch)
    }

    fn channel_key<'a>(&self, channel: &'a YouTubeChannel) -> &'a str {
        &channel.id
    }

    async fn resolve_channels(
        &self,
        config: &AppConfig,
        names: &[String],
    ) -> Result<Vec<YouTubeChannel>> {
        Ok(self.data_api(config)?.get_channels(names).await?)
    }

    async fn list_live_streams(
        &self,
        config: &AppConfig,
        channels: &[YouTubeChannel],
    ) -> Result<Vec<YouTubeStream>> {
        Ok(self.data_api(config)?.get_live_streams(channels).await?)
    }

    fn render(&self, stream: &YouTubeStream) -> Embed {
        youtube_embed(stream)
    }
}
