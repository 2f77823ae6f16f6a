use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    fn smallest(&self) -> Option<&str> {
        [&self.default, &self.medium, &self.high]
            .into_iter()
            .flatten()
            .map(|t| t.url.as_str())
            .next()
    }

    fn largest(&self) -> Option<&str> {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.as_str())
            .next()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchId {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchSnippet {
    pub published_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub reason: String,
}

impl ErrorBody {
    /// First machine-readable reason, falling back to the message.
    pub(crate) fn into_reason(self) -> Option<String> {
        self.errors
            .into_iter()
            .map(|e| e.reason)
            .find(|r| !r.is_empty())
            .or_else(|| Some(self.message).filter(|m| !m.is_empty()))
    }
}

/// A YouTube channel resolved from a configured name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeChannel {
    pub id: String,
    pub name: String,
    pub icon_url: String,
}

impl YouTubeChannel {
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.id)
    }

    pub(crate) fn from_item(item: ChannelItem) -> Self {
        let icon_url = item
            .snippet
            .thumbnails
            .smallest()
            .unwrap_or_default()
            .to_string();
        Self {
            id: item.id,
            name: item.snippet.title,
            icon_url,
        }
    }
}

/// A live broadcast found through the search endpoint.
///
/// Equality is by video id.
#[derive(Debug, Clone)]
pub struct YouTubeStream {
    pub channel: YouTubeChannel,
    pub video_id: String,
    pub started_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
}

impl YouTubeStream {
    pub fn url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }

    pub(crate) fn from_item(channel: YouTubeChannel, item: SearchItem) -> Option<Self> {
        let video_id = item.id.video_id?;
        let thumbnail_url = item
            .snippet
            .thumbnails
            .largest()
            .unwrap_or_default()
            .to_string();
        Some(Self {
            channel,
            video_id,
            started_at: item.snippet.published_at,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail_url,
        })
    }
}

impl PartialEq for YouTubeStream {
    fn eq(&self, other: &Self) -> bool {
        self.video_id == other.video_id
    }
}

impl Eq for YouTubeStream {}
