use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Envelope of every Helix list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct HelixPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// A Twitch account as returned by `GET /helix/users`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwitchUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub user_type: String,
    #[serde(default)]
    pub broadcaster_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub offline_image_url: String,
}

impl TwitchUser {
    pub fn url(&self) -> String {
        format!("https://twitch.tv/{}", self.login)
    }
}

/// Raw entry of `GET /helix/streams`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HelixStream {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(rename = "type", default)]
    pub stream_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl HelixStream {
    pub(crate) fn into_stream(self, user: TwitchUser) -> TwitchStream {
        TwitchStream {
            id: self.id,
            user,
            game_id: self.game_id,
            game_name: self.game_name,
            stream_type: self.stream_type,
            title: self.title,
            tags: self.tags.unwrap_or_default(),
            viewer_count: self.viewer_count,
            started_at: self.started_at,
            language: self.language,
            thumbnail_url: self.thumbnail_url,
        }
    }
}

/// A live broadcast of a watched user.
///
/// Two values are equal when they describe the same broadcast (same stream
/// id), regardless of title or viewer count changes between polls.
#[derive(Debug, Clone)]
pub struct TwitchStream {
    pub id: String,
    pub user: TwitchUser,
    pub game_id: String,
    pub game_name: String,
    pub stream_type: String,
    pub title: String,
    pub tags: Vec<String>,
    pub viewer_count: u64,
    pub started_at: DateTime<Utc>,
    pub language: String,
    /// Template URL with `{width}` and `{height}` placeholders.
    pub thumbnail_url: String,
}

impl TwitchStream {
    pub fn url(&self) -> String {
        self.user.url()
    }

    /// Preview image URL at the requested size.
    pub fn thumbnail(&self, width: u32, height: u32) -> String {
        self.thumbnail_url
            .replace("{width}", &width.to_string())
            .replace("{height}", &height.to_string())
    }
}

impl PartialEq for TwitchStream {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TwitchStream {}
