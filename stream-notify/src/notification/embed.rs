//! Rich notification payloads.
//!
//! [`Embed`] serializes to the Discord embed object; the platform renderers
//! fill it from a live stream.

use chrono::{DateTime, Utc};
use platforms_api::twitch::TwitchStream;
use platforms_api::youtube::YouTubeStream;
use serde::Serialize;

pub const TWITCH_COLOR: u32 = 0x6441a5;
pub const YOUTUBE_COLOR: u32 = 0xff0000;

pub const TWITCH_ICON_URL: &str =
    "https://media.discordapp.net/attachments/1062074624935993427/1101142491450835036/5968819.png";
pub const YOUTUBE_ICON_URL: &str = "https://media.discordapp.net/attachments/1062074624935993427/1101142491199180831/youtube-icon.png?width=519&height=519";

const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_VALUE_LIMIT: usize = 1024;

const TWITCH_PREVIEW_SIZE: (u32, u32) = (1920, 1080);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new(title: &str, url: impl Into<String>, color: u32) -> Self {
        Self {
            title: truncate_chars(title, TITLE_LIMIT),
            url: url.into(),
            color,
            ..Default::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        if !description.is_empty() {
            self.description = Some(truncate_chars(description, DESCRIPTION_LIMIT));
        }
        self
    }

    pub fn author(
        mut self,
        name: impl Into<String>,
        url: impl Into<String>,
        icon_url: impl Into<String>,
    ) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            url: url.into(),
            icon_url: icon_url.into(),
        });
        self
    }

    /// Small image in the corner. Empty URLs are skipped.
    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = image(url.into());
        self
    }

    /// Large image below the fields. Empty URLs are skipped.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = image(url.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: truncate_chars(value, FIELD_VALUE_LIMIT),
            inline,
        });
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

fn image(url: String) -> Option<EmbedImage> {
    (!url.is_empty()).then_some(EmbedImage { url })
}

fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((end, _)) => {
            let cut = s[..end].char_indices().nth(limit - 1).map_or(end, |(i, _)| i);
            format!("{}…", &s[..cut])
        }
        None => s.to_string(),
    }
}

/// Chat markup that renders as "3 minutes ago" in the reader's locale.
pub fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

/// `1234567` -> `1,234,567`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn twitch_embed(stream: &TwitchStream) -> Embed {
    let url = stream.url();
    let game = if stream.game_name.is_empty() {
        "Unknown"
    } else {
        stream.game_name.as_str()
    };
    let (width, height) = TWITCH_PREVIEW_SIZE;

    let mut embed = Embed::new(&stream.title, url.clone(), TWITCH_COLOR)
        .author(
            format!("{} is now live on Twitch!", stream.user.display_name),
            url,
            TWITCH_ICON_URL,
        )
        .thumbnail(stream.user.profile_image_url.clone())
        .field("Started", &relative_timestamp(stream.started_at), false)
        .field("Game", game, true)
        .field("Viewers", &format_thousands(stream.viewer_count), true);
    if !stream.tags.is_empty() {
        embed = embed.field("Tags", &stream.tags.join(", "), false);
    }
    embed.image(stream.thumbnail(width, height))
}

pub fn youtube_embed(stream: &YouTubeStream) -> Embed {
    Embed::new(&stream.title, stream.url(), YOUTUBE_COLOR)
        .description(&stream.description)
        .author(
            format!("{} is now live on YouTube!", stream.channel.name),
            stream.channel.url(),
            YOUTUBE_ICON_URL,
        )
        .thumbnail(stream.channel.icon_url.clone())
        .field("Started", &relative_timestamp(stream.started_at), false)
        .image(stream.thumbnail_url.clone())
}
