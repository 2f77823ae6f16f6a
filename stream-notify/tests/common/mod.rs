//! In-process stand-ins for Twitch, YouTube and Discord.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};

#[derive(Debug, Default)]
pub struct FakeState {
    /// Logins the Helix users endpoint knows about.
    pub twitch_users: Vec<String>,
    /// Live Twitch streams as (login, stream id).
    pub twitch_live: Vec<(String, String)>,
    /// Bearer tokens Helix answers with 401.
    pub revoked_tokens: Vec<String>,
    /// Token grants handed out so far.
    pub grants: usize,
    /// Usernames the channels endpoint resolves.
    pub youtube_channels: Vec<String>,
    /// Live YouTube broadcasts as (username, video id).
    pub youtube_live: Vec<(String, String)>,
    pub youtube_quota_exceeded: bool,
    /// Posted messages as (channel id, embed).
    pub messages: Vec<(String, Value)>,
    /// Embed titles the message endpoint refuses.
    pub rejected_titles: Vec<String>,
}

pub type Shared = Arc<Mutex<FakeState>>;

pub struct FakeServices {
    pub base: String,
    pub state: Shared,
}

impl FakeServices {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let router = Router::new()
            .route("/oauth2/token", post(grant))
            .route("/helix/users", get(helix_users))
            .route("/helix/streams", get(helix_streams))
            .route("/youtube/v3/channels", get(youtube_channels))
            .route("/youtube/v3/search", get(youtube_search))
            .route("/discord/users/@me", get(discord_me))
            .route("/discord/channels/{id}/messages", post(discord_message))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            state,
        }
    }

    pub fn titles(&self) -> Vec<String> {
        self.state
            .lock()
            .messages
            .iter()
            .map(|(_, embed)| embed["title"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn twitch_section(&self, watchlist: &[&str]) -> Value {
        json!({
            "client_id": "cid",
            "client_secret": "secret",
            "channel_id": 1111,
            "watchlist": watchlist,
            "api_base": format!("{}/helix", self.base),
            "grant_url": format!("{}/oauth2/token", self.base),
        })
    }

    pub fn youtube_section(&self, watchlist: &[&str]) -> Value {
        json!({
            "api_key": "key",
            "channel_id": "2222",
            "watchlist": watchlist,
            "api_base": format!("{}/youtube/v3", self.base),
        })
    }

    pub fn discord_section(&self) -> Value {
        json!({
            "bot_token": "bot-token",
            "api_base": format!("{}/discord", self.base),
        })
    }
}

/// Write `document` as `config.json` inside `dir`.
pub fn write_config(dir: &tempfile::TempDir, document: &Value) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    path
}

pub fn read_config(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn query_values<'a>(query: &'a Option<String>, key: &str) -> Vec<&'a str> {
    query
        .as_deref()
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| *k == key)
        .map(|(_, v)| v)
        .collect()
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn grant(State(state): State<Shared>, body: String) -> Response {
    if !body.contains("grant_type=client_credentials") || !body.contains("client_id=cid") {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"status": 400, "message": "invalid client"}),
        );
    }
    let mut state = state.lock();
    state.grants += 1;
    Json(json!({
        "access_token": format!("granted-{}", state.grants),
        "expires_in": 5000000,
        "token_type": "bearer"
    }))
    .into_response()
}

fn helix_auth(state: &FakeState, headers: &HeaderMap) -> Option<Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    let client_id = headers.get("client-id").and_then(|v| v.to_str().ok());
    if token.is_empty() || client_id != Some("cid") || state.revoked_tokens.iter().any(|t| t == token)
    {
        return Some(error(
            StatusCode::UNAUTHORIZED,
            json!({"error": "Unauthorized", "status": 401, "message": "Invalid OAuth token"}),
        ));
    }
    None
}

async fn helix_users(
    State(state): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let state = state.lock();
    if let Some(denied) = helix_auth(&state, &headers) {
        return denied;
    }
    let data: Vec<Value> = query_values(&query, "login")
        .into_iter()
        .filter_map(|login| {
            state
                .twitch_users
                .iter()
                .find(|known| known.eq_ignore_ascii_case(login))
        })
        .map(|login| {
            json!({
                "id": format!("id-{login}"),
                "login": login,
                "display_name": login.to_uppercase(),
                "type": "",
                "broadcaster_type": "",
                "description": "",
                "profile_image_url": format!("https://img.example/{login}.png"),
                "offline_image_url": ""
            })
        })
        .collect();
    Json(json!({ "data": data })).into_response()
}

async fn helix_streams(
    State(state): State<Shared>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let state = state.lock();
    if let Some(denied) = helix_auth(&state, &headers) {
        return denied;
    }
    let requested = query_values(&query, "user_id");
    let data: Vec<Value> = state
        .twitch_live
        .iter()
        .filter(|(login, _)| requested.contains(&format!("id-{login}").as_str()))
        .map(|(login, id)| {
            json!({
                "id": id,
                "user_id": format!("id-{login}"),
                "user_login": login,
                "game_id": "1",
                "game_name": "Chess",
                "type": "live",
                "title": id,
                "tags": ["English"],
                "viewer_count": 1500,
                "started_at": "2026-01-01T12:00:00Z",
                "language": "en",
                "thumbnail_url": format!("https://thumb.example/{login}-{{width}}x{{height}}.jpg")
            })
        })
        .collect();
    Json(json!({ "data": data, "pagination": {} })).into_response()
}

fn quota_error() -> Response {
    error(
        StatusCode::FORBIDDEN,
        json!({"error": {
            "code": 403,
            "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{"domain": "youtube.quota", "reason": "quotaExceeded"}]
        }}),
    )
}

async fn youtube_channels(State(state): State<Shared>, RawQuery(query): RawQuery) -> Response {
    let state = state.lock();
    if state.youtube_quota_exceeded {
        return quota_error();
    }
    let name = query_values(&query, "forUsername")
        .first()
        .map(|n| n.to_string())
        .unwrap_or_default();
    let items: Vec<Value> = state
        .youtube_channels
        .iter()
        .filter(|known| **known == name)
        .map(|known| {
            json!({
                "id": format!("UC-{known}"),
                "snippet": {
                    "title": format!("{known} channel"),
                    "thumbnails": {"default": {"url": format!("https://yt3.example/{known}.jpg")}}
                }
            })
        })
        .collect();
    Json(json!({ "items": items })).into_response()
}

async fn youtube_search(State(state): State<Shared>, RawQuery(query): RawQuery) -> Response {
    let state = state.lock();
    if state.youtube_quota_exceeded {
        return quota_error();
    }
    if query_values(&query, "eventType") != ["live"] {
        return error(StatusCode::BAD_REQUEST, json!({"error": {"message": "eventType"}}));
    }
    let channel_id = query_values(&query, "channelId")
        .first()
        .map(|c| c.to_string())
        .unwrap_or_default();
    let items: Vec<Value> = state
        .youtube_live
        .iter()
        .filter(|(name, _)| format!("UC-{name}") == channel_id)
        .map(|(_, video)| {
            json!({
                "id": {"kind": "youtube#video", "videoId": video},
                "snippet": {
                    "publishedAt": "2026-01-01T12:00:00Z",
                    "title": video,
                    "description": "live now",
                    "thumbnails": {"high": {"url": format!("https://i.ytimg.example/{video}.jpg")}}
                }
            })
        })
        .collect();
    Json(json!({ "items": items })).into_response()
}

async fn discord_me(headers: HeaderMap) -> Response {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bot bot-token") {
        return error(StatusCode::UNAUTHORIZED, json!({"message": "401: Unauthorized"}));
    }
    Json(json!({"id": "99", "username": "notifier"})).into_response()
}

async fn discord_message(
    State(state): State<Shared>,
    Path(channel): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock();
    let embed = body["embeds"][0].clone();
    let title = embed["title"].as_str().unwrap_or_default();
    if state.rejected_titles.iter().any(|t| t == title) {
        return error(
            StatusCode::FORBIDDEN,
            json!({"message": "Missing Permissions", "code": 50013}),
        );
    }
    state.messages.push((channel, embed));
    Json(json!({"id": "1"})).into_response()
}
