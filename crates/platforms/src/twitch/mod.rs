//! Twitch Helix API.

mod auth;
mod helix;
mod models;

pub use auth::{AppAccessToken, GRANT_URL, request_app_token};
pub use helix::{HELIX_BASE_URL, MAX_IDS_PER_REQUEST, TwitchClient};
pub use models::{TwitchStream, TwitchUser};
