//! YouTube Data API v3.

mod data_api;
mod models;

pub use data_api::{DATA_API_BASE_URL, YouTubeClient};
pub use models::{YouTubeChannel, YouTubeStream};
