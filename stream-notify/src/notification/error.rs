use reqwest::StatusCode;
use thiserror::Error;

use super::ChannelId;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The destination channel does not exist or is not visible to the bot.
    #[error("destination channel {0} not found")]
    ChannelNotFound(ChannelId),

    /// The chat service refused the request.
    #[error("rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
