use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Reasons the YouTube Data API reports when the daily quota is spent.
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The token grant endpoint rejected the client credentials.
    #[error("token grant failed ({status}): {reason}")]
    Auth { status: StatusCode, reason: String },
    /// A data endpoint answered with a non-success status.
    #[error("request failed ({status}): {reason}")]
    Request { status: StatusCode, reason: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlatformError {
    /// HTTP status carried by the error, if the platform answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth { status, .. } | Self::Request { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::Json(_) => None,
        }
    }

    /// Platform-supplied reason for a rejected request.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Auth { reason, .. } | Self::Request { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// A data request was rejected because the bearer token is no longer valid.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Request { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// The platform refused the request because the API quota is exhausted.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Request { reason, .. } if QUOTA_REASONS.contains(&reason.as_str()))
    }
}

/// Fallback reason when the error body carries nothing useful.
pub(crate) fn canonical_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
