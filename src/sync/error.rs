use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the sections backend.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The listing endpoint answered with something other than a JSON array.
    /// A sleeping backend typically does this while it boots.
    #[error("expected a list of sections, got: {0}")]
    NotAnArray(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API url {url}: {reason}")]
    Url { url: String, reason: String },
}
