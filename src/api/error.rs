//! Error type of the data client.

use thiserror::Error;

/// Failures surfaced by [`crate::api::ApiClient`].
///
/// `Http` and `Transport` are network failures; `Application` is a failure
/// reported inside a successful response body (e.g. a save answering
/// `success: false`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered outside the 2xx range.
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The operation was rejected by the backend.
    #[error("{0}")]
    Application(String),
}

impl ApiError {
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ApiError::Http { .. } | ApiError::Transport(_))
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
