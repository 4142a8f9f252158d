//! Error handling for the API module

use thiserror::Error;

/// Normalized failure of an API call. Every variant carries a human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The client is missing configuration (base URL, token); nothing was sent.
    #[error("{0}")]
    Configuration(String),

    /// The request could not be completed or the response could not be understood.
    #[error("{0}")]
    Transport(String),

    /// The server answered, but without a truthy `success` flag.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl ApiError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(format!("Network error: {}", error))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Transport(format!("Unexpected response shape: {}", error))
    }
}

/// Outcome of an API call: exactly one of a value or an [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;
