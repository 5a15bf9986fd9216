//! Error types for the artwork collection gateway

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a status outside the 2xx range
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },

    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body did not decode as an artwork page
    #[error("Invalid response body: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status { status: status.as_u16() }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
