use serde::Deserialize;
use thiserror::Error;

/// Failure of a call against the photo API.
///
/// Kept `Clone` so results can travel inside UI messages; transport errors
/// are flattened to their display text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never got a response (DNS, connection, TLS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("request failed with status {status}")]
    Rejected {
        status: u16,
        /// The `message` field of the error body, when the server sent one
        message: Option<String>,
    },

    /// The response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The configured base URL cannot be used to build endpoints
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Text to put in front of the user: the server's message verbatim when
    /// present, otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pull the `message` field out of an error response body
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
