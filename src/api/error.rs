use reqwest::StatusCode;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("unexpected response body ({source}): {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("API access was not granted: {0}")]
    AccessDenied(String),
}

impl ApiError {
    /// Raw server payload attached to the error, if there is one
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } | ApiError::Decode { body, .. } => Some(body),
            ApiError::AccessDenied(body) => Some(body),
            ApiError::Transport(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
