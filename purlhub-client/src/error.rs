//! Error types for the API binding.

use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the purlHub API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument is missing or malformed. Raised before any
    /// request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote lookup or delete matched nothing.
    #[error("Not Found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// A successful response did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status mirrored by this error, where there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this error represents a 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<purlhub_types::Error> for ApiError {
    fn from(err: purlhub_types::Error) -> Self {
        match err {
            purlhub_types::Error::InvalidValue(msg) => ApiError::InvalidArgument(msg),
            purlhub_types::Error::InvalidShape(msg) => ApiError::InvalidResponse(msg),
            purlhub_types::Error::Serialization(e) => {
                ApiError::InvalidResponse(format!("unexpected payload: {e}"))
            }
        }
    }
}
