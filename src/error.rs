//! Error types for Teamwork API operations.

use thiserror::Error;

/// Errors that can occur while building, sending or decoding an API call.
///
/// Every operation either yields a fully decoded response or exactly one of
/// these variants. Nothing is retried.
#[derive(Debug, Error)]
pub enum TeamworkError {
    /// Configuration is missing or incomplete.
    #[error("Teamwork configuration required: {0}")]
    ConfigMissing(String),

    /// Caller input was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request payload could not be serialized.
    #[error("Failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a status other than the one documented for
    /// the operation.
    #[error("Teamwork API error ({status}): {message}")]
    UnexpectedStatus {
        status: u16,
        message: String,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode {response}: {source}")]
    Decode {
        response: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A create call succeeded but returned no usable identifier.
    #[error("{entity} create response did not include an id")]
    MissingId { entity: &'static str },

    /// The caller cancelled the operation before it completed.
    #[error("Request cancelled")]
    Cancelled,
}

impl TeamworkError {
    /// Status code carried by an [`TeamworkError::UnexpectedStatus`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Teamwork operations.
pub type Result<T> = core::result::Result<T, TeamworkError>;
