//! Client error types.

use thiserror::Error;

/// Errors surfaced by the invocation client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The target URL could not be built.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The response body is not a valid envelope.
    #[error("malformed response (HTTP {status}): {message}")]
    Decode { status: u16, message: String },

    /// The runtime answered with an error envelope.
    #[error("{0}")]
    Remote(String),
}

impl ClientError {
    /// Returns true for failures reported by the actor runtime itself.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote(_))
    }
}
