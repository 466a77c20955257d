//! Error types for the API client.
//!
//! # Design
//! There is no variant for non-2xx responses. Status codes are data handed to
//! the caller, never failures raised by the client.

/// Boxed error produced by a `Fetch` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON. No request was sent.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The network primitive failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] BoxError),
}

impl ApiError {
    pub fn transport(err: impl Into<BoxError>) -> Self {
        ApiError::Transport(err.into())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(Box::new(err))
    }
}
