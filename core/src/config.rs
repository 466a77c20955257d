//! Client configuration.
//!
//! The base URL is an explicit value handed to `HttpClient` at construction.
//! `from_env` is a convenience for binaries; the client never looks at the
//! environment on its own.

/// Origin the client was originally written against.
pub const DEFAULT_BASE_URL: &str = "https://allyspirates.herokuapp.com";

/// Environment variable consulted by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "REQUEST_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `REQUEST_BASE_URL`, falling back to the default origin when it is
    /// unset or empty.
    pub fn from_env() -> Self {
        Self::from_var(std::env::var(BASE_URL_ENV).ok())
    }

    fn from_var(value: Option<String>) -> Self {
        match value {
            Some(base_url) if !base_url.trim().is_empty() => {
                tracing::debug!(%base_url, "base url taken from {BASE_URL_ENV}");
                Self { base_url }
            }
            _ => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
