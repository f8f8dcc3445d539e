//! Error types for adapters.

use thiserror::Error;

/// Errors that can occur when fetching from an upstream endpoint.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The body was not valid JSON.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// No API key configured, so the request was not attempted.
    #[error("No API credential configured")]
    CredentialUnavailable,
}

impl AdapterError {
    /// True for the expected "no key, skip this metric" case.
    pub fn is_credential_unavailable(&self) -> bool {
        matches!(self, AdapterError::CredentialUnavailable)
    }
}

#[cfg(any(feature = "noaa", feature = "uv", feature = "imagery"))]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
