//! Shared HTTP plumbing for the JSON adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::AdapterError;

/// Default per-request timeout. There is no retry.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client(timeout: Duration) -> Result<Client, AdapterError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("solwatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AdapterError::Http(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request and decode the body as untyped JSON.
///
/// Shape checking is left to the normalizer, so any valid JSON is accepted.
pub(crate) async fn get_json(request: RequestBuilder) -> Result<Value, AdapterError> {
    let response = request.send().await?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AdapterError::Auth(format!("API returned status {}", status)));
    }
    if !status.is_success() {
        return Err(AdapterError::Http(format!("API returned status {}", status)));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| AdapterError::Parse(e.to_string()))
}
