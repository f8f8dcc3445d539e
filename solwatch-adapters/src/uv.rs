//! OpenWeatherMap UV index.
//!
//! The endpoint needs an API key. Without one the adapter does not touch the
//! network and reports [`AdapterError::CredentialUnavailable`], which callers
//! treat as an expected skip rather than a failure.
//!
//! The response is a single record:
//!
//! ```json
//! {"lat": 50.7, "lon": 9.3, "date_iso": "2024-05-10T12:00:00Z", "date": 1715342400, "value": 6.41}
//! ```

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::client::{build_client, get_json, DEFAULT_TIMEOUT};
use crate::AdapterError;

pub const DEFAULT_UV_URL: &str = "http://api.openweathermap.org/data/2.5/uvi";

/// Default observation point: Hesse, Germany.
pub const DEFAULT_LATITUDE: f64 = 50.7;
pub const DEFAULT_LONGITUDE: f64 = 9.3;

/// Fetches the current UV index for one location.
#[derive(Clone)]
pub struct UvAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl UvAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> UvAdapterBuilder {
        UvAdapterBuilder::default()
    }

    /// Whether a request will be attempted at all.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current UV record.
    pub async fn fetch(&self) -> Result<Value, AdapterError> {
        let Some(ref key) = self.api_key else {
            return Err(AdapterError::CredentialUnavailable);
        };

        debug!(
            url = %self.endpoint,
            lat = self.latitude,
            lon = self.longitude,
            "fetching UV index"
        );
        let request = self.client.get(&self.endpoint).query(&[
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("appid", key.clone()),
        ]);
        get_json(request).await
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for UvAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UvAdapter")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .finish()
    }
}

/// Builder for [`UvAdapter`].
#[derive(Debug, Default)]
pub struct UvAdapterBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timeout: Option<Duration>,
}

impl UvAdapterBuilder {
    /// Override the API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key. Empty or whitespace-only keys count as missing.
    pub fn api_key(mut self, key: Option<impl Into<String>>) -> Self {
        self.api_key = key.map(Into::into).filter(|k: &String| !k.trim().is_empty());
        self
    }

    /// Set the observation point (default: 50.7 N, 9.3 E).
    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<UvAdapter, AdapterError> {
        Ok(UvAdapter {
            client: build_client(self.timeout.unwrap_or(DEFAULT_TIMEOUT))?,
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_UV_URL.to_string()),
            api_key: self.api_key,
            latitude: self.latitude.unwrap_or(DEFAULT_LATITUDE),
            longitude: self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_builder_defaults() {
        let adapter = UvAdapter::builder().build().unwrap();
        assert_eq!(adapter.endpoint(), DEFAULT_UV_URL);
        assert_eq!(adapter.location(), (DEFAULT_LATITUDE, DEFAULT_LONGITUDE));
        assert!(!adapter.has_credential());
    }

    #[test]
    fn test_blank_key_is_missing() {
        let adapter = UvAdapter::builder().api_key(Some("   ")).build().unwrap();
        assert!(!adapter.has_credential());
    }

    #[test]
    fn test_debug_redacts_key() {
        let adapter = UvAdapter::builder().api_key(Some("secret-key")).build().unwrap();
        let debug = format!("{:?}", adapter);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_fetch_without_key_skips_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

        let adapter = UvAdapter::builder()
            .endpoint(format!("{}/data/2.5/uvi", server.url()))
            .api_key(None::<String>)
            .build()
            .unwrap();

        let err = adapter.fetch().await.unwrap_err();
        assert!(err.is_credential_unavailable());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_sends_location_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data/2.5/uvi")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "48.1".into()),
                Matcher::UrlEncoded("lon".into(), "11.6".into()),
                Matcher::UrlEncoded("appid".into(), "k123".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"lat":48.1,"lon":11.6,"date_iso":"2024-05-10T12:00:00Z","date":1715342400,"value":7.1}"#)
            .create_async()
            .await;

        let adapter = UvAdapter::builder()
            .endpoint(format!("{}/data/2.5/uvi", server.url()))
            .api_key(Some("k123"))
            .location(48.1, 11.6)
            .build()
            .unwrap();

        let payload = adapter.fetch().await.unwrap();
        mock.assert_async().await;
        assert_eq!(payload["value"], 7.1);
    }

    #[tokio::test]
    async fn test_fetch_rejected_key() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/data/2.5/uvi")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"cod":401,"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let adapter = UvAdapter::builder()
            .endpoint(format!("{}/data/2.5/uvi", server.url()))
            .api_key(Some("bad"))
            .build()
            .unwrap();

        let err = adapter.fetch().await.unwrap_err();
        assert!(matches!(err, AdapterError::Auth(_)));
    }
}
