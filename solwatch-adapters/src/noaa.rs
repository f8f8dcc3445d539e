//! NOAA Space Weather Prediction Center products.
//!
//! Both products are JSON tables whose first row is a header:
//!
//! - **Planetary K-index**: `["time_tag", "Kp", "a_running", "station_count"]`,
//!   one row per 3-hour interval
//! - **Solar-wind magnetometer (5 min)**: `["time_tag", "bx_gsm", "by_gsm",
//!   "bz_gsm", "lon_gsm", "lat_gsm", "bt"]`
//!
//! The adapter returns the raw JSON. Column lookup and row selection happen
//! in [`solwatch_types::normalize`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use solwatch_adapters::noaa::NoaaAdapter;
//! use solwatch_types::{normalize, MetricKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = NoaaAdapter::builder().build()?;
//!
//!     let payload = adapter.fetch_kp().await?;
//!     let reading = normalize(&payload, &MetricKind::Kp.schema())?;
//!     println!("Kp {} at {}", reading.value, reading.timestamp);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::client::{build_client, get_json, DEFAULT_TIMEOUT};
use crate::AdapterError;

pub const DEFAULT_KP_URL: &str =
    "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json";
pub const DEFAULT_MAG_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/mag-5-minute.json";

/// Fetches the Kp and magnetometer products.
#[derive(Debug, Clone)]
pub struct NoaaAdapter {
    client: Client,
    kp_url: String,
    mag_url: String,
}

impl NoaaAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> NoaaAdapterBuilder {
        NoaaAdapterBuilder::default()
    }

    /// Fetch the planetary K-index table.
    pub async fn fetch_kp(&self) -> Result<Value, AdapterError> {
        debug!(url = %self.kp_url, "fetching Kp");
        get_json(self.client.get(&self.kp_url)).await
    }

    /// Fetch the 5-minute magnetometer table (source of Bz).
    pub async fn fetch_mag(&self) -> Result<Value, AdapterError> {
        debug!(url = %self.mag_url, "fetching magnetometer");
        get_json(self.client.get(&self.mag_url)).await
    }

    pub fn kp_url(&self) -> &str {
        &self.kp_url
    }

    pub fn mag_url(&self) -> &str {
        &self.mag_url
    }
}

/// Builder for [`NoaaAdapter`].
#[derive(Debug, Default)]
pub struct NoaaAdapterBuilder {
    kp_url: Option<String>,
    mag_url: Option<String>,
    timeout: Option<Duration>,
}

impl NoaaAdapterBuilder {
    /// Override the K-index product URL.
    pub fn kp_url(mut self, url: impl Into<String>) -> Self {
        self.kp_url = Some(url.into());
        self
    }

    /// Override the magnetometer product URL.
    pub fn mag_url(mut self, url: impl Into<String>) -> Self {
        self.mag_url = Some(url.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<NoaaAdapter, AdapterError> {
        Ok(NoaaAdapter {
            client: build_client(self.timeout.unwrap_or(DEFAULT_TIMEOUT))?,
            kp_url: self.kp_url.unwrap_or_else(|| DEFAULT_KP_URL.to_string()),
            mag_url: self.mag_url.unwrap_or_else(|| DEFAULT_MAG_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solwatch_types::{normalize, MetricKind};

    #[test]
    fn test_builder_defaults() {
        let adapter = NoaaAdapter::builder().build().unwrap();
        assert_eq!(adapter.kp_url(), DEFAULT_KP_URL);
        assert_eq!(adapter.mag_url(), DEFAULT_MAG_URL);
    }

    #[test]
    fn test_builder_custom() {
        let adapter = NoaaAdapter::builder()
            .kp_url("http://localhost/kp.json")
            .mag_url("http://localhost/mag.json")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(adapter.kp_url(), "http://localhost/kp.json");
        assert_eq!(adapter.mag_url(), "http://localhost/mag.json");
    }

    #[tokio::test]
    async fn test_fetch_kp_table() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/noaa-planetary-k-index.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[["time_tag","Kp","a_running","station_count"],
                    ["2024-05-10 12:00:00.000","4.67","39","8"],
                    ["2024-05-10 15:00:00.000","6.00","80","8"]]"#,
            )
            .create_async()
            .await;

        let adapter = NoaaAdapter::builder()
            .kp_url(format!("{}/products/noaa-planetary-k-index.json", server.url()))
            .build()
            .unwrap();

        let payload = adapter.fetch_kp().await.unwrap();
        mock.assert_async().await;

        let reading = normalize(&payload, &MetricKind::Kp.schema()).unwrap();
        assert_eq!(reading.value, 6.0);
    }

    #[tokio::test]
    async fn test_fetch_mag_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/mag.json")
            .with_status(503)
            .create_async()
            .await;

        let adapter = NoaaAdapter::builder()
            .mag_url(format!("{}/mag.json", server.url()))
            .build()
            .unwrap();

        let err = adapter.fetch_mag().await.unwrap_err();
        assert!(matches!(err, AdapterError::Http(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/kp.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let adapter = NoaaAdapter::builder()
            .kp_url(format!("{}/kp.json", server.url()))
            .build()
            .unwrap();

        let err = adapter.fetch_kp().await.unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_returns_any_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/kp.json")
            .with_status(200)
            .with_body(r#"{"unexpected": "shape"}"#)
            .create_async()
            .await;

        let adapter = NoaaAdapter::builder()
            .kp_url(format!("{}/kp.json", server.url()))
            .build()
            .unwrap();

        assert_eq!(adapter.fetch_kp().await.unwrap(), json!({"unexpected": "shape"}));
    }
}
