//! Latest solar imagery from SDO and SOHO.
//!
//! The dashboard does not render pixels. For each image source the adapter
//! records when the upstream last refreshed it (the `Last-Modified` header),
//! how large it is and what kind of file it is.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::build_client;
use crate::AdapterError;

/// A named image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub label: String,
    pub url: String,
}

impl ImageSource {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }

    /// GIFs from SOHO are animated loops rather than single frames.
    pub fn is_animated(&self) -> bool {
        self.url.to_lowercase().ends_with(".gif")
    }
}

/// The SDO intensitygram, SDO magnetogram and SOHO LASCO C3 coronagraph.
pub fn default_sources() -> Vec<ImageSource> {
    vec![
        ImageSource::new(
            "SDO HMI Intensitygram (sunspots)",
            "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_HMIIF.jpg",
        ),
        ImageSource::new(
            "SDO HMI Magnetogram",
            "https://sdo.gsfc.nasa.gov/assets/img/latest/latest_1024_HMIBC.jpg",
        ),
        ImageSource::new(
            "SOHO LASCO C3 Corona",
            "https://soho.nascom.nasa.gov/data/LATEST/current_c3.gif",
        ),
    ]
}

/// Metadata about the latest version of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub label: String,
    pub url: String,
    /// Parsed `Last-Modified` header, if present and well-formed.
    pub last_modified: Option<DateTime<Utc>>,
    /// When this frame was fetched.
    pub fetched_at: DateTime<Utc>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub animated: bool,
    /// Set when the fetch failed; the other metadata is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImageFrame {
    /// Timestamp to show: upstream modification time, else fetch time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.last_modified.unwrap_or(self.fetched_at)
    }

    /// A frame recording a failed fetch.
    pub fn failed(source: &ImageSource, fetched_at: DateTime<Utc>, error: String) -> Self {
        Self {
            label: source.label.clone(),
            url: source.url.clone(),
            last_modified: None,
            fetched_at,
            content_length: None,
            content_type: None,
            animated: source.is_animated(),
            error: Some(error),
        }
    }
}

/// Parse an HTTP date such as `Fri, 10 May 2024 12:00:00 GMT`.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fetches image metadata.
#[derive(Debug, Clone)]
pub struct ImageryAdapter {
    client: Client,
}

impl ImageryAdapter {
    /// Create an adapter with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, AdapterError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }

    /// Fetch one frame's metadata.
    ///
    /// Animated sources are only probed with `HEAD`; still images are
    /// downloaded so their size is known even without `Content-Length`.
    pub async fn fetch_frame(&self, source: &ImageSource) -> Result<ImageFrame, AdapterError> {
        let animated = source.is_animated();
        let method = if animated { Method::HEAD } else { Method::GET };
        debug!(url = %source.url, %method, "fetching image");

        let response = self.client.request(method, &source.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Http(format!("Image returned status {}", status)));
        }

        let headers = response.headers();
        let last_modified = headers
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let content_length = match response.content_length() {
            Some(len) if len > 0 => Some(len),
            _ if animated => None,
            _ => Some(response.bytes().await?.len() as u64),
        };

        Ok(ImageFrame {
            label: source.label.clone(),
            url: source.url.clone(),
            last_modified,
            fetched_at: Utc::now(),
            content_length,
            content_type,
            animated,
            error: None,
        })
    }
}
