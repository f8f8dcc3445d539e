//! Runtime settings.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! settings file (TOML, YAML or JSON by extension), then `SOLWATCH_*`
//! environment variables. Nested keys use a double underscore, e.g.
//! `SOLWATCH_SCHEMAS__KP__VALUE_FIELD=estimated_kp`. The UV API key may also come
//! from `OWM_UV_KEY`.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use solwatch_adapters::imagery::{default_sources, ImageSource};
use solwatch_adapters::noaa::{DEFAULT_KP_URL, DEFAULT_MAG_URL};
use solwatch_adapters::uv::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_UV_URL};
use solwatch_types::{MetricKind, Schema};

use crate::data::duration::parse_duration;

const ENV_PREFIX: &str = "SOLWATCH";
const UV_KEY_ENV: &str = "OWM_UV_KEY";

/// Payload layout per metric.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Schemas {
    pub kp: Schema,
    pub bz: Schema,
    pub uv: Schema,
}

impl Default for Schemas {
    fn default() -> Self {
        Self {
            kp: MetricKind::Kp.schema(),
            bz: MetricKind::Bz.schema(),
            uv: MetricKind::Uv.schema(),
        }
    }
}

impl Schemas {
    pub fn get(&self, kind: MetricKind) -> &Schema {
        match kind {
            MetricKind::Kp => &self.kp,
            MetricKind::Bz => &self.bz,
            MetricKind::Uv => &self.uv,
        }
    }
}

/// All tunables of the dashboard.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub kp_url: String,
    pub mag_url: String,
    pub uv_url: String,
    pub uv_api_key: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Cache TTL for the NOAA feeds and imagery.
    pub refresh: String,
    /// Cache TTL for the UV feed.
    pub uv_ttl: String,
    /// Per-request timeout.
    pub timeout: String,
    pub images: Vec<ImageSource>,
    pub schemas: Schemas,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kp_url: DEFAULT_KP_URL.to_string(),
            mag_url: DEFAULT_MAG_URL.to_string(),
            uv_url: DEFAULT_UV_URL.to_string(),
            uv_api_key: None,
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            refresh: "5m".to_string(),
            uv_ttl: "1h".to_string(),
            timeout: "10s".to_string(),
            images: default_sources(),
            schemas: Schemas::default(),
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("kp_url", &self.kp_url)
            .field("mag_url", &self.mag_url)
            .field("uv_url", &self.uv_url)
            .field("uv_api_key", &self.uv_api_key.as_ref().map(|_| "<redacted>"))
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("refresh", &self.refresh)
            .field("uv_ttl", &self.uv_ttl)
            .field("timeout", &self.timeout)
            .field("images", &self.images)
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        let mut settings: Settings =
            config.try_deserialize().context("Invalid configuration")?;
        if settings.uv_api_key.is_none() {
            settings.uv_api_key = std::env::var(UV_KEY_ENV).ok();
        }
        settings.uv_api_key = settings.uv_api_key.filter(|key| !key.trim().is_empty());
        Ok(settings)
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        positive_duration("refresh", &self.refresh)
    }

    pub fn uv_ttl(&self) -> Result<Duration> {
        positive_duration("uv_ttl", &self.uv_ttl)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        positive_duration("timeout", &self.timeout)
    }
}

fn positive_duration(name: &str, value: &str) -> Result<Duration> {
    let duration =
        parse_duration(value).with_context(|| format!("Invalid {} duration: {}", name, value))?;
    if duration.is_zero() {
        bail!("{} must be greater than zero", name);
    }
    Ok(duration)
}
