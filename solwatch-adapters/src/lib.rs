//! # solwatch-adapters
//!
//! HTTP collectors for the upstream endpoints behind the solwatch dashboard.
//!
//! Each adapter fetches raw JSON (or, for imagery, response metadata) and
//! nothing else. Turning payloads into readings is the job of
//! [`solwatch_types::normalize`].
//!
//! ## Supported Sources
//!
//! - **NOAA SWPC** (`noaa` feature) - planetary K-index and 5-minute
//!   solar-wind magnetometer tables
//! - **OpenWeatherMap** (`uv` feature) - UV index for one location; needs an
//!   API key and is skipped without one
//! - **SDO / SOHO** (`imagery` feature) - latest solar images, metadata only
//!
//! ## Quick Start (NOAA)
//!
//! ```rust,no_run
//! use solwatch_adapters::noaa::NoaaAdapter;
//! use solwatch_types::{normalize_or_default, MetricKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = NoaaAdapter::builder().build()?;
//!
//!     let payload = adapter.fetch_mag().await?;
//!     let bz = normalize_or_default(&payload, &MetricKind::Bz.schema());
//!     println!("Bz {:.1} nT", bz.reading.value);
//!     Ok(())
//! }
//! ```
//!
//! Every request has a single timeout (10 seconds by default) and is never
//! retried.

pub mod error;

#[cfg(any(feature = "noaa", feature = "uv", feature = "imagery"))]
mod client;

#[cfg(any(feature = "noaa", feature = "uv", feature = "imagery"))]
pub use client::DEFAULT_TIMEOUT;

#[cfg(feature = "noaa")]
pub mod noaa;

#[cfg(feature = "uv")]
pub mod uv;

#[cfg(feature = "imagery")]
pub mod imagery;

pub use error::AdapterError;

// Re-export types for convenience
pub use solwatch_types::{MetricKind, Reading, Schema, Tier};
