//! # solwatch
//!
//! A terminal dashboard and library for live space weather.
//!
//! The crate polls the NOAA SWPC planetary Kp index and solar-wind magnetic
//! field feeds, the OpenWeatherMap UV index, and the latest SDO/SOHO images.
//! Each payload is normalized into a single reading, judged against fixed
//! thresholds, and the worst judgment becomes the overall condition shown in
//! an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(judging) │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── Poller → ChannelSource | FileSource        │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`DataSource`] trait, the caching [`Poller`] that
//!   drives the HTTP adapters, and replay of recorded [`Snapshot`]s
//! - **[`data`]**: turns a snapshot into a [`Dashboard`] of judged metrics and
//!   notices, and keeps [`History`] for sparklines
//! - **[`config`]**: layered [`Settings`] and per-metric [`Schemas`]
//! - **[`ui`]**: ratatui rendering of the metrics, imagery and notices views
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard
//! OWM_UV_KEY=... solwatch
//!
//! # Fetch once and print the judged dashboard
//! solwatch --export -
//!
//! # Record a snapshot, then replay it
//! solwatch --record snapshot.json
//! solwatch --file snapshot.json
//! ```
//!
//! ### As a library with a recorded snapshot
//!
//! ```
//! use solwatch::{App, FileSource, Schemas};
//!
//! let source = Box::new(FileSource::new("snapshot.json"));
//! let app = App::new(source, Schemas::default());
//! ```
//!
//! ### Feeding snapshots from your own task
//!
//! ```
//! use chrono::Utc;
//! use serde_json::json;
//! use solwatch::{Dashboard, Feed, Schemas, Snapshot};
//!
//! let mut snapshot = Snapshot::empty(Utc::now());
//! snapshot.kp = Feed::Payload(json!([["time_tag", "Kp"], ["2024-05-10 15:00:00", "8.0"]]));
//!
//! let dashboard = Dashboard::from_snapshot(&snapshot, &Schemas::default());
//! assert_eq!(dashboard.overall.label, "Critical condition");
//! ```
//!
//! ### Polling live feeds
//!
//! ```no_run
//! use solwatch::{App, Poller, Schemas, Settings};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::load(None).unwrap();
//! let poller = Poller::from_settings(&settings).unwrap();
//! let (source, _handle) = poller.spawn("NOAA SWPC");
//! let app = App::new(Box::new(source), Schemas::default());
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Schemas, Settings};
pub use data::{Dashboard, History, MetricStatus, Notice, NoticeKind};
pub use source::{
    ChannelSource, DataSource, Endpoint, Feed, FileSource, Poller, PollerConfig, Snapshot,
    TtlCache,
};
