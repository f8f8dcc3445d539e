//! # solwatch-types
//!
//! Core normalization and status derivation for space-weather readings.
//! Everything in this crate is a pure function over small inputs: no I/O,
//! no clocks (except the documented sentinel), no shared state.
//!
//! ## Pipeline
//!
//! ```text
//! raw JSON ──normalize()──▶ Reading ──MetricKind::judge()──▶ Judgment ─┐
//! raw JSON ──normalize()──▶ Reading ──MetricKind::judge()──▶ Judgment ─┼─▶ combine() ──▶ Judgment
//! (no key) ─────────────────────────────── None ───────────▶ Judgment ─┘
//! ```
//!
//! - [`normalize`]: turns table-shaped or record-shaped payloads into a [`Reading`]
//! - [`interpret`]: fixed thresholds per metric, producing a [`Judgment`]
//! - [`combine`]: the worst [`Tier`] wins
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the data types
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use solwatch_types::{combine, normalize, MetricKind, Tier};
//!
//! let payload = json!([
//!     ["time_tag", "Kp", "a_running", "station_count"],
//!     ["2024-05-10 12:00:00.000", "3.33", "18", "8"],
//!     ["2024-05-10 15:00:00.000", "7.67", "179", "8"],
//! ]);
//!
//! let reading = normalize(&payload, &MetricKind::Kp.schema()).unwrap();
//! assert_eq!(reading.value, 7.67);
//!
//! let kp = MetricKind::Kp.judge(Some(reading.value));
//! let uv = MetricKind::Uv.judge(None);
//! let overall = combine([kp.tier, uv.tier]);
//! assert_eq!(overall.tier, Tier::Critical);
//! ```

mod combine;
mod error;
mod interpret;
mod metric;
mod normalize;
mod reading;
mod tier;

pub use combine::*;
pub use error::*;
pub use interpret::*;
pub use metric::*;
pub use normalize::*;
pub use reading::*;
pub use tier::*;
