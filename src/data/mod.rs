//! Data models derived from raw snapshots.
//!
//! ## Submodules
//!
//! - [`dashboard`]: The view model ([`Dashboard`], [`MetricStatus`], [`Notice`])
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5m", "1h")
//! - [`export`]: Writing a dashboard or snapshot as JSON
//! - [`history`]: Recent observations for sparklines and trends
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (raw feeds)
//!        │
//!        ▼
//! Dashboard::from_snapshot()
//!        │
//!        ├──▶ MetricStatus (normalize → interpret, per metric)
//!        ├──▶ overall Judgment (combine)
//!        │
//!        └──▶ History::record() (for sparklines)
//! ```

pub mod dashboard;
pub mod duration;
pub mod export;
pub mod history;

pub use dashboard::{Dashboard, MetricStatus, Notice, NoticeKind};
pub use history::History;
