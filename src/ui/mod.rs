//! Terminal rendering with ratatui.
//!
//! - [`common`]: header, tabs, status bar and help overlay
//! - [`metrics`], [`imagery`], [`notices`]: one module per tab
//! - [`detail`]: the per-metric overlay
//! - [`theme`]: colors, with light/dark detection

pub mod common;
pub mod detail;
pub mod imagery;
pub mod metrics;
pub mod notices;
pub mod theme;

pub use theme::Theme;
