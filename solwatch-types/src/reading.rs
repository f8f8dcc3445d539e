//! The canonical `(value, timestamp)` pair produced by normalization.

use chrono::{NaiveDateTime, Utc};

/// A single observation of a metric.
///
/// `timestamp` is on a naive UTC clock: any offset present in the upstream
/// payload has already been applied and discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    pub value: f64,
    pub timestamp: NaiveDateTime,
}

impl Reading {
    pub fn new(value: f64, timestamp: NaiveDateTime) -> Self {
        Self { value, timestamp }
    }

    /// The fallback reading used when a payload cannot be normalized.
    ///
    /// Zero value stamped with the current UTC time. It is deliberately
    /// plausible-looking, so callers must surface the accompanying notice.
    pub fn sentinel() -> Self {
        Self::sentinel_at(Utc::now().naive_utc())
    }

    /// Sentinel with an explicit timestamp.
    pub fn sentinel_at(now: NaiveDateTime) -> Self {
        Self {
            value: 0.0,
            timestamp: now,
        }
    }
}
