//! Historical readings for sparklines and trend arrows.

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDateTime;
use solwatch_types::MetricKind;

use super::dashboard::Dashboard;

/// Maximum number of observations kept per metric.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks recent observations of each metric.
///
/// Snapshots repeat the same observation until the upstream publishes a new
/// one, so an observation is only recorded when its timestamp changes.
/// Sentinel readings from unparseable payloads are skipped.
#[derive(Debug, Clone, Default)]
pub struct History {
    values: HashMap<MetricKind, VecDeque<(NaiveDateTime, f64)>>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the readings of a dashboard.
    pub fn record(&mut self, dashboard: &Dashboard) {
        for metric in &dashboard.metrics {
            let Some(reading) = metric.reading else {
                continue;
            };
            if metric.notice.is_some() {
                continue;
            }

            let series = self.values.entry(metric.kind).or_default();
            if series.back().is_some_and(|(ts, _)| *ts >= reading.timestamp) {
                continue;
            }
            series.push_back((reading.timestamp, reading.value));
            if series.len() > MAX_HISTORY_SIZE {
                series.pop_front();
            }
        }
    }

    /// Number of distinct observations held for a metric.
    pub fn len(&self, kind: MetricKind) -> usize {
        self.values.get(&kind).map_or(0, VecDeque::len)
    }

    /// Sparkline levels (0-7) scaled between the min and max seen.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, kind: MetricKind) -> Vec<u8> {
        let Some(series) = self.values.get(&kind) else {
            return Vec::new();
        };
        if series.len() < 2 {
            return Vec::new();
        }

        let min = series.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let max = series.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        series
            .iter()
            .map(|(_, v)| {
                if range <= f64::EPSILON {
                    3
                } else {
                    (((v - min) / range) * 7.0).round().clamp(0.0, 7.0) as u8
                }
            })
            .collect()
    }

    /// Change between the last two observations.
    ///
    /// Returns None if there's not enough history.
    pub fn trend(&self, kind: MetricKind) -> Option<f64> {
        let series = self.values.get(&kind)?;
        if series.len() < 2 {
            return None;
        }
        let (_, current) = series.back()?;
        let (_, previous) = series.get(series.len() - 2)?;
        Some(current - previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schemas;
    use crate::source::{Feed, Snapshot};
    use chrono::Utc;
    use serde_json::json;

    fn dashboard_with_kp(time: &str, kp: &str) -> Dashboard {
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.kp = Feed::Payload(json!([["time_tag", "Kp"], [time, kp]]));
        Dashboard::from_snapshot(&snapshot, &Schemas::default())
    }

    #[test]
    fn test_records_only_new_observations() {
        let mut history = History::new();
        history.record(&dashboard_with_kp("2024-05-10 12:00:00", "3.0"));
        history.record(&dashboard_with_kp("2024-05-10 12:00:00", "3.0"));
        assert_eq!(history.len(MetricKind::Kp), 1);

        history.record(&dashboard_with_kp("2024-05-10 15:00:00", "5.33"));
        assert_eq!(history.len(MetricKind::Kp), 2);
        assert_eq!(history.len(MetricKind::Bz), 0);
    }

    #[test]
    fn test_skips_sentinel_readings() {
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.kp = Feed::Payload(json!("garbage"));
        let mut history = History::new();
        history.record(&Dashboard::from_snapshot(&snapshot, &Schemas::default()));
        assert_eq!(history.len(MetricKind::Kp), 0);
    }

    #[test]
    fn test_sparkline_and_trend() {
        let mut history = History::new();
        assert!(history.sparkline(MetricKind::Kp).is_empty());
        assert!(history.trend(MetricKind::Kp).is_none());

        history.record(&dashboard_with_kp("2024-05-10 09:00:00", "1.0"));
        history.record(&dashboard_with_kp("2024-05-10 12:00:00", "8.0"));
        history.record(&dashboard_with_kp("2024-05-10 15:00:00", "4.5"));

        assert_eq!(history.sparkline(MetricKind::Kp), vec![0, 7, 4]);
        assert_eq!(history.trend(MetricKind::Kp), Some(-3.5));
    }

    #[test]
    fn test_flat_sparkline() {
        let mut history = History::new();
        history.record(&dashboard_with_kp("2024-05-10 09:00:00", "2.0"));
        history.record(&dashboard_with_kp("2024-05-10 12:00:00", "2.0"));
        assert_eq!(history.sparkline(MetricKind::Kp), vec![3, 3]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new();
        let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        for i in 0..(MAX_HISTORY_SIZE + 10) {
            let ts = start + chrono::Duration::hours(3 * i as i64);
            let time = ts.format("%Y-%m-%d %H:%M:%S").to_string();
            history.record(&dashboard_with_kp(&time, "2.0"));
        }
        assert_eq!(history.len(MetricKind::Kp), MAX_HISTORY_SIZE);
    }
}
