//! Raw collection results.
//!
//! A [`Snapshot`] holds what the upstream endpoints returned in one
//! collection round, before any normalization. It is the unit that flows from
//! a data source to the dashboard, and the format written by `--record` and
//! replayed by `--file`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use solwatch_adapters::imagery::ImageFrame;
use solwatch_adapters::AdapterError;
use solwatch_types::MetricKind;

/// Outcome of fetching one metric feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Feed {
    /// Not fetched yet.
    #[default]
    Pending,
    /// The upstream answered with this JSON body.
    Payload(Value),
    /// The request failed; the message is shown as a notice.
    Failed(String),
    /// The feed needs an API key and none is configured.
    CredentialUnavailable,
}

impl Feed {
    /// Payload if the fetch succeeded.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Feed::Payload(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Feed::Pending)
    }
}

impl From<Result<Value, AdapterError>> for Feed {
    fn from(result: Result<Value, AdapterError>) -> Self {
        match result {
            Ok(value) => Feed::Payload(value),
            Err(AdapterError::CredentialUnavailable) => Feed::CredentialUnavailable,
            Err(e) => Feed::Failed(e.to_string()),
        }
    }
}

/// One round of raw feeds plus image metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the most recent feed in this snapshot was fetched.
    pub collected_at: DateTime<Utc>,
    /// When the source expects to fetch again, if it polls at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_refresh: Option<DateTime<Utc>>,
    #[serde(default)]
    pub kp: Feed,
    #[serde(default)]
    pub bz: Feed,
    #[serde(default)]
    pub uv: Feed,
    #[serde(default)]
    pub images: Vec<ImageFrame>,
}

impl Snapshot {
    /// A snapshot with every feed pending.
    pub fn empty(collected_at: DateTime<Utc>) -> Self {
        Self {
            collected_at,
            next_refresh: None,
            kp: Feed::Pending,
            bz: Feed::Pending,
            uv: Feed::Pending,
            images: Vec::new(),
        }
    }

    /// The feed carrying a given metric.
    pub fn feed(&self, kind: MetricKind) -> &Feed {
        match kind {
            MetricKind::Kp => &self.kp,
            MetricKind::Bz => &self.bz,
            MetricKind::Uv => &self.uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut snapshot = Snapshot::empty(Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
        snapshot.kp = Feed::Payload(json!([["time_tag", "Kp"], ["2024-05-10 12:00:00", "4.33"]]));
        snapshot.bz = Feed::Failed("Request timed out".into());
        snapshot.uv = Feed::CredentialUnavailable;

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_feed_wire_format() {
        let json = serde_json::to_value(Feed::Failed("boom".into())).unwrap();
        assert_eq!(json, json!({"status": "failed", "data": "boom"}));

        let json = serde_json::to_value(Feed::CredentialUnavailable).unwrap();
        assert_eq!(json, json!({"status": "credential_unavailable"}));
    }

    #[test]
    fn test_missing_feeds_default_to_pending() {
        let parsed: Snapshot =
            serde_json::from_str(r#"{"collected_at": "2024-05-10T12:00:00Z"}"#).unwrap();
        assert!(parsed.kp.is_pending());
        assert!(parsed.uv.is_pending());
        assert!(parsed.images.is_empty());
    }

    #[test]
    fn test_feed_from_adapter_result() {
        assert_eq!(Feed::from(Ok(json!({"value": 1}))).payload(), Some(&json!({"value": 1})));
        assert_eq!(
            Feed::from(Err(AdapterError::CredentialUnavailable)),
            Feed::CredentialUnavailable
        );
        assert_eq!(
            Feed::from(Err(AdapterError::Timeout)),
            Feed::Failed("Request timed out".into())
        );
    }

    #[test]
    fn test_feed_by_kind() {
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.bz = Feed::CredentialUnavailable;
        assert_eq!(snapshot.feed(MetricKind::Bz), &Feed::CredentialUnavailable);
        assert!(snapshot.feed(MetricKind::Kp).is_pending());
    }
}
