//! The derived view model.
//!
//! [`Dashboard::from_snapshot`] runs every feed through the normalizer and the
//! interpreter, then combines the per-metric tiers into one overall verdict.
//! A feed that cannot be used never blocks the others.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use solwatch_adapters::imagery::ImageFrame;
use solwatch_types::{combine, normalize_or_default, Judgment, MetricKind, Reading};
use tracing::warn;

use crate::config::Schemas;
use crate::source::{Feed, Snapshot};

/// Where a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// The upstream could not be reached or answered with an error.
    Fetch,
    /// The payload arrived but did not have the expected layout.
    Parse,
    /// An image could not be fetched.
    Image,
}

impl NoticeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeKind::Fetch => "fetch",
            NoticeKind::Parse => "parse",
            NoticeKind::Image => "image",
        }
    }
}

/// A problem worth showing the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    /// Metric name or image label.
    pub subject: String,
    pub message: String,
}

/// Derived state of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStatus {
    pub kind: MetricKind,
    /// `None` when the feed was unavailable. A parse failure still yields the
    /// zero sentinel, flagged by `notice`.
    pub reading: Option<Reading>,
    pub judgment: Judgment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    /// The feed needs an API key that is not configured.
    pub credential_missing: bool,
}

impl MetricStatus {
    fn derive(kind: MetricKind, feed: &Feed, schemas: &Schemas) -> Self {
        let mut status = Self {
            kind,
            reading: None,
            judgment: kind.judge(None),
            notice: None,
            credential_missing: false,
        };

        match feed {
            Feed::Pending => {}
            Feed::CredentialUnavailable if kind.requires_credential() => {
                status.credential_missing = true;
            }
            // Only a hand-edited recording can get here.
            Feed::CredentialUnavailable => {
                status.notice = Some(Notice {
                    kind: NoticeKind::Fetch,
                    subject: kind.name().to_string(),
                    message: "feed marked as missing an API key it does not use".to_string(),
                });
            }
            Feed::Failed(message) => {
                status.notice = Some(Notice {
                    kind: NoticeKind::Fetch,
                    subject: kind.name().to_string(),
                    message: message.clone(),
                });
            }
            Feed::Payload(payload) => {
                let normalized = normalize_or_default(payload, schemas.get(kind));
                if let Some(ref err) = normalized.notice {
                    warn!(metric = %kind, error = %err, "could not normalize payload");
                    status.notice = Some(Notice {
                        kind: NoticeKind::Parse,
                        subject: kind.name().to_string(),
                        message: err.to_string(),
                    });
                }
                status.judgment = kind.judge(Some(normalized.reading.value));
                status.reading = Some(normalized.reading);
            }
        }

        status
    }

    /// Value with unit for display, or "–" when absent.
    pub fn display_value(&self) -> String {
        match self.reading {
            Some(reading) if self.kind.unit().is_empty() => format!("{:.2}", reading.value),
            Some(reading) => format!("{:.2} {}", reading.value, self.kind.unit()),
            None => "–".to_string(),
        }
    }

    /// Observation time at minute precision, or "–" when absent.
    pub fn display_timestamp(&self) -> String {
        self.reading
            .map(|r| format!("{} UTC", r.timestamp.format("%Y-%m-%d %H:%M")))
            .unwrap_or_else(|| "–".to_string())
    }
}

/// Everything the UI and the exporter need, derived from one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub collected_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_refresh: Option<DateTime<Utc>>,
    pub overall: Judgment,
    pub metrics: Vec<MetricStatus>,
    pub images: Vec<ImageFrame>,
    pub notices: Vec<Notice>,
    /// When this model was built, for "updated N s ago".
    #[serde(skip)]
    pub last_updated: Instant,
}

impl Dashboard {
    pub fn from_snapshot(snapshot: &Snapshot, schemas: &Schemas) -> Self {
        let metrics: Vec<MetricStatus> = MetricKind::ALL
            .iter()
            .map(|&kind| MetricStatus::derive(kind, snapshot.feed(kind), schemas))
            .collect();

        let overall = combine(metrics.iter().map(|m| m.judgment.tier));

        let mut notices: Vec<Notice> = metrics.iter().filter_map(|m| m.notice.clone()).collect();
        notices.extend(snapshot.images.iter().filter_map(|frame| {
            frame.error.as_ref().map(|err| Notice {
                kind: NoticeKind::Image,
                subject: frame.label.clone(),
                message: err.clone(),
            })
        }));

        Self {
            collected_at: snapshot.collected_at,
            next_refresh: snapshot.next_refresh,
            overall,
            metrics,
            images: snapshot.images.clone(),
            notices,
            last_updated: Instant::now(),
        }
    }

    pub fn metric(&self, kind: MetricKind) -> Option<&MetricStatus> {
        self.metrics.iter().find(|m| m.kind == kind)
    }

    /// Seconds until the source's next scheduled fetch, if it has one.
    pub fn seconds_until_refresh(&self, now: DateTime<Utc>) -> Option<u64> {
        self.next_refresh
            .map(|next| (next - now).num_seconds().max(0) as u64)
    }
}
