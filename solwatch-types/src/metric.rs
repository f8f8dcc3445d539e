//! The monitored metrics and their default payload schemas.

use core::fmt;

use crate::{interpret_bz, interpret_kp, interpret_uv, Judgment, Schema, Tier};

/// One of the three monitored space-weather metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MetricKind {
    /// Planetary K-index (3-hour).
    Kp,
    /// IMF Bz component from the 5-minute solar-wind magnetometer.
    Bz,
    /// Surface UV index.
    Uv,
}

impl MetricKind {
    /// Display order.
    pub const ALL: [MetricKind; 3] = [MetricKind::Kp, MetricKind::Bz, MetricKind::Uv];

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Kp => "Kp",
            MetricKind::Bz => "Bz",
            MetricKind::Uv => "UV",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKind::Kp => "Planetary K-index (3 h)",
            MetricKind::Bz => "IMF Bz, solar wind (5 min)",
            MetricKind::Uv => "UV index",
        }
    }

    /// Unit suffix for display, empty for dimensionless indices.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Bz => "nT",
            MetricKind::Kp | MetricKind::Uv => "",
        }
    }

    /// Whether the upstream needs an API key.
    pub fn requires_credential(&self) -> bool {
        matches!(self, MetricKind::Uv)
    }

    /// Field layout of the default upstream for this metric.
    pub fn schema(&self) -> Schema {
        match self {
            // 1-minute records carry both `kp_index` and a string `kp` like "8P".
            MetricKind::Kp => Schema::new("time_tag", "kp_index").value_fallback("kp"),
            MetricKind::Bz => Schema::new("time_tag", "bz_gse").value_fallback("bz_gsm"),
            MetricKind::Uv => Schema::new("date_iso", "value"),
        }
    }

    /// Interpret a value of this metric. `None` means no data.
    pub fn judge(&self, value: Option<f64>) -> Judgment {
        match (self, value) {
            (MetricKind::Uv, v) => interpret_uv(v),
            (_, None) => Judgment::unavailable(),
            (MetricKind::Kp, Some(v)) => interpret_kp(v),
            (MetricKind::Bz, Some(v)) => interpret_bz(v),
        }
    }

    /// Threshold bands, lowest severity first, for legends.
    pub fn bands(&self) -> &'static [(&'static str, Tier)] {
        match self {
            MetricKind::Kp => &[
                ("< 4", Tier::Nominal),
                ("4 to < 6", Tier::Elevated),
                (">= 6", Tier::Critical),
            ],
            MetricKind::Bz => &[
                ("> 0", Tier::Nominal),
                ("0 to -5", Tier::Elevated),
                ("< -5", Tier::High),
            ],
            MetricKind::Uv => &[
                ("<= 2", Tier::Nominal),
                ("<= 5", Tier::Elevated),
                ("<= 7", Tier::High),
                ("> 7", Tier::Critical),
            ],
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
