//! Severity tiers shared by per-metric and combined status.

use core::fmt;

/// Ordered severity classification.
///
/// The derived ordering is the aggregation order:
/// `Unknown < Nominal < Elevated < High < Critical`. A missing metric
/// therefore never outranks a concrete reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Tier {
    /// No data for this metric.
    #[default]
    Unknown,
    Nominal,
    Elevated,
    High,
    Critical,
}

impl Tier {
    /// All tiers, lowest severity first.
    pub const ALL: [Tier; 5] = [
        Tier::Unknown,
        Tier::Nominal,
        Tier::Elevated,
        Tier::High,
        Tier::Critical,
    ];

    /// Short uppercase tag for compact display.
    pub fn tag(&self) -> &'static str {
        match self {
            Tier::Unknown => "N/A",
            Tier::Nominal => "OK",
            Tier::Elevated => "ELEV",
            Tier::High => "HIGH",
            Tier::Critical => "CRIT",
        }
    }

    /// CSS colour name, carried in exported judgments so consumers can
    /// style tiers without knowing the enum.
    pub const fn color_name(&self) -> &'static str {
        match self {
            Tier::Unknown => "grey",
            Tier::Nominal => "green",
            Tier::Elevated => "gold",
            Tier::High => "orange",
            Tier::Critical => "red",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Unknown => "unknown",
            Tier::Nominal => "nominal",
            Tier::Elevated => "elevated",
            Tier::High => "high",
            Tier::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Tier::Unknown < Tier::Nominal);
        assert!(Tier::Nominal < Tier::Elevated);
        assert!(Tier::Elevated < Tier::High);
        assert!(Tier::High < Tier::Critical);

        let mut sorted = Tier::ALL;
        sorted.sort();
        assert_eq!(sorted, Tier::ALL);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tier::Elevated.to_string(), "elevated");
        assert_eq!(Tier::default(), Tier::Unknown);
    }

    #[test]
    fn test_color_names_are_distinct() {
        let mut colors: Vec<&str> = Tier::ALL.iter().map(Tier::color_name).collect();
        colors.dedup();
        assert_eq!(colors.len(), Tier::ALL.len());
        assert_eq!(Tier::Critical.color_name(), "red");
    }
}
