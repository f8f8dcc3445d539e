//! Worst-case aggregation of per-metric tiers.

use crate::{
    Judgment, Tier, SYMBOL_CRITICAL, SYMBOL_ELEVATED, SYMBOL_HIGH, SYMBOL_NOMINAL, SYMBOL_UNKNOWN,
};

/// Reduce tiers to the single worst one.
///
/// `Unknown` ranks below every concrete tier, so it only wins when nothing
/// else is present. An empty input is `Unknown`.
pub fn combine<I>(tiers: I) -> Judgment
where
    I: IntoIterator<Item = Tier>,
{
    let worst = tiers.into_iter().max().unwrap_or(Tier::Unknown);
    overall(worst)
}

/// The system-wide verdict for a tier, independent of which metric caused it.
pub fn overall(tier: Tier) -> Judgment {
    match tier {
        Tier::Unknown => Judgment::new("Partially incomplete", SYMBOL_UNKNOWN, tier),
        Tier::Nominal => Judgment::new("All clear", SYMBOL_NOMINAL, tier),
        Tier::Elevated => Judgment::new("Increased caution", SYMBOL_ELEVATED, tier),
        Tier::High => Judgment::new("High caution", SYMBOL_HIGH, tier),
        Tier::Critical => Judgment::new("Critical condition", SYMBOL_CRITICAL, tier),
    }
}
