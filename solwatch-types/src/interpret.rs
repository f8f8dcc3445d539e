//! Threshold interpretation for individual metrics.
//!
//! Each function is total: every finite input maps to exactly one tier.
//! Non-finite inputs are treated as missing data.

use crate::Tier;

/// Display glyph for each tier.
pub const SYMBOL_UNKNOWN: &str = "❔";
pub const SYMBOL_NOMINAL: &str = "🟢";
pub const SYMBOL_ELEVATED: &str = "🟡";
pub const SYMBOL_HIGH: &str = "🟠";
pub const SYMBOL_CRITICAL: &str = "🔴";

/// Human-readable verdict for a metric or for the whole system.
///
/// `label`, `symbol` and `color` are presentation only; decisions use `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Judgment {
    pub label: &'static str,
    pub symbol: &'static str,
    pub tier: Tier,
    /// Follows `tier`, see [`Tier::color_name`].
    pub color: &'static str,
}

impl Judgment {
    pub const fn new(label: &'static str, symbol: &'static str, tier: Tier) -> Self {
        Self {
            label,
            symbol,
            tier,
            color: tier.color_name(),
        }
    }

    /// Verdict for a metric with no usable value.
    pub const fn unavailable() -> Self {
        Self::new("Data not available", SYMBOL_UNKNOWN, Tier::Unknown)
    }
}

/// Planetary K-index.
///
/// There is no `High` tier for Kp: anything from the storm threshold up is
/// critical.
pub fn interpret_kp(kp: f64) -> Judgment {
    if !kp.is_finite() {
        return Judgment::unavailable();
    }
    if kp < 4.0 {
        Judgment::new("Quiet, no disturbance", SYMBOL_NOMINAL, Tier::Nominal)
    } else if kp < 6.0 {
        Judgment::new("Elevated activity (Kp 4-5)", SYMBOL_ELEVATED, Tier::Elevated)
    } else {
        Judgment::new("Strong storm (G3+)", SYMBOL_CRITICAL, Tier::Critical)
    }
}

/// North-south IMF component in nT. Southward (negative) opens the field.
pub fn interpret_bz(bz: f64) -> Judgment {
    if !bz.is_finite() {
        return Judgment::unavailable();
    }
    if bz > 0.0 {
        Judgment::new("Magnetic field closed", SYMBOL_NOMINAL, Tier::Nominal)
    } else if bz >= -5.0 {
        Judgment::new("Magnetic field open", SYMBOL_ELEVATED, Tier::Elevated)
    } else {
        Judgment::new("Magnetic field strongly open", SYMBOL_HIGH, Tier::High)
    }
}

/// Surface UV index. Band boundaries (2, 5, 7) belong to the lower band.
pub fn interpret_uv(uv: Option<f64>) -> Judgment {
    let Some(uv) = uv.filter(|v| v.is_finite()) else {
        return Judgment::new("UV data not available", SYMBOL_UNKNOWN, Tier::Unknown);
    };
    if uv <= 2.0 {
        Judgment::new("UV low", SYMBOL_NOMINAL, Tier::Nominal)
    } else if uv <= 5.0 {
        Judgment::new("UV moderate", SYMBOL_ELEVATED, Tier::Elevated)
    } else if uv <= 7.0 {
        Judgment::new("UV high", SYMBOL_HIGH, Tier::High)
    } else {
        Judgment::new("UV very high", SYMBOL_CRITICAL, Tier::Critical)
    }
}
