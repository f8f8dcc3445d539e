//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection. Each
//! status tier maps to one color, orange being the 256-color index.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use solwatch_types::Tier;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for the elevated tier.
    pub warning: Color,
    /// Color for the high tier.
    pub high: Color,
    /// Color for the critical tier.
    pub critical: Color,
    /// Color for the nominal tier.
    pub healthy: Color,
    /// Color for readings with no data.
    pub unknown: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            high: Color::Indexed(208),
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Rgb(184, 134, 11),
            high: Color::Indexed(202),
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a status tier
    pub fn status_style(&self, tier: Tier) -> Style {
        match tier {
            Tier::Unknown => Style::default().fg(self.unknown).add_modifier(Modifier::DIM),
            Tier::Nominal => Style::default().fg(self.healthy),
            Tier::Elevated => Style::default().fg(self.warning),
            Tier::High => Style::default().fg(self.high).add_modifier(Modifier::BOLD),
            Tier::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }
}
