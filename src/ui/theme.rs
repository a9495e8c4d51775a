//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::MetricKind;
use crate::sla::SeverityTier;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Palette for severity tiers, least to most severe.
    pub normal: Color,
    pub caution: Color,
    pub warning: Color,
    pub critical: Color,
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
            normal: Color::Green,
            caution: Color::Yellow,
            warning: Color::Indexed(208),
            critical: Color::Red,
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
            normal: Color::Green,
            caution: Color::Yellow,
            warning: Color::Indexed(202),
            critical: Color::Red,
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

    /// Color for a classified value of the given metric.
    ///
    /// Tiers come from a kind-agnostic comparison, so for higher-is-better
    /// metrics (availability) the palette runs the other way: the top tier
    /// is green and the bottom tier red.
    pub fn tier_color(&self, kind: MetricKind, tier: SeverityTier) -> Color {
        let tier = if kind.higher_is_better() { mirror(tier) } else { tier };
        match tier {
            SeverityTier::Normal => self.normal,
            SeverityTier::Caution => self.caution,
            SeverityTier::Warning => self.warning,
            SeverityTier::Critical => self.critical,
        }
    }

    /// Get style for a classified value
    pub fn tier_style(&self, kind: MetricKind, tier: SeverityTier) -> Style {
        let style = Style::default().fg(self.tier_color(kind, tier));
        if self.tier_color(kind, tier) == self.critical {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

fn mirror(tier: SeverityTier) -> SeverityTier {
    match tier {
        SeverityTier::Normal => SeverityTier::Critical,
        SeverityTier::Caution => SeverityTier::Warning,
        SeverityTier::Warning => SeverityTier::Caution,
        SeverityTier::Critical => SeverityTier::Normal,
    }
}
