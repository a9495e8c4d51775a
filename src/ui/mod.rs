//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//!
//! - [`charts`]: One bar chart per metric for the selected hosts
//! - [`hosts`]: Host table with selection checkboxes and latest readings
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support and the severity palette
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │ View Content                         │
//! │ (charts/hosts::render)               │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```

pub mod charts;
pub mod common;
pub mod hosts;
pub mod theme;

pub use theme::Theme;

use crate::data::MetricKind;

/// Format a metric value with its unit.
pub fn format_value(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::Availability => format!("{:.2}%", value),
        MetricKind::Latency => format!("{:.1}ms", value),
        MetricKind::PacketLoss => format!("{:.2}%", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(MetricKind::Availability, 99.5), "99.50%");
        assert_eq!(format_value(MetricKind::Latency, 12.0), "12.0ms");
        assert_eq!(format_value(MetricKind::PacketLoss, 0.126), "0.13%");
    }
}
