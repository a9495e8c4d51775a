//! Charts view rendering.
//!
//! One horizontal bar chart per metric, a bar per charted record, each bar
//! colored by its severity tier under the active profile.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use super::format_value;
use crate::app::App;
use crate::data::MetricKind;

/// Bars carry integer values; metrics are scaled to keep two decimals.
const VALUE_SCALE: f64 = 100.0;

/// Render the Charts view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.records.is_empty() {
        let msg = if app.hosts.is_empty() {
            "No data loaded"
        } else {
            "No hosts selected (Tab to pick hosts)"
        };
        let paragraph = Paragraph::new(msg).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
        frame.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (kind, chunk) in MetricKind::ALL.into_iter().zip(chunks.iter()) {
        render_metric(frame, app, kind, *chunk);
    }
}

fn render_metric(frame: &mut Frame, app: &App, kind: MetricKind, area: Rect) {
    let bars: Vec<Bar> = app
        .records
        .iter()
        .map(|record| {
            let value = record.value(kind);
            let tier = app.tier(value, kind);
            Bar::default()
                .label(Line::from(record.host_name.clone()))
                .value(scaled(value))
                .text_value(format_value(kind, value))
                .style(Style::default().fg(app.theme.tier_color(kind, tier)))
                .value_style(app.theme.selected)
        })
        .collect();

    let max = app
        .records
        .iter()
        .map(|r| scaled(r.value(kind)))
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {} ", kind.label()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Scale a metric for a bar; negative and non-finite values draw empty.
fn scaled(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * VALUE_SCALE).round() as u64
    } else {
        0
    }
}
