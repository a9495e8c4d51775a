//! Hosts view rendering.
//!
//! Table of every host in the dataset with its latest reading. The
//! checkbox column shows which hosts are charted.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::format_value;
use crate::app::App;
use crate::data::MetricKind;

/// Render the Hosts view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Host"),
        Cell::from("IP address"),
        Cell::from("Availability"),
        Cell::from("Latency"),
        Cell::from("Packet loss"),
        Cell::from("Samples"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .hosts
        .iter()
        .map(|h| {
            let checkbox = if app.selection.contains(&h.host_name) { "[x]" } else { "[ ]" };
            let metric = |kind: MetricKind| {
                let value = h.latest.value(kind);
                Cell::from(format_value(kind, value))
                    .style(app.theme.tier_style(kind, app.tier(value, kind)))
            };
            Row::new(vec![
                Cell::from(checkbox),
                Cell::from(h.host_name.clone()),
                Cell::from(h.latest.ip_address.clone()),
                metric(MetricKind::Availability),
                metric(MetricKind::Latency),
                metric(MetricKind::PacketLoss),
                Cell::from(h.samples.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(7),
    ];

    let selected = app.selected_host_index.min(app.hosts.len().saturating_sub(1));
    let position_info = if app.hosts.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", selected + 1, app.hosts.len())
    };
    let title = format!(
        " Hosts ({} selected){} ",
        app.selection.len(),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !app.hosts.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
