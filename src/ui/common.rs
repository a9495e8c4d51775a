//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::MetricKind;
use crate::sla::SeverityTier;

/// Render the header bar with a dataset overview.
///
/// Displays: worst tier among charted records, host and record counts,
/// the active profile.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.hosts.is_empty() {
        let line = Line::from(vec![
            Span::styled(" SLAWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("| {} | waiting for exports...", app.source_description())),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    // Worst breach across the charted records, per metric
    let mut breaches = 0;
    let mut worst_style = Style::default().fg(app.theme.normal);
    for record in &app.records {
        for kind in MetricKind::ALL {
            let tier = app.tier(record.value(kind), kind);
            let color = app.theme.tier_color(kind, tier);
            if color != app.theme.normal {
                breaches += 1;
            }
            if color == app.theme.critical {
                worst_style = app.theme.tier_style(kind, tier);
            } else if color != app.theme.normal && worst_style.fg == Some(app.theme.normal) {
                worst_style = Style::default().fg(color);
            }
        }
    }

    let line = Line::from(vec![
        Span::styled(" ● ", worst_style),
        Span::styled("SLAWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", app.selection.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("/{} hosts │ ", app.hosts.len())),
        Span::raw(format!("{} records │ ", app.dataset.len())),
        if breaches > 0 {
            Span::styled(format!("{}", breaches), Style::default().fg(app.theme.warning))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" off-target │ profile "),
        Span::styled(app.profile.clone(), Style::default().fg(app.theme.highlight)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Charts "), Line::from(" 2:Hosts ")];

    let selected = match app.current_view {
        View::Charts => 0,
        View::Hosts => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows temporary messages first, then source errors, then the time since
/// the last ingestion with the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Charts => "Tab:hosts p:profile e:export ?:help q:quit",
        View::Hosts => "Space:toggle a:all n:none Tab:charts ?:help q:quit",
    };

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | r:retry q:quit", err)
    } else if let Some(updated) = app.last_updated {
        let rejected = if app.ingest_errors.is_empty() {
            String::new()
        } else {
            format!(" | {} file(s) rejected", app.ingest_errors.len())
        };
        format!(
            " {} | Updated {:.1}s ago{} | {}",
            app.current_view.label(),
            updated.elapsed().as_secs_f64(),
            rejected,
            controls
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  Tab/←/→     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate hosts"),
        Line::from("  PgUp/PgDn   Jump 10 hosts"),
        Line::from(""),
        Line::from(vec![Span::styled(" Selection", bold)]),
        Line::from("  Space       Toggle host"),
        Line::from("  a / n       Select all / none"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  p         Next service profile"),
        Line::from("  c         Clear dataset"),
        Line::from("  r         Reload all files"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(" Legend", bold)]),
    ];

    // Colors for a lower-is-better metric; availability runs the other way.
    help_text.push(Line::from(
        SeverityTier::ALL
            .iter()
            .flat_map(|tier| {
                [
                    Span::raw("  "),
                    Span::styled(
                        tier.symbol(),
                        app.theme.tier_style(MetricKind::Latency, *tier),
                    ),
                ]
            })
            .collect::<Vec<_>>(),
    ));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![Span::styled(
        "Press any key to close",
        Style::default().add_modifier(Modifier::DIM),
    )]));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
