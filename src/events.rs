use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, View};

/// Default export file name when none is given on the command line.
pub const DEFAULT_EXPORT_PATH: &str = "slawatch_report.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, export_path: &Path) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Charts),
        KeyCode::Char('2') => app.set_view(View::Hosts),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Host selection
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_host(),
        KeyCode::Char('a') => app.select_all_hosts(),
        KeyCode::Char('n') => app.select_no_hosts(),

        KeyCode::Char('p') => app.cycle_profile(),
        KeyCode::Char('c') => app.clear_dataset(),

        KeyCode::Char('r') => {
            if let Err(e) = app.force_reload() {
                app.set_status_message(format!("Reload failed: {}", e));
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => match app.export_state(export_path) {
            Ok(()) => {
                app.set_status_message(format!("Exported to {}", export_path.display()));
            }
            Err(e) => {
                app.set_status_message(format!("Export failed: {}", e));
            }
        },

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        _ => {}
    }
}
