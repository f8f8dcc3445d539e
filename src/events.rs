use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Where the `e` key writes the dashboard.
pub const EXPORT_FILE: &str = "solwatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow stepping through metrics while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        }
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Metrics),
        KeyCode::Char('2') => app.set_view(View::Imagery),
        KeyCode::Char('3') => app.set_view(View::Notices),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Enter detail overlay
        KeyCode::Enter => app.enter_detail(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Refresh, bypassing the cache
        KeyCode::Char('r') => app.request_refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows start below the header, tabs, block border and table header
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.item_count() {
                    app.selected_index = item_row;
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                // Approximate tab positions: Metrics (0-12), Imagery (13-25), Notices (26-38)
                match mouse.column {
                    0..=12 => app.set_view(View::Metrics),
                    13..=25 => app.set_view(View::Imagery),
                    26..=38 => app.set_view(View::Notices),
                    _ => {}
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schemas;
    use crate::source::{ChannelSource, Feed, Snapshot};
    use crate::ui::Theme;
    use chrono::Utc;
    use crossterm::event::KeyEventKind;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app() -> App {
        let (tx, source) = ChannelSource::create("test");
        let mut snapshot = Snapshot::empty(Utc::now());
        snapshot.kp = Feed::Payload(json!([["time_tag", "Kp"], ["2024-05-10 15:00:00", "3.0"]]));
        tx.send(snapshot).unwrap();
        let mut app = App::with_theme(Box::new(source), Schemas::default(), Theme::dark());
        app.reload_data();
        app
    }

    #[test]
    fn test_quit() {
        let mut app = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_view_keys() {
        let mut app = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Notices);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Metrics);
        handle_key_event(&mut app, key(KeyCode::Char('h')));
        assert_eq!(app.current_view, View::Notices);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.current_view, View::Imagery);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_overlay_keys() {
        let mut app = loaded_app();
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.show_detail_overlay);

        // j/k step through metrics without closing the overlay
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 2);
        assert!(app.show_detail_overlay);

        // q closes the overlay rather than quitting
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_detail_overlay);
        assert!(app.running);
    }

    #[test]
    fn test_refresh_key_on_source_without_refresh() {
        let mut app = loaded_app();
        let event = KeyEvent::new_with_kind(KeyCode::Char('r'), KeyModifiers::NONE, KeyEventKind::Press);
        handle_key_event(&mut app, event);
        assert_eq!(app.get_status_message(), Some("Reloaded"));
    }
}
