use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, View};
use crate::ui::common::tab_at;

/// Screen row of the tab bar, below the header.
const TAB_ROW: u16 = 1;

/// Default file name for in-app exports.
const EXPORT_FILE: &str = "tankwatch_export.json";

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

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
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
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::Readings),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Scrolling (Readings view)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Poll the feed immediately
        KeyCode::Char('r') => {
            let processed = app.reload_data();
            app.set_status_message(format!("Processed {} event(s)", processed));
        }

        KeyCode::Char('?') => app.toggle_help(),

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
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::Down(_) if mouse.row == TAB_ROW => {
            if let Some(view) = tab_at(mouse.column) {
                app.set_view(view);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Thresholds;
    use crate::feed::{ChannelFeed, FeedSender, Subscription};
    use crate::ui::Theme;
    use crossterm::event::{KeyEventKind, KeyEventState, MouseButton};

    fn test_app() -> (FeedSender, App) {
        let (tx, feed) = ChannelFeed::create("test");
        let app = App::with_theme(
            Subscription::new(Box::new(feed)),
            Thresholds::default(),
            Theme::dark(),
        );
        (tx, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_quit_key() {
        let (_tx, mut app) = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_view_keys() {
        let (_tx, mut app) = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.current_view, View::Readings);
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (_tx, mut app) = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_reload_key_sets_status() {
        let (_tx, mut app) = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('r')));
        assert_eq!(app.get_status_message(), Some("Processed 0 event(s)"));
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_tab_click() {
        let (_tx, mut app) = test_app();
        handle_mouse_event(&mut app, click(16, 1));
        assert_eq!(app.current_view, View::Readings);

        // Trailing padding of the first tab still belongs to it
        handle_mouse_event(&mut app, click(14, 1));
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[test]
    fn test_click_on_divider_or_other_row_is_ignored() {
        let (_tx, mut app) = test_app();
        handle_mouse_event(&mut app, click(15, 1));
        assert_eq!(app.current_view, View::Dashboard);

        handle_mouse_event(&mut app, click(20, 5));
        assert_eq!(app.current_view, View::Dashboard);
    }
}
