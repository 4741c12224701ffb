//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;

use crate::data::{Dashboard, Thresholds};
use crate::feed::Subscription;
use crate::ui::Theme;

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Status cards and the one-minute trend chart.
    Dashboard,
    /// Table of every reading in the window.
    Readings,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Readings,
            View::Readings => View::Dashboard,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        // Two views: previous and next coincide.
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Readings => "Readings",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Feed and derived state
    subscription: Subscription,
    pub dashboard: Dashboard,

    // Navigation state (Readings view, newest first)
    pub selected_reading_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App consuming the given subscription.
    pub fn new(subscription: Subscription, thresholds: Thresholds) -> Self {
        Self::with_theme(subscription, thresholds, Theme::auto_detect())
    }

    /// Create a new App with an explicit theme (skips terminal detection).
    pub fn with_theme(subscription: Subscription, thresholds: Thresholds, theme: Theme) -> Self {
        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            subscription,
            dashboard: Dashboard::new(thresholds),
            selected_reading_index: 0,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current feed.
    pub fn source_description(&self) -> &str {
        self.subscription.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Deliver every pending feed event to the dashboard.
    ///
    /// Events are applied one at a time on the calling thread, so each
    /// append-and-evict completes before the next event is looked at.
    /// Returns the number of events processed.
    pub fn reload_data(&mut self) -> usize {
        let dashboard = &mut self.dashboard;
        let processed = self.subscription.dispatch(|event| {
            dashboard.ingest(event, Utc::now());
        });

        let count = self.dashboard.history().len();
        if self.selected_reading_index >= count {
            self.selected_reading_index = count.saturating_sub(1);
        }
        processed
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by n readings.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.dashboard.history().len().saturating_sub(1);
        self.selected_reading_index = (self.selected_reading_index + n).min(max);
    }

    /// Move selection up by n readings.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_reading_index = self.selected_reading_index.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_first(&mut self) {
        self.selected_reading_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_reading_index = self.dashboard.history().len().saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit and release the feed.
    pub fn quit(&mut self) {
        self.running = false;
        self.subscription.unsubscribe();
    }

    /// Export the current dashboard view to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        export_view(&self.dashboard, path)
    }
}

/// Write a dashboard's derived view to `path` as pretty-printed JSON.
pub fn export_view(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&dashboard.view())?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{ChannelFeed, FeedEvent, FeedSender};
    use serde_json::json;

    fn test_app() -> (FeedSender, App) {
        let (tx, feed) = ChannelFeed::create("test");
        let app = App::with_theme(
            Subscription::new(Box::new(feed)),
            Thresholds::default(),
            Theme::dark(),
        );
        (tx, app)
    }

    fn send_reading(tx: &FeedSender, tds: f64, temperature: f64) {
        tx.send(FeedEvent::from_value(json!({"tds": tds, "temperature": temperature})))
            .unwrap();
    }

    #[test]
    fn test_reload_ingests_pending_events() {
        let (tx, mut app) = test_app();
        assert_eq!(app.reload_data(), 0);
        assert!(!app.dashboard.online());

        send_reading(&tx, 300.0, 22.0);
        send_reading(&tx, 310.0, 22.5);
        assert_eq!(app.reload_data(), 2);

        assert!(app.dashboard.online());
        assert_eq!(app.dashboard.history().len(), 2);
        assert_eq!(app.dashboard.current_tds(), Some(310.0));
    }

    #[test]
    fn test_view_cycling() {
        let (_tx, mut app) = test_app();
        assert_eq!(app.current_view, View::Dashboard);
        app.next_view();
        assert_eq!(app.current_view, View::Readings);
        app.prev_view();
        assert_eq!(app.current_view, View::Dashboard);
        assert_eq!(View::Readings.label(), "Readings");
    }

    #[test]
    fn test_selection_is_clamped() {
        let (tx, mut app) = test_app();
        for i in 0..3 {
            send_reading(&tx, 100.0 + i as f64, 20.0);
        }
        app.reload_data();

        app.select_next_n(10);
        assert_eq!(app.selected_reading_index, 2);
        app.select_prev_n(10);
        assert_eq!(app.selected_reading_index, 0);
        app.select_last();
        assert_eq!(app.selected_reading_index, 2);
    }

    #[test]
    fn test_quit_releases_subscription() {
        let (tx, mut app) = test_app();
        app.quit();
        assert!(!app.running);

        // The feed is closed; nothing can be delivered any more.
        assert!(tx.send(FeedEvent::Record(None)).is_err());
        assert_eq!(app.reload_data(), 0);
    }

    #[test]
    fn test_status_message() {
        let (_tx, mut app) = test_app();
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));
    }

    #[test]
    fn test_export_state() {
        let (tx, mut app) = test_app();
        send_reading(&tx, 650.0, 35.0);
        app.reload_data();

        let file = tempfile::NamedTempFile::new().unwrap();
        app.export_state(file.path()).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(exported["tds_status"], json!("high"));
        assert_eq!(exported["temperature_status"], json!("out-of-range"));
        assert_eq!(exported["online"], json!(true));
    }
}
