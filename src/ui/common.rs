//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::Metric;

/// Tabs in display order with their titles.
const TABS: [(View, &str); 2] = [
    (View::Dashboard, " 1:Dashboard "),
    (View::Readings, " 2:Readings "),
];
const TAB_PAD: &str = " ";
const TAB_DIVIDER: &str = "|";

/// Format an optional metric value for display, "unknown" when absent.
pub fn format_value(value: Option<f64>, metric: Metric) -> String {
    match value {
        Some(v) => format!("{:.1} {}", v, metric.unit()),
        None => "unknown".to_string(),
    }
}

/// Render the header bar with connectivity and the current readings.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let online = dashboard.online();
    let tds_status = dashboard.tds_status();
    let temperature_status = dashboard.temperature_status();

    // Overall indicator: worst of connectivity and both classifications
    let overall = if !online {
        app.theme.online_style(false)
    } else {
        app.theme.status_style(tds_status.severity().max(temperature_status.severity()))
    };

    let line = Line::from(vec![
        Span::styled(" ● ", overall),
        Span::styled("TANKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            if online { "online" } else { "offline" },
            app.theme.online_style(online),
        ),
        Span::raw(" │ TDS "),
        Span::styled(
            format_value(dashboard.current_tds(), Metric::Tds),
            app.theme.status_style(tds_status.severity()),
        ),
        Span::raw(" │ Temp "),
        Span::styled(
            format_value(dashboard.current_temperature(), Metric::Temperature),
            app.theme.status_style(temperature_status.severity()),
        ),
        Span::raw(" │ "),
        Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = TABS.iter().map(|(_, title)| Line::from(*title)).collect();

    let selected = TABS
        .iter()
        .position(|(view, _)| *view == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .padding(TAB_PAD, TAB_PAD)
        .divider(TAB_DIVIDER);

    frame.render_widget(tabs, area);
}

/// The view whose tab covers `column` of the tab bar, if any.
///
/// Each tab spans its title plus the padding on both sides; the dividers
/// between tabs belong to no view.
pub fn tab_at(column: u16) -> Option<View> {
    let pad = TAB_PAD.chars().count() as u16;
    let divider = TAB_DIVIDER.chars().count() as u16;

    let mut start = 0u16;
    for (view, title) in TABS {
        let end = start + pad + title.chars().count() as u16 + pad;
        if column < start {
            return None;
        }
        if column < end {
            return Some(view);
        }
        start = end + divider;
    }
    None
}

/// Render the status bar at the bottom.
///
/// Shows time since the last reading and available controls, or the last
/// feed error while offline. Temporary messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let dashboard = &app.dashboard;
    let controls = match app.current_view {
        View::Dashboard => "Tab:switch r:poll e:export ?:help q:quit",
        View::Readings => "↑↓:scroll Tab:switch e:export ?:help q:quit",
    };

    let status = match (dashboard.last_error(), dashboard.last_updated()) {
        (Some(err), _) if !dashboard.online() => {
            format!(" Offline: {} | {}", err, controls)
        }
        (_, Some(updated)) => {
            let elapsed = (Utc::now() - updated).num_milliseconds().max(0) as f64 / 1000.0;
            format!(
                " {} | {} points in window | Updated {:.1}s ago | {}",
                app.current_view.label(),
                dashboard.history().len(),
                elapsed,
                controls,
            )
        }
        _ => format!(" Waiting for data... | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let thresholds = app.dashboard.thresholds();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2         Jump to view"),
        Line::from("  ↑/↓ j/k     Scroll readings"),
        Line::from("  Home/End    Newest/oldest reading"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r         Poll feed now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(" Safe limits", bold)]),
        Line::from(format!("  TDS       ≤ {:.0} mg/L", thresholds.tds_max)),
        Line::from(format!(
            "  Temp      {:.0}–{:.0} °C",
            thresholds.temp_min, thresholds.temp_max
        )),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
