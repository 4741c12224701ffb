//! Status cards for the Dashboard view.
//!
//! One card per metric plus a connection card, laid out side by side.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{Metric, Severity, WINDOW_MS};
use crate::ui::common::format_value;

/// Render the three status cards into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    render_metric_card(frame, app, Metric::Tds, chunks[0]);
    render_metric_card(frame, app, Metric::Temperature, chunks[1]);
    render_connection_card(frame, app, chunks[2]);
}

fn render_metric_card(frame: &mut Frame, app: &App, metric: Metric, area: Rect) {
    let dashboard = &app.dashboard;
    let thresholds = dashboard.thresholds();

    let (value, status_label, severity, limit) = match metric {
        Metric::Tds => {
            let status = dashboard.tds_status();
            (
                dashboard.current_tds(),
                status.label(),
                status.severity(),
                format!("safe ≤ {:.0} mg/L", thresholds.tds_max),
            )
        }
        Metric::Temperature => {
            let status = dashboard.temperature_status();
            (
                dashboard.current_temperature(),
                status.label(),
                status.severity(),
                format!(
                    "safe {:.0}–{:.0} °C",
                    thresholds.temp_min, thresholds.temp_max
                ),
            )
        }
    };
    let status_style = app.theme.status_style(severity);

    let lines = vec![
        Line::from(Span::styled(
            format_value(value, metric),
            status_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::raw("Status: "), Span::styled(status_label, status_style)]),
        Line::from(vec![
            Span::raw("Trend:  "),
            Span::raw(dashboard.trend_label(metric)),
        ]),
        Line::from(Span::styled(limit, Style::default().add_modifier(Modifier::DIM))),
    ];

    let border_color = match severity {
        Severity::Alert => app.theme.alert,
        _ => app.theme.border,
    };

    let block = Block::default()
        .title(format!(" {} ", metric.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_connection_card(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let online = dashboard.online();

    let mut lines = vec![
        Line::from(Span::styled(
            if online { "● Online" } else { "○ Offline" },
            app.theme.online_style(online).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Window: {} point(s) / {}s",
            dashboard.history().len(),
            WINDOW_MS / 1000
        )),
    ];

    if let Some(err) = dashboard.last_error().filter(|_| !online) {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(app.theme.alert),
        )));
    }

    let block = Block::default()
        .title(" Connection ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
