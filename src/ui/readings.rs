//! Readings view rendering.
//!
//! Lists every reading currently in the one-minute window, newest first,
//! with a per-reading classification against the configured thresholds.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::history::format_time;
use crate::data::{TdsStatus, TemperatureStatus};

/// Render the Readings view as a scrollable table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.dashboard.history();
    let thresholds = app.dashboard.thresholds();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Time"),
        Cell::from("TDS (mg/L)"),
        Cell::from("TDS Status"),
        Cell::from("Temp (°C)"),
        Cell::from("Temp Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let total = history.len();
    let rows: Vec<Row> = history
        .iter()
        .rev()
        .enumerate()
        .map(|(i, reading)| {
            let tds_status = TdsStatus::classify(Some(reading.tds), thresholds);
            let temp_status = TemperatureStatus::classify(Some(reading.temperature), thresholds);

            Row::new(vec![
                Cell::from((total - i).to_string()),
                Cell::from(format_time(reading.timestamp)),
                Cell::from(format!("{:.1}", reading.tds)),
                Cell::from(tds_status.label())
                    .style(app.theme.status_style(tds_status.severity())),
                Cell::from(format!("{:.1}", reading.temperature)),
                Cell::from(temp_status.label())
                    .style(app.theme.status_style(temp_status.severity())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let position_info = if total > 0 {
        format!(" [{}/{}]", app.selected_reading_index + 1, total)
    } else {
        String::new()
    };
    let title = format!(" Readings in the last 60s{} ", position_info);

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
    if total > 0 {
        state.select(Some(app.selected_reading_index.min(total - 1)));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
