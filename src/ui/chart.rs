//! One-minute trend charts for the Dashboard view.
//!
//! TDS and temperature have very different scales, so each gets its own
//! chart with its safe limits drawn as guide lines.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::status::WAITING_FOR_DATA;
use crate::data::{ChartSeries, Metric};

/// Render both trend charts, or a placeholder when there is too little data.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let series = app.dashboard.history().series();

    if !series.is_plottable() {
        render_placeholder(frame, app, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(area);

    let thresholds = app.dashboard.thresholds();
    render_metric_chart(
        frame,
        app,
        Metric::Tds,
        &series,
        &series.tds,
        &[thresholds.tds_max],
        chunks[0],
    );
    render_metric_chart(
        frame,
        app,
        Metric::Temperature,
        &series,
        &series.temperature,
        &[thresholds.temp_min, thresholds.temp_max],
        chunks[1],
    );
}

fn render_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Last 60 seconds ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let inner_height = area.height.saturating_sub(2);
    let mut text = vec![ratatui::text::Line::from(""); (inner_height / 2) as usize];
    text.push(ratatui::text::Line::from(Span::styled(
        WAITING_FOR_DATA,
        Style::default().add_modifier(Modifier::DIM),
    )));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
    frame.render_widget(paragraph, area);
}

fn render_metric_chart(
    frame: &mut Frame,
    app: &App,
    metric: Metric,
    series: &ChartSeries,
    values: &[f64],
    limits: &[f64],
    area: Rect,
) {
    let points = ChartSeries::points(values);
    let x_max = (values.len() - 1) as f64;
    let guides: Vec<Vec<(f64, f64)>> =
        limits.iter().map(|&limit| vec![(0.0, limit), (x_max, limit)]).collect();

    let line_color = match metric {
        Metric::Tds => app.theme.tds_line,
        Metric::Temperature => app.theme.temperature_line,
    };

    let mut datasets = vec![Dataset::default()
        .name(metric.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(line_color))
        .data(&points)];
    for guide in &guides {
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.threshold_line))
                .data(guide),
        );
    }

    let (y_min, y_max) = y_bounds(values, limits);
    let first = series.labels.first().cloned().unwrap_or_default();
    let last = series.labels.last().cloned().unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", metric.label(), metric.unit()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(app.theme.border))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", y_min)),
                    Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.0}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Y-axis bounds covering every value and guide line, with some padding.
fn y_bounds(values: &[f64], limits: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .chain(limits)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((max - min) * 0.1).max(1.0);
    ((min - pad).floor(), (max + pad).ceil())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_bounds_include_limits() {
        let (lo, hi) = y_bounds(&[300.0, 320.0], &[500.0]);
        assert!(lo < 300.0);
        assert!(hi > 500.0);
    }

    #[test]
    fn test_y_bounds_flat_series() {
        let (lo, hi) = y_bounds(&[20.0, 20.0], &[]);
        assert!(lo < 20.0 && hi > 20.0);
    }

    #[test]
    fn test_y_bounds_empty() {
        assert_eq!(y_bounds(&[], &[]), (0.0, 1.0));
    }
}
