//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for readings within safe limits.
    pub safe: Color,
    /// Color for readings outside safe limits.
    pub alert: Color,
    /// Color for values not yet known.
    pub unknown: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Line color for the TDS series.
    pub tds_line: Color,
    /// Line color for the temperature series.
    pub temperature_line: Color,
    /// Color for threshold guide lines on charts.
    pub threshold_line: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            safe: Color::Green,
            alert: Color::Red,
            unknown: Color::Gray,
            border: Color::Gray,
            tds_line: Color::Cyan,
            temperature_line: Color::LightRed,
            threshold_line: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            safe: Color::Green,
            alert: Color::Red,
            unknown: Color::DarkGray,
            border: Color::DarkGray,
            tds_line: Color::Blue,
            temperature_line: Color::Magenta,
            threshold_line: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a classification severity
    pub fn status_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Unknown => Style::default().fg(self.unknown),
            Severity::Ok => Style::default().fg(self.safe),
            Severity::Alert => Style::default().fg(self.alert).add_modifier(Modifier::BOLD),
        }
    }

    /// Get style for the connectivity indicator
    pub fn online_style(&self, online: bool) -> Style {
        if online {
            Style::default().fg(self.safe)
        } else {
            Style::default().fg(self.alert).add_modifier(Modifier::BOLD)
        }
    }
}
