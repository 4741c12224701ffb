//! Sliding-window history of readings for trend charts.

use std::collections::VecDeque;

use chrono::{DateTime, Local, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use super::reading::Reading;

/// How long a reading is retained, in milliseconds.
pub const WINDOW_MS: i64 = 60_000;

/// Trailing window of readings in arrival order.
///
/// Every append evicts readings older than [`WINDOW_MS`] relative to the
/// evaluation time passed by the caller. The reference clock is always that
/// evaluation time, never the reading's own timestamp, so a reading stamped
/// far in the future lingers until the clock passes it, and one stamped far
/// in the past is dropped by the very append that inserted it.
#[derive(Debug, Clone)]
pub struct History {
    readings: VecDeque<Reading>,
    window: TimeDelta,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history with the standard one-minute window.
    pub fn new() -> Self {
        Self {
            readings: VecDeque::new(),
            window: TimeDelta::milliseconds(WINDOW_MS),
        }
    }

    /// Append a reading, then evict everything outside the window.
    ///
    /// Elements exactly `WINDOW_MS` old are kept. Timestamps are not assumed
    /// to be sorted, so the whole buffer is scanned. Returns the number of
    /// readings evicted.
    pub fn append(&mut self, reading: Reading, now: DateTime<Utc>) -> usize {
        self.readings.push_back(reading);

        let before = self.readings.len();
        let window = self.window;
        self.readings.retain(|r| now - r.timestamp <= window);

        let evicted = before - self.readings.len();
        if evicted > 0 {
            debug!("Evicted {} reading(s) older than {}ms", evicted, WINDOW_MS);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Iterate readings oldest arrival first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter()
    }

    /// Chart-ready series drawn from the buffer in arrival order.
    pub fn series(&self) -> ChartSeries {
        let mut series = ChartSeries::with_capacity(self.readings.len());
        for reading in &self.readings {
            series.labels.push(format_time(reading.timestamp));
            series.tds.push(reading.tds);
            series.temperature.push(reading.temperature);
        }
        series
    }
}

/// Parallel sequences for plotting: one entry per buffered reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Display-formatted timestamps (local `HH:MM:SS`).
    pub labels: Vec<String>,
    pub tds: Vec<f64>,
    pub temperature: Vec<f64>,
}

impl ChartSeries {
    fn with_capacity(n: usize) -> Self {
        Self {
            labels: Vec::with_capacity(n),
            tds: Vec::with_capacity(n),
            temperature: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// A line needs two points; below that show a placeholder instead.
    pub fn is_plottable(&self) -> bool {
        self.len() >= 2
    }

    /// `(index, value)` pairs for a chart dataset.
    pub fn points(values: &[f64]) -> Vec<(f64, f64)> {
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)).collect()
    }
}

/// Format a timestamp for chart labels and tables.
pub fn format_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn at(offset_ms: i64, tds: f64) -> Reading {
        Reading::new(t0() + TimeDelta::milliseconds(offset_ms), tds, 20.0)
    }

    fn tds_values(history: &History) -> Vec<f64> {
        history.iter().map(|r| r.tds).collect()
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.iter().count(), 0);
        assert!(!history.series().is_plottable());
    }

    #[test]
    fn test_evicts_readings_older_than_window() {
        let mut history = History::new();
        history.append(at(0, 1.0), t0());
        history.append(at(30_000, 2.0), t0() + TimeDelta::seconds(30));
        let evicted = history.append(at(61_000, 3.0), t0() + TimeDelta::seconds(61));

        assert_eq!(evicted, 1);
        assert_eq!(tds_values(&history), vec![2.0, 3.0]);
    }

    #[test]
    fn test_window_boundary_is_retained() {
        let mut history = History::new();
        history.append(at(0, 1.0), t0());
        history.append(at(60_000, 2.0), t0() + TimeDelta::milliseconds(60_000));
        assert_eq!(tds_values(&history), vec![1.0, 2.0]);

        history.append(at(60_001, 3.0), t0() + TimeDelta::milliseconds(60_001));
        assert_eq!(tds_values(&history), vec![2.0, 3.0]);
    }

    #[test]
    fn test_all_retained_within_window_after_each_append() {
        let mut history = History::new();
        for i in 0..200 {
            let now = t0() + TimeDelta::milliseconds(i * 1_700);
            history.append(at(i * 1_700, i as f64), now);
            assert!(history.iter().all(|r| (now - r.timestamp).num_milliseconds() <= WINDOW_MS));
        }
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let mut history = History::new();
        // Out-of-order timestamps are kept in the order they arrived.
        history.append(at(5_000, 1.0), t0() + TimeDelta::seconds(10));
        history.append(at(1_000, 2.0), t0() + TimeDelta::seconds(10));
        history.append(at(9_000, 3.0), t0() + TimeDelta::seconds(10));
        assert_eq!(tds_values(&history), vec![1.0, 2.0, 3.0]);

        // Evicting from the middle keeps the remaining order.
        history.append(at(20_000, 4.0), t0() + TimeDelta::seconds(61) + TimeDelta::milliseconds(500));
        assert_eq!(tds_values(&history), vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_stale_reading_evicted_on_insert() {
        let mut history = History::new();
        let evicted = history.append(at(-120_000, 1.0), t0());
        assert_eq!(evicted, 1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_future_reading_persists() {
        let mut history = History::new();
        history.append(at(3_600_000, 1.0), t0());
        history.append(at(0, 2.0), t0() + TimeDelta::minutes(5));
        // The present-stamped reading is gone; the future one stays.
        assert_eq!(tds_values(&history), vec![1.0]);
    }

    #[test]
    fn test_series_in_arrival_order() {
        let mut history = History::new();
        history.append(Reading::new(t0(), 100.0, 20.0), t0());
        history.append(Reading::new(t0() + TimeDelta::seconds(1), 110.0, 21.0), t0() + TimeDelta::seconds(1));

        let series = history.series();
        assert_eq!(series.tds, vec![100.0, 110.0]);
        assert_eq!(series.temperature, vec![20.0, 21.0]);
        assert_eq!(series.labels.len(), 2);
        assert!(series.is_plottable());
        assert_eq!(ChartSeries::points(&series.tds), vec![(0.0, 100.0), (1.0, 110.0)]);
    }
}
