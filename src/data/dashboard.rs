//! Dashboard state: the single source of truth for what is displayed.
//!
//! [`Dashboard::ingest`] applies one feed event: normalize, append and evict,
//! then update connectivity. [`Dashboard::view`] derives a read-only
//! [`DashboardView`] snapshot for any consumer (the TUI, an export, a test).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::history::{ChartSeries, History};
use super::reading::{normalize, Reading};
use super::status::{
    temperature_trend, tds_trend, Metric, TdsStatus, TemperatureStatus, Thresholds,
};
use crate::feed::FeedEvent;

/// Live state built up from feed events.
#[derive(Debug, Clone)]
pub struct Dashboard {
    history: History,
    latest: Option<Reading>,
    online: bool,
    thresholds: Thresholds,
    last_error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl Dashboard {
    /// Create an empty, offline dashboard.
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            history: History::new(),
            latest: None,
            online: false,
            thresholds,
            last_error: None,
            last_updated: None,
        }
    }

    /// Apply one feed event, evaluated at `now`.
    ///
    /// Returns `true` if a reading was added to the window.
    pub fn ingest(&mut self, event: FeedEvent, now: DateTime<Utc>) -> bool {
        match event {
            FeedEvent::Record(Some(raw)) => {
                let reading = normalize(&raw, now);
                debug!(
                    "Reading tds={} temperature={} at {}",
                    reading.tds, reading.temperature, reading.timestamp
                );
                self.history.append(reading.clone(), now);
                self.latest = Some(reading);
                self.last_error = None;
                self.last_updated = Some(now);
                self.set_online(true);
                true
            }
            FeedEvent::Record(None) => {
                debug!("Feed reported no value");
                self.set_online(false);
                false
            }
            FeedEvent::Error(e) => {
                warn!("Feed error: {}", e);
                self.last_error = Some(e.to_string());
                self.set_online(false);
                false
            }
        }
    }

    fn set_online(&mut self, online: bool) {
        if self.online != online {
            info!("Feed is now {}", if online { "online" } else { "offline" });
        }
        self.online = online;
    }

    pub fn online(&self) -> bool {
        self.online
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The most recently ingested reading, even if it has left the window.
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// Message of the last feed error, cleared by the next good reading.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Evaluation time of the last good reading.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn current_tds(&self) -> Option<f64> {
        self.latest.as_ref().map(|r| r.tds)
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.latest.as_ref().map(|r| r.temperature)
    }

    pub fn tds_status(&self) -> TdsStatus {
        TdsStatus::classify(self.current_tds(), &self.thresholds)
    }

    pub fn temperature_status(&self) -> TemperatureStatus {
        TemperatureStatus::classify(self.current_temperature(), &self.thresholds)
    }

    /// Trend label for a metric, based on the buffered window.
    pub fn trend_label(&self, metric: Metric) -> &'static str {
        let points = self.history.len();
        match metric {
            Metric::Tds => tds_trend(self.tds_status(), points),
            Metric::Temperature => temperature_trend(self.temperature_status(), points),
        }
    }

    /// Derive a snapshot of everything a renderer needs.
    pub fn view(&self) -> DashboardView {
        DashboardView {
            online: self.online,
            current_tds: self.current_tds(),
            current_temperature: self.current_temperature(),
            tds_status: self.tds_status(),
            temperature_status: self.temperature_status(),
            tds_trend: self.trend_label(Metric::Tds),
            temperature_trend: self.trend_label(Metric::Temperature),
            series: self.history.series(),
            last_updated: self.last_updated,
            last_error: self.last_error.clone(),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

/// Read-only snapshot of derived dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub online: bool,
    /// `None` until the first reading arrives ("unknown").
    pub current_tds: Option<f64>,
    pub current_temperature: Option<f64>,
    pub tds_status: TdsStatus,
    pub temperature_status: TemperatureStatus,
    pub tds_trend: &'static str,
    pub temperature_trend: &'static str,
    pub series: ChartSeries,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
