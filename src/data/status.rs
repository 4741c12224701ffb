//! Safety classification of the latest reading.
//!
//! Classification is a pure function of a value and the configured
//! [`Thresholds`]; nothing here is stored.

use serde::{Deserialize, Serialize};

/// Label used by trend indicators until the window holds enough points.
pub const WAITING_FOR_DATA: &str = "waiting for data";

/// Safety thresholds for TDS and temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Highest TDS value (mg/L) still considered safe.
    pub tds_max: f64,
    /// Lowest safe water temperature (°C), inclusive.
    pub temp_min: f64,
    /// Highest safe water temperature (°C), inclusive.
    pub temp_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            tds_max: 500.0,
            temp_min: 15.0,
            temp_max: 30.0,
        }
    }
}

/// Coarse severity shared by both metrics, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Unknown,
    Ok,
    Alert,
}

/// Classification of a TDS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TdsStatus {
    Unknown,
    Safe,
    High,
}

impl TdsStatus {
    /// Classify a TDS value; `None` means no reading has arrived yet.
    pub fn classify(tds: Option<f64>, thresholds: &Thresholds) -> Self {
        match tds {
            None => TdsStatus::Unknown,
            Some(v) if v <= thresholds.tds_max => TdsStatus::Safe,
            Some(_) => TdsStatus::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TdsStatus::Unknown => "unknown",
            TdsStatus::Safe => "safe",
            TdsStatus::High => "high",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            TdsStatus::Unknown => Severity::Unknown,
            TdsStatus::Safe => Severity::Ok,
            TdsStatus::High => Severity::Alert,
        }
    }
}

/// Classification of a water temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureStatus {
    Unknown,
    Safe,
    OutOfRange,
}

impl TemperatureStatus {
    /// Classify a temperature; the safe band is inclusive on both ends.
    pub fn classify(temperature: Option<f64>, thresholds: &Thresholds) -> Self {
        match temperature {
            None => TemperatureStatus::Unknown,
            Some(t) if (thresholds.temp_min..=thresholds.temp_max).contains(&t) => {
                TemperatureStatus::Safe
            }
            Some(_) => TemperatureStatus::OutOfRange,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemperatureStatus::Unknown => "unknown",
            TemperatureStatus::Safe => "safe",
            TemperatureStatus::OutOfRange => "out-of-range",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            TemperatureStatus::Unknown => Severity::Unknown,
            TemperatureStatus::Safe => Severity::Ok,
            TemperatureStatus::OutOfRange => Severity::Alert,
        }
    }
}

/// The two metrics a tank sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Tds,
    Temperature,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Tds => "TDS",
            Metric::Temperature => "Temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Tds => "mg/L",
            Metric::Temperature => "°C",
        }
    }
}

/// Trend label for TDS given the number of buffered points.
pub fn tds_trend(status: TdsStatus, points: usize) -> &'static str {
    if points < 2 {
        WAITING_FOR_DATA
    } else if status == TdsStatus::Safe {
        "stable"
    } else {
        "needs attention"
    }
}

/// Trend label for temperature given the number of buffered points.
pub fn temperature_trend(status: TemperatureStatus, points: usize) -> &'static str {
    if points < 2 {
        WAITING_FOR_DATA
    } else {
        status.label()
    }
}
