//! Data models and processing for sensor readings.
//!
//! This module turns raw feed records into normalized readings, keeps the
//! trailing one-minute window, and derives everything the UI displays.
//!
//! ## Submodules
//!
//! - [`reading`]: [`Reading`], [`RawReading`] and lenient normalization
//! - [`history`]: The 60-second sliding window and chart series
//! - [`status`]: Threshold classification and trend labels
//! - [`dashboard`]: Ingestion of feed events and the derived [`DashboardView`]
//!
//! ## Data Flow
//!
//! ```text
//! FeedEvent (raw JSON record | null | error)
//!        │
//!        ▼
//! Dashboard::ingest()
//!        │
//!        ├──▶ normalize() ──▶ History::append() (evict > 60s)
//!        │
//!        └──▶ online flag
//!
//! Dashboard::view() ──▶ DashboardView (statuses, trends, ChartSeries)
//! ```

pub mod dashboard;
pub mod history;
pub mod reading;
pub mod status;

pub use dashboard::{Dashboard, DashboardView};
pub use history::{ChartSeries, History, WINDOW_MS};
pub use reading::{normalize, RawReading, Reading};
pub use status::{Metric, Severity, TdsStatus, TemperatureStatus, Thresholds};
