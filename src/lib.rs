//! # tankwatch
//!
//! A terminal dashboard and library for live water-tank sensor readings.
//!
//! A feed pushes records carrying total dissolved solids (TDS) and water
//! temperature. tankwatch keeps the last sixty seconds of readings, classifies
//! the latest one against safety thresholds, and renders status cards and a
//! rolling trend chart.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(window)  │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌──────────────┐                                           │
//! │  │ Subscription │◀── FileFeed | StreamFeed | ChannelFeed    │
//! │  │   (feed)     │                                           │
//! │  └──────────────┘                                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and export
//! - **[`feed`]**: The [`Feed`] trait, its transports, and the scoped
//!   [`Subscription`] handle
//! - **[`data`]**: Normalization, the sliding window, classification, and
//!   the derived [`DashboardView`]
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Layered [`Settings`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON file rewritten by a collector
//! tankwatch --file reading.json
//!
//! # Read newline-delimited JSON records from a TCP endpoint
//! tankwatch --connect localhost:9300
//! ```
//!
//! ### As a library
//!
//! ```
//! use chrono::Utc;
//! use serde_json::json;
//! use tankwatch::{ChannelFeed, Dashboard, FeedEvent, Subscription, TdsStatus};
//!
//! let (tx, feed) = ChannelFeed::create("tank-1");
//! let mut subscription = Subscription::new(Box::new(feed));
//! let mut dashboard = Dashboard::default();
//!
//! tx.send(FeedEvent::from_value(json!({"tds": 300, "temperature": 22}))).unwrap();
//! subscription.dispatch(|event| {
//!     dashboard.ingest(event, Utc::now());
//! });
//!
//! let view = dashboard.view();
//! assert!(view.online);
//! assert_eq!(view.tds_status, TdsStatus::Safe);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod feed;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    ChartSeries, Dashboard, DashboardView, History, Metric, RawReading, Reading, TdsStatus,
    TemperatureStatus, Thresholds,
};
pub use feed::{
    ChannelFeed, Feed, FeedError, FeedEvent, FeedSender, FileFeed, StreamFeed, Subscription,
};
