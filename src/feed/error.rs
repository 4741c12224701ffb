//! Error types for feeds.

use thiserror::Error;

/// Failures reported by a feed. Any of them takes the dashboard offline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// Reading from the transport failed.
    #[error("Read error: {0}")]
    Io(String),

    /// The transport delivered bytes that are not JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The remote end closed the connection.
    #[error("Connection closed")]
    Closed,

    /// The producing side of the feed went away.
    #[error("Feed disconnected")]
    Disconnected,
}
