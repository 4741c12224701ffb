//! Feed abstraction for receiving sensor records.
//!
//! A feed delivers, one at a time, either a raw sensor record (possibly
//! absent) or an error. Concrete transports live in the submodules; the
//! dashboard only ever sees [`FeedEvent`]s through a [`Subscription`].

mod channel;
mod error;
mod file;
mod stream;
mod subscription;

pub use channel::{ChannelFeed, FeedSender};
pub use error::FeedError;
pub use file::FileFeed;
pub use stream::StreamFeed;
pub use subscription::Subscription;

use std::fmt::Debug;

use serde_json::Value;

use crate::data::RawReading;

/// A single notification from a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The sensor record changed. `None` means the source reported no value.
    Record(Option<RawReading>),
    /// The subscription failed.
    Error(FeedError),
}

impl FeedEvent {
    /// Wrap an arbitrary JSON payload; `null` becomes an absent record.
    pub fn from_value(value: Value) -> Self {
        FeedEvent::Record(RawReading::from_value(value))
    }
}

/// Trait for receiving sensor records from various transports.
///
/// # Example
///
/// ```
/// use tankwatch::{ChannelFeed, Feed, FeedEvent};
///
/// let (tx, mut feed) = ChannelFeed::create("example");
/// tx.send(FeedEvent::Record(None)).unwrap();
/// assert_eq!(feed.poll(), Some(FeedEvent::Record(None)));
/// ```
pub trait Feed: Send + Debug {
    /// Return the next pending event without blocking.
    fn poll(&mut self) -> Option<FeedEvent>;

    /// A human-readable description of the source, shown in the header.
    fn description(&self) -> &str;

    /// Release the underlying transport. After this, `poll` returns `None`.
    ///
    /// Implementations must tolerate being called more than once.
    fn unsubscribe(&mut self);
}
