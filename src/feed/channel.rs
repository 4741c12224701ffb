//! Channel-based feed.
//!
//! Receives feed events through a tokio mpsc channel. This is the bridge
//! for any push source (a WebSocket client, an MQTT callback, a test) that
//! lives elsewhere in the process.

use tokio::sync::mpsc;
use tracing::info;

use super::{Feed, FeedError, FeedEvent};

/// Sending half handed to the producer of a [`ChannelFeed`].
pub type FeedSender = mpsc::UnboundedSender<FeedEvent>;

/// A feed that receives events pushed through a channel.
///
/// Unlike a watch channel, every event is kept: a null payload followed by
/// a good record must reach the dashboard as two separate transitions.
///
/// # Example
///
/// ```
/// use tankwatch::ChannelFeed;
///
/// let (tx, feed) = ChannelFeed::create("mqtt://broker/tank-1");
/// ```
#[derive(Debug)]
pub struct ChannelFeed {
    receiver: Option<mpsc::UnboundedReceiver<FeedEvent>>,
    description: String,
}

impl ChannelFeed {
    /// Create a new channel feed around an existing receiver.
    pub fn new(receiver: mpsc::UnboundedReceiver<FeedEvent>, source_description: &str) -> Self {
        Self {
            receiver: Some(receiver),
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair: the sender for the producer, the feed for the app.
    pub fn create(source_description: &str) -> (FeedSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl Feed for ChannelFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Report the lost producer once, then go quiet.
                self.receiver = None;
                Some(FeedEvent::Error(FeedError::Disconnected))
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn unsubscribe(&mut self) {
        if let Some(mut receiver) = self.receiver.take() {
            receiver.close();
            info!("Closed {}", self.description);
        }
    }
}
