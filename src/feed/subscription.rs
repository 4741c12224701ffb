//! Scoped ownership of a feed for the lifetime of a dashboard session.

use tracing::info;

use super::{Feed, FeedEvent};

/// Upper bound on events handed out per [`Subscription::dispatch`] call so
/// that a chatty feed cannot starve the render loop.
const MAX_EVENTS_PER_DISPATCH: usize = 256;

/// An active subscription to a feed.
///
/// The subscription owns its feed and releases it exactly once: either via
/// an explicit [`unsubscribe`](Self::unsubscribe) or when dropped. After
/// release no further events are delivered.
///
/// # Example
///
/// ```
/// use tankwatch::{ChannelFeed, FeedEvent, Subscription};
///
/// let (tx, feed) = ChannelFeed::create("example");
/// let mut subscription = Subscription::new(Box::new(feed));
///
/// tx.send(FeedEvent::Record(None)).unwrap();
/// let mut seen = Vec::new();
/// subscription.dispatch(|event| seen.push(event));
/// assert_eq!(seen.len(), 1);
///
/// subscription.unsubscribe();
/// let _ = tx.send(FeedEvent::Record(None));
/// assert_eq!(subscription.dispatch(|event| seen.push(event)), 0);
/// ```
#[derive(Debug)]
pub struct Subscription {
    feed: Option<Box<dyn Feed>>,
    description: String,
}

impl Subscription {
    /// Take ownership of a feed.
    pub fn new(feed: Box<dyn Feed>) -> Self {
        let description = feed.description().to_string();
        info!("Subscribed to {}", description);
        Self {
            feed: Some(feed),
            description,
        }
    }

    /// Description of the underlying feed (kept after release).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Next pending event, or `None` if nothing is pending or released.
    pub fn poll(&mut self) -> Option<FeedEvent> {
        self.feed.as_mut()?.poll()
    }

    /// Hand every pending event to `handler`, in order, one at a time.
    ///
    /// Returns the number of events delivered.
    pub fn dispatch<F>(&mut self, mut handler: F) -> usize
    where
        F: FnMut(FeedEvent),
    {
        let mut delivered = 0;
        while delivered < MAX_EVENTS_PER_DISPATCH {
            let Some(event) = self.poll() else {
                break;
            };
            handler(event);
            delivered += 1;
        }
        delivered
    }

    /// Release the feed. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(mut feed) = self.feed.take() {
            feed.unsubscribe();
            info!("Unsubscribed from {}", self.description);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
