//! Stream-based feed.
//!
//! Receives sensor records from an async byte stream as newline-delimited
//! JSON. This is what the CLI uses for TCP connections.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{Feed, FeedError, FeedEvent};

/// Capacity of the channel between the reader task and the UI.
const CHANNEL_CAPACITY: usize = 16;

/// A feed that reads newline-delimited JSON records from an async reader.
///
/// Each line is one JSON value. `null` is an absent record, anything else
/// that parses is a record, and a line that is not JSON is reported as a
/// [`FeedError::Parse`]. End of stream is reported as
/// [`FeedError::Closed`] and ends the background task.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use tankwatch::StreamFeed;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"tds\": 310, \"temperature\": 21.5}\n";
/// let feed = StreamFeed::spawn(Cursor::new(data.to_vec()), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamFeed {
    receiver: Option<mpsc::Receiver<FeedEvent>>,
    task: Option<JoinHandle<()>>,
    description: String,
}

impl StreamFeed {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                let event = match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        let _ = tx.send(FeedEvent::Error(FeedError::Closed)).await;
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim_ascii();
                        if trimmed.is_empty() {
                            continue;
                        }
                        parse_line(trimmed)
                    }
                    Err(e) => {
                        let _ = tx.send(FeedEvent::Error(FeedError::Io(e.to_string()))).await;
                        break;
                    }
                };

                if tx.send(event).await.is_err() {
                    // Receiver dropped
                    break;
                }
            }
        });

        Self {
            receiver: Some(rx),
            task: Some(task),
            description: format!("stream: {}", description),
        }
    }
}

/// Parse one line. Bytes that are not UTF-8 are just another kind of bad JSON.
fn parse_line(line: &[u8]) -> FeedEvent {
    match serde_json::from_slice::<Value>(line) {
        Ok(value) => FeedEvent::from_value(value),
        Err(e) => {
            debug!("Unparseable feed line: {}", String::from_utf8_lossy(line));
            FeedEvent::Error(FeedError::Parse(e.to_string()))
        }
    }
}

impl Feed for StreamFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(event) => Some(event),
            // A finished task has already sent its closing error.
            Err(mpsc::error::TryRecvError::Empty | mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(mut receiver) = self.receiver.take() {
            receiver.close();
            info!("Closed {}", self.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use serde_json::json;
    use tokio::io::AsyncWriteExt;

    fn sample_json() -> &'static str {
        r#"{"tds": 320, "temperature": "22.5", "timestamp": "2024-05-01T12:00:00Z"}"#
    }

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_stream_feed_spawn() {
        let data = format!("{}\n", sample_json());
        let mut feed = StreamFeed::spawn(Cursor::new(data), "test");

        settle().await;

        match feed.poll() {
            Some(FeedEvent::Record(Some(raw))) => {
                assert_eq!(raw.tds, Some(json!(320)));
                assert_eq!(raw.temperature, Some(json!("22.5")));
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(feed.poll(), Some(FeedEvent::Error(FeedError::Closed)));
        assert!(feed.poll().is_none());
    }

    #[tokio::test]
    async fn test_stream_feed_null_and_garbage() {
        let data = "null\n\nnot valid json\n";
        let mut feed = StreamFeed::spawn(Cursor::new(data), "test");

        settle().await;

        assert_eq!(feed.poll(), Some(FeedEvent::Record(None)));
        assert!(matches!(feed.poll(), Some(FeedEvent::Error(FeedError::Parse(_)))));
        assert_eq!(feed.poll(), Some(FeedEvent::Error(FeedError::Closed)));
    }

    #[tokio::test]
    async fn test_stream_feed_description() {
        let feed = StreamFeed::spawn(Cursor::new(""), "tcp://localhost:9090");
        assert_eq!(feed.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn test_stream_feed_survives_invalid_utf8() {
        let mut data = b"{\"tds\":1}\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"{\"tds\":2}\n");
        let mut feed = StreamFeed::spawn(Cursor::new(data), "test");

        settle().await;

        match feed.poll() {
            Some(FeedEvent::Record(Some(raw))) => assert_eq!(raw.tds, Some(json!(1))),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(feed.poll(), Some(FeedEvent::Error(FeedError::Parse(_)))));
        match feed.poll() {
            Some(FeedEvent::Record(Some(raw))) => assert_eq!(raw.tds, Some(json!(2))),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(feed.poll(), Some(FeedEvent::Error(FeedError::Closed)));
    }

    #[tokio::test]
    async fn test_stream_feed_crlf_lines() {
        let data = "{\"tds\": 5}\r\n";
        let mut feed = StreamFeed::spawn(Cursor::new(data), "test");

        settle().await;

        assert!(matches!(feed.poll(), Some(FeedEvent::Record(Some(_)))));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut feed = StreamFeed::spawn(client, "test-pipe");

        feed.unsubscribe();
        feed.unsubscribe();

        let _ = server.write_all(format!("{}\n", sample_json()).as_bytes()).await;
        settle().await;

        assert!(feed.poll().is_none());
    }
}
