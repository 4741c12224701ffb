//! File-based feed.
//!
//! Polls a JSON file holding the current sensor record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tracing::info;

use super::{Feed, FeedError, FeedEvent};

/// A feed that reads the sensor record from a JSON file.
///
/// The file is expected to be rewritten in place by whatever collects the
/// readings. The feed tracks the modification time and only emits a record
/// when the file has changed. A failure is reported once and not repeated
/// until the file recovers or fails differently.
#[derive(Debug)]
pub struct FileFeed {
    path: PathBuf,
    description: String,
    last_modified: Option<SystemTime>,
    last_error: Option<FeedError>,
    subscribed: bool,
}

impl FileFeed {
    /// Create a new file feed for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_modified: None,
            last_error: None,
            subscribed: true,
        }
    }

    /// Returns the path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&self) -> Result<Value, FeedError> {
        let content = fs::read_to_string(&self.path).map_err(|e| FeedError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| FeedError::Parse(e.to_string()))
    }

    fn report(&mut self, error: FeedError) -> Option<FeedEvent> {
        if self.last_error.as_ref() == Some(&error) {
            return None;
        }
        self.last_error = Some(error.clone());
        Some(FeedEvent::Error(error))
    }
}

impl Feed for FileFeed {
    fn poll(&mut self) -> Option<FeedEvent> {
        if !self.subscribed {
            return None;
        }

        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // Never read successfully, keep trying
            (Some(_), None) => true,  // File disappeared, surface the error
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        match self.read_file() {
            Ok(value) => {
                self.last_modified = current_modified;
                self.last_error = None;
                Some(FeedEvent::from_value(value))
            }
            Err(e) => self.report(e),
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            self.subscribed = false;
            info!("Stopped watching {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{ "tds": 300, "temperature": 22, "timestamp": "2024-05-01T12:00:00Z" }"#
    }

    #[test]
    fn test_file_feed_new() {
        let feed = FileFeed::new("/tmp/reading.json");
        assert_eq!(feed.path(), Path::new("/tmp/reading.json"));
        assert_eq!(feed.description(), "file: /tmp/reading.json");
    }

    #[test]
    fn test_file_feed_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut feed = FileFeed::new(file.path());

        assert!(matches!(feed.poll(), Some(FeedEvent::Record(Some(_)))));

        // No change since the last read
        assert!(feed.poll().is_none());
    }

    #[test]
    fn test_file_feed_null_record() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "null").unwrap();

        let mut feed = FileFeed::new(file.path());
        assert_eq!(feed.poll(), Some(FeedEvent::Record(None)));
    }

    #[test]
    fn test_file_feed_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut feed = FileFeed::new(file.path());
        let _ = feed.poll();

        std::thread::sleep(std::time::Duration::from_millis(10));
        file.as_file().set_len(0).unwrap();
        file.rewind().unwrap();
        writeln!(file, r#"{{ "tds": 640, "temperature": 31 }}"#).unwrap();
        file.flush().unwrap();

        // Note: may see no change on filesystems with coarse mtime resolution
        if let Some(FeedEvent::Record(Some(raw))) = feed.poll() {
            assert_eq!(raw.tds, Some(serde_json::json!(640)));
        }
    }

    #[test]
    fn test_file_feed_missing_file_reported_once() {
        let mut feed = FileFeed::new("/nonexistent/path/reading.json");

        match feed.poll() {
            Some(FeedEvent::Error(e)) => assert!(e.to_string().contains("Read error")),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(feed.poll().is_none());
    }

    #[test]
    fn test_file_feed_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut feed = FileFeed::new(file.path());

        match feed.poll() {
            Some(FeedEvent::Error(e)) => assert!(e.to_string().contains("Parse error")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_unsubscribe_stops_polling() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut feed = FileFeed::new(file.path());
        feed.unsubscribe();
        assert!(feed.poll().is_none());
    }
}
