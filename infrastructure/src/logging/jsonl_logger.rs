//! JSONL transcript of stream events.
//!
//! Each [`StreamLogEvent`] becomes one JSON line carrying its payload plus
//! `type` and `timestamp` fields. The file is opened in append mode, so
//! transcripts of successive runs accumulate.

use aivy_application::{StreamLogEvent, StreamLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Stream logger writing one JSON object per line.
pub struct JsonlStreamLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlStreamLogger {
    /// Open `path` for appending, creating it and its parent directories.
    ///
    /// Returns `None` (after a warning) if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: StreamLogEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match event.payload {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert("timestamp".to_string(), Value::from(timestamp));
        Value::Object(map)
    }
}

impl StreamLogger for JsonlStreamLogger {
    fn log(&self, event: StreamLogEvent) {
        let Ok(line) = serde_json::to_string(&Self::record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlStreamLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.jsonl");
        let logger = JsonlStreamLogger::open(&path).unwrap();

        logger.log(StreamLogEvent::new(
            "stream_opened",
            serde_json::json!({"conversation_id": "c1", "request_id": 1}),
        ));
        logger.log(StreamLogEvent::new(
            "token",
            serde_json::json!({"request_id": 1, "token": "Hel"}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "stream_opened");
        assert_eq!(records[0]["conversation_id"], "c1");
        assert_eq!(records[1]["type"], "token");
        assert_eq!(records[1]["token"], "Hel");

        let timestamp = records[0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("aivy.jsonl");

        for request_id in 1..=2 {
            let logger = JsonlStreamLogger::open(&path).unwrap();
            logger.log(StreamLogEvent::new(
                "stream_aborted",
                serde_json::json!({ "request_id": request_id }),
            ));
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["request_id"], 2);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        let logger = JsonlStreamLogger::open(&path).unwrap();

        logger.log(StreamLogEvent::new("note", serde_json::json!("just a string")));
        logger.log(StreamLogEvent::new("empty", Value::Null));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["data"], "just a string");
        assert_eq!(records[1]["type"], "empty");
        assert!(records[1].get("data").is_none());
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        assert!(JsonlStreamLogger::open(blocker.join("nested.jsonl")).is_none());
    }
}
