//! Month-partitioned JSONL event ledger.
//!
//! Layout: `{ledger_dir}/ledger-YYYY-MM.jsonl`, one compact JSON event per
//! line. Files are only ever opened for append.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::domain::error::LedgerError;
use crate::domain::event::Event;
use crate::ports::ledger_port::LedgerPort;

pub struct JsonlLedgerAdapter {
    ledger_dir: PathBuf,
}

impl JsonlLedgerAdapter {
    pub fn new(ledger_dir: impl Into<PathBuf>) -> Self {
        Self {
            ledger_dir: ledger_dir.into(),
        }
    }

    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }

    /// Partition file for the month containing `asof`.
    pub fn partition_path(&self, asof: NaiveDate) -> PathBuf {
        self.ledger_dir
            .join(format!("ledger-{}.jsonl", asof.format("%Y-%m")))
    }

    fn append_err(path: &Path, reason: impl ToString) -> LedgerError {
        LedgerError::LedgerAppend {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Partition text, empty if the partition does not exist yet.
    fn read_text(path: &Path) -> Result<String, LedgerError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(Self::append_err(path, e)),
        }
    }
}

/// Identifiers already present in a partition. Lines that are not JSON
/// objects with an `event_id` contribute nothing.
fn existing_ids(text: &str) -> HashSet<String> {
    text.lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter_map(|obj| match obj.get("event_id")? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}

impl LedgerPort for JsonlLedgerAdapter {
    fn append(&self, asof: NaiveDate, events: &[Event]) -> Result<usize, LedgerError> {
        if events.is_empty() {
            return Ok(0);
        }
        let path = self.partition_path(asof);
        fs::create_dir_all(&self.ledger_dir).map_err(|e| Self::append_err(&path, e))?;

        let text = Self::read_text(&path)?;
        let mut seen = existing_ids(&text);

        let mut buf = String::new();
        // A torn final line from an interrupted append must not swallow the
        // first new event.
        if !text.is_empty() && !text.ends_with('\n') {
            buf.push('\n');
        }
        let mut written = 0;
        for event in events {
            if !seen.insert(event.event_id.clone()) {
                continue;
            }
            let line = serde_json::to_string(event).map_err(|e| Self::append_err(&path, e))?;
            buf.push_str(&line);
            buf.push('\n');
            written += 1;
        }
        if written == 0 {
            return Ok(0);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Self::append_err(&path, e))?;
        file.write_all(buf.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| Self::append_err(&path, e))?;
        Ok(written)
    }

    fn read_partition(&self, asof: NaiveDate) -> Result<Vec<Event>, LedgerError> {
        let path = self.partition_path(asof);
        let text = Self::read_text(&path)?;
        let mut events = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Event>(line) {
                Ok(evt) => events.push(evt),
                Err(e) => warn!(path = %path.display(), line = idx + 1, "unreadable ledger line: {e}"),
            }
        }
        Ok(events)
    }
}
