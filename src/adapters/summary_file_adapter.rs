//! Writes the run summary artifact as a JSON file.

use std::path::PathBuf;

use super::atomic_file::write_json_atomic;
use crate::domain::error::LedgerError;
use crate::domain::summary::RunSummary;
use crate::ports::summary_port::SummaryPort;

pub struct SummaryFileAdapter {
    path: PathBuf,
}

impl SummaryFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummaryPort for SummaryFileAdapter {
    fn write(&self, summary: &RunSummary) -> Result<(), LedgerError> {
        write_json_atomic(&self.path, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn overwrites_previous_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/events.json");
        let adapter = SummaryFileAdapter::new(&path);
        let asof = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

        let mut first = RunSummary::new(asof, "");
        first.notes.push("first".into());
        adapter.write(&first).unwrap();
        adapter.write(&RunSummary::skipped(asof, "", "2024-04-05")).unwrap();

        let read: RunSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.notes.len(), 1);
        assert!(read.notes[0].starts_with("skip:"));
    }
}
