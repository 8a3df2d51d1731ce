//! JSONL signal feed reader.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::error::LedgerError;
use crate::domain::signal::SignalRecord;
use crate::ports::signal_port::SignalPort;

pub struct JsonlSignalAdapter {
    path: PathBuf,
}

impl JsonlSignalAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a whole feed. Blank lines are skipped; line numbers in errors are
/// 1-based.
pub fn parse_feed(text: &str) -> Result<Vec<SignalRecord>, LedgerError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            SignalRecord::from_json(line).map_err(|e| LedgerError::SignalParse {
                line: idx + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

impl SignalPort for JsonlSignalAdapter {
    fn load_signals(&self) -> Result<Vec<SignalRecord>, LedgerError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::MissingInput {
                path: self.path.display().to_string(),
            },
            _ => LedgerError::Io(e),
        })?;
        parse_feed(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn preserves_order_and_skips_blank_lines() {
        let text = "{\"ticker\":\"B\"}\n\n   \n{\"ticker\":\"A\"}\n{\"ticker\":\"C\"}\n";
        let records = parse_feed(text).unwrap();
        let tickers: Vec<_> = records.iter().map(|r| r.ticker().unwrap()).collect();
        assert_eq!(tickers, vec!["B", "A", "C"]);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let text = "{\"ticker\":\"A\"}\n\n{oops\n";
        let err = parse_feed(text).unwrap_err();
        assert!(matches!(err, LedgerError::SignalParse { line: 3, .. }));
    }

    #[test]
    fn short_history_nan_levels_do_not_fail_the_feed() {
        let text = concat!(
            r#"{"ticker": "7203.T", "name": "トヨタ自動車", "metrics": {"close": 3000.0, "ma200": NaN, "prev20_high": NaN, "prev10_low": 2800.0}, "regime_ok": false, "setup_ok": true, "entry_ok": false, "signal_entry": false, "exit": false}"#,
            "\n",
            r#"{"ticker": "6758.T", "metrics": {"close": 12000.0, "prev20_high": 11800.0, "prev10_low": 11000.0}, "signal_entry": true, "exit": false}"#,
            "\n",
        );
        let records = parse_feed(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metrics.prev20_high, None);
        assert_eq!(records[0].metrics.prev10_low, Some(2800.0));
        assert_eq!(records[1].metrics.prev20_high, Some(11800.0));
    }

    #[test]
    fn empty_feed_is_empty() {
        assert!(parse_feed("").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_missing_input() {
        let dir = TempDir::new().unwrap();
        let adapter = JsonlSignalAdapter::new(dir.path().join("daily.jsonl"));
        let err = adapter.load_signals().unwrap_err();
        assert!(matches!(err, LedgerError::MissingInput { .. }));
    }

    #[test]
    fn reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily.jsonl");
        fs::write(
            &path,
            "{\"ticker\":\"T1\",\"signal_entry\":true,\"exit\":false,\"metrics\":{\"close\":3000}}\n",
        )
        .unwrap();
        let records = JsonlSignalAdapter::new(&path).load_signals().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metrics.close, Some(3000.0));
    }
}
