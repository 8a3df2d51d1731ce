//! Per-run summary artifact handed to the report renderer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub processed: usize,
    pub entry_signals: usize,
    pub exit_signals: usize,
    pub entries: usize,
    pub exits: usize,
}

impl RunCounts {
    pub fn is_zero(&self) -> bool {
        *self == RunCounts::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub asof: NaiveDate,
    pub run_url: String,
    pub counts: RunCounts,
    pub entries: Vec<Event>,
    pub exits: Vec<Event>,
    pub notes: Vec<String>,
}

impl RunSummary {
    pub fn new(asof: NaiveDate, run_url: &str) -> Self {
        RunSummary {
            asof,
            run_url: run_url.to_string(),
            counts: RunCounts::default(),
            entries: Vec::new(),
            exits: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Summary for a replayed as-of date: zero counts and a single note.
    pub fn skipped(asof: NaiveDate, run_url: &str, last_applied: &str) -> Self {
        let mut summary = RunSummary::new(asof, run_url);
        summary.notes.push(format!(
            "skip: asof {} already applied (last {})",
            asof.format("%Y-%m-%d"),
            last_applied
        ));
        summary
    }

    /// Events of this run in ledger order: entries, then exits. Line order
    /// is not causal order; a same-day close and reopen is written as ENTRY
    /// before EXIT, and the store holds the resulting state.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().chain(self.exits.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asof() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()
    }

    #[test]
    fn skipped_has_zero_counts_and_note() {
        let s = RunSummary::skipped(asof(), "url", "2024-04-05");
        assert!(s.counts.is_zero());
        assert!(s.entries.is_empty());
        assert!(s.exits.is_empty());
        assert_eq!(s.notes, vec!["skip: asof 2024-04-05 already applied (last 2024-04-05)"]);
    }

    #[test]
    fn json_shape() {
        let s = RunSummary::new(asof(), "");
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["asof"], "2024-04-05");
        assert_eq!(v["counts"]["processed"], 0);
        assert_eq!(v["counts"]["entry_signals"], 0);
        assert!(v["entries"].as_array().unwrap().is_empty());
        assert!(v["notes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn events_orders_entries_first() {
        let mut s = RunSummary::new(asof(), "");
        s.exits.push(Event::exit(asof(), "A", 1, None, 1.0, ""));
        s.entries.push(Event::entry(asof(), "B", 1, None, 1.0, ""));
        let ids: Vec<_> = s.events().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["2024-04-05:B:ENTRY", "2024-04-05:A:EXIT"]);
    }
}
