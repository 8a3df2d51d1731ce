//! Immutable ledger events.
//!
//! Serialized form is one JSON object per event:
//! `{event_id, asof, ticker, event, qty, entry_level|exit_level, close, reason, run_url}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const ENTRY_REASON: &str = "signal_entry";
pub const EXIT_REASON: &str = "exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Entry,
    Exit,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Entry => write!(f, "ENTRY"),
            EventKind::Exit => write!(f, "EXIT"),
        }
    }
}

/// Kind-specific part of an event. The tag lands in the `event` field and
/// the reference level is named after the side it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventDetail {
    Entry { entry_level: Option<f64> },
    Exit { exit_level: Option<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub asof: NaiveDate,
    pub ticker: String,
    #[serde(flatten)]
    pub detail: EventDetail,
    pub qty: i64,
    pub close: f64,
    pub reason: String,
    pub run_url: String,
}

/// Deterministic identity: `<asof>:<ticker>:<KIND>`.
pub fn event_id(asof: NaiveDate, ticker: &str, kind: EventKind) -> String {
    format!("{}:{}:{}", asof.format("%Y-%m-%d"), ticker, kind)
}

impl Event {
    pub fn entry(
        asof: NaiveDate,
        ticker: &str,
        qty: i64,
        level: Option<f64>,
        close: f64,
        run_url: &str,
    ) -> Self {
        Event {
            event_id: event_id(asof, ticker, EventKind::Entry),
            asof,
            ticker: ticker.to_string(),
            detail: EventDetail::Entry { entry_level: level },
            qty,
            close,
            reason: ENTRY_REASON.to_string(),
            run_url: run_url.to_string(),
        }
    }

    pub fn exit(
        asof: NaiveDate,
        ticker: &str,
        qty: i64,
        level: Option<f64>,
        close: f64,
        run_url: &str,
    ) -> Self {
        Event {
            event_id: event_id(asof, ticker, EventKind::Exit),
            asof,
            ticker: ticker.to_string(),
            detail: EventDetail::Exit { exit_level: level },
            qty,
            close,
            reason: EXIT_REASON.to_string(),
            run_url: run_url.to_string(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self.detail {
            EventDetail::Entry { .. } => EventKind::Entry,
            EventDetail::Exit { .. } => EventKind::Exit,
        }
    }

    pub fn level(&self) -> Option<f64> {
        match self.detail {
            EventDetail::Entry { entry_level } => entry_level,
            EventDetail::Exit { exit_level } => exit_level,
        }
    }
}
