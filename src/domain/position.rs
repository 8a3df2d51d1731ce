//! Position tracking for the simulated book.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed,
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::Open => f.pad("OPEN"),
            PositionStatus::Closed => f.pad("CLOSED"),
        }
    }
}

/// One side of a position's life: when and why it was opened or closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub date: NaiveDate,
    /// Reference level (prior high on entry, prior low on exit). Audit only.
    pub level: Option<f64>,
    pub close: f64,
    pub reason: String,
    pub run_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub status: PositionStatus,
    pub qty: i64,
    pub entry: Leg,
    pub exit: Option<Leg>,
    pub last_price: f64,
    pub last_update: NaiveDate,
}

impl Position {
    /// A freshly opened position.
    pub fn open(qty: i64, entry: Leg) -> Self {
        Position {
            status: PositionStatus::Open,
            qty,
            last_price: entry.close,
            last_update: entry.date,
            entry,
            exit: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// Close the position, keeping its entry leg and quantity for the record.
    pub fn close(&mut self, exit: Leg) {
        self.status = PositionStatus::Closed;
        self.mark(exit.close, exit.date);
        self.exit = Some(exit);
    }

    /// Mark-to-market refresh.
    pub fn mark(&mut self, price: f64, date: NaiveDate) {
        self.last_price = price;
        self.last_update = date;
    }
}
