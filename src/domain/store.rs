//! The position store: every ticker's position plus run bookkeeping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::position::Position;

pub const SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_MODE: &str = "eod_close";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionStore {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Kept as raw text so that an unparsable value can be reported and
    /// ignored instead of failing the load.
    #[serde(default)]
    pub asof_last_applied: Option<String>,
    #[serde(default)]
    pub positions: BTreeMap<String, Position>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_mode() -> String {
    DEFAULT_MODE.to_string()
}

impl Default for PositionStore {
    fn default() -> Self {
        PositionStore {
            schema_version: SCHEMA_VERSION,
            mode: DEFAULT_MODE.to_string(),
            asof_last_applied: None,
            positions: BTreeMap::new(),
        }
    }
}

impl PositionStore {
    /// Parsed last-applied date. `Err` carries the raw value when it is not
    /// a `YYYY-MM-DD` date.
    pub fn last_applied(&self) -> Result<Option<NaiveDate>, &str> {
        match self.asof_last_applied.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| raw),
        }
    }

    pub fn mark_applied(&mut self, asof: NaiveDate) {
        self.asof_last_applied = Some(asof.format("%Y-%m-%d").to_string());
    }

    pub fn get(&self, ticker: &str) -> Option<&Position> {
        self.positions.get(ticker)
    }

    pub fn get_mut(&mut self, ticker: &str) -> Option<&mut Position> {
        self.positions.get_mut(ticker)
    }

    /// Insert or overwrite the position for `ticker`.
    pub fn put(&mut self, ticker: &str, position: Position) {
        self.positions.insert(ticker.to_string(), position);
    }

    pub fn open_positions(&self) -> impl Iterator<Item = (&String, &Position)> {
        self.positions.iter().filter(|(_, p)| p.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.open_positions().count()
    }
}
