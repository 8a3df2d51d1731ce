//! Per-ticker position state machine.
//!
//! Each decision is applied in two ordered steps against the in-memory store:
//!
//! 1. **Exit**: an exit signal closes an `OPEN` position at its recorded
//!    quantity.
//! 2. **Entry**: an entry signal opens a position when none is `OPEN`,
//!    evaluated after step 1. A ticker closed in step 1 can therefore be
//!    reopened in the same run.
//!
//! Each step fires at most once per ticker per run; later records for the
//! same ticker and side only mark to market. If neither step fires, an
//! existing position is marked to the new close.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::deriver::Decision;
use super::event::{ENTRY_REASON, EXIT_REASON, Event, EventKind};
use super::position::{Leg, Position};
use super::store::PositionStore;

pub const DEFAULT_QTY: i64 = 200;

/// Parameters fixed for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub asof: NaiveDate,
    pub default_qty: i64,
    pub run_url: String,
}

/// Events produced by one decision. At most one of each kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub exit: Option<Event>,
    pub entry: Option<Event>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.exit.is_none() && self.entry.is_none()
    }
}

/// Applies decisions for one run. Build a new engine per run.
pub struct TransitionEngine {
    config: EngineConfig,
    fired: HashSet<(String, EventKind)>,
}

impl TransitionEngine {
    pub fn new(config: EngineConfig) -> Self {
        TransitionEngine {
            config,
            fired: HashSet::new(),
        }
    }

    fn has_fired(&self, ticker: &str, kind: EventKind) -> bool {
        self.fired.contains(&(ticker.to_string(), kind))
    }

    pub fn apply(&mut self, store: &mut PositionStore, decision: &Decision) -> Transition {
        let exit = self.apply_exit(store, decision);
        let entry = self.apply_entry(store, decision);
        for event in exit.iter().chain(entry.iter()) {
            self.fired.insert((event.ticker.clone(), event.kind()));
        }

        if exit.is_none() && entry.is_none() {
            if let Some(pos) = store.get_mut(&decision.ticker) {
                pos.mark(decision.close, self.config.asof);
            }
        }

        Transition { exit, entry }
    }

    fn apply_exit(&self, store: &mut PositionStore, decision: &Decision) -> Option<Event> {
        if !decision.exit_signal || self.has_fired(&decision.ticker, EventKind::Exit) {
            return None;
        }
        let pos = store.get_mut(&decision.ticker).filter(|p| p.is_open())?;

        pos.close(self.leg(decision.exit_level, decision.close, EXIT_REASON));
        Some(Event::exit(
            self.config.asof,
            &decision.ticker,
            pos.qty,
            decision.exit_level,
            decision.close,
            &self.config.run_url,
        ))
    }

    fn apply_entry(&self, store: &mut PositionStore, decision: &Decision) -> Option<Event> {
        if !decision.entry_signal || self.has_fired(&decision.ticker, EventKind::Entry) {
            return None;
        }
        if store.get(&decision.ticker).is_some_and(Position::is_open) {
            return None;
        }

        let qty = self.config.default_qty;
        store.put(
            &decision.ticker,
            Position::open(
                qty,
                self.leg(decision.entry_level, decision.close, ENTRY_REASON),
            ),
        );
        Some(Event::entry(
            self.config.asof,
            &decision.ticker,
            qty,
            decision.entry_level,
            decision.close,
            &self.config.run_url,
        ))
    }

    fn leg(&self, level: Option<f64>, close: f64, reason: &str) -> Leg {
        Leg {
            date: self.config.asof,
            level,
            close,
            reason: reason.to_string(),
            run_url: self.config.run_url.clone(),
        }
    }
}
