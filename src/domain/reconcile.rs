//! One reconciliation run: signals in, positions and ledger out.
//!
//! Order of work:
//! 1. Load the store and consult the replay guard. A replayed date writes a
//!    zero-count summary and touches nothing else.
//! 2. Read the feed, derive decisions and apply them to the in-memory store.
//! 3. Append the run's events to the ledger.
//! 4. Persist the store, then the summary.
//!
//! Any error before step 4 leaves the stored positions untouched. A ledger
//! failure aborts before the store is written; a retry deduplicates events
//! already appended.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::deriver;
use super::error::LedgerError;
use super::event::Event;
use super::guard::{self, GuardOutcome};
use super::summary::RunSummary;
use super::transition::{DEFAULT_QTY, EngineConfig, TransitionEngine};
use crate::ports::ledger_port::LedgerPort;
use crate::ports::signal_port::SignalPort;
use crate::ports::store_port::StorePort;
use crate::ports::summary_port::SummaryPort;

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileConfig {
    pub asof: NaiveDate,
    pub default_qty: i64,
    pub run_url: String,
    pub strict: bool,
}

impl ReconcileConfig {
    pub fn new(asof: NaiveDate) -> Self {
        ReconcileConfig {
            asof,
            default_qty: DEFAULT_QTY,
            run_url: String::new(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Applied(RunSummary),
    Skipped(RunSummary),
}

impl RunOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            RunOutcome::Applied(s) | RunOutcome::Skipped(s) => s,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RunOutcome::Skipped(_))
    }
}

/// The replay guard is consulted before the feed is read, so a replayed
/// date succeeds even when the feed file is missing.
pub fn run_reconcile(
    config: &ReconcileConfig,
    signals: &dyn SignalPort,
    store_port: &dyn StorePort,
    ledger: &dyn LedgerPort,
    summary_out: &dyn SummaryPort,
) -> Result<RunOutcome, LedgerError> {
    let mut store = store_port.load()?;
    let mut summary = RunSummary::new(config.asof, &config.run_url);

    match guard::check(config.asof, &store) {
        GuardOutcome::Skip { last_applied } => {
            info!(
                asof = %config.asof,
                last = %last_applied,
                "asof already applied; emitting empty events"
            );
            let skipped = RunSummary::skipped(config.asof, &config.run_url, &last_applied);
            summary_out.write(&skipped)?;
            return Ok(RunOutcome::Skipped(skipped));
        }
        GuardOutcome::Proceed { note } => {
            if let Some(note) = note {
                warn!("{note}");
                summary.notes.push(note);
            }
        }
    }

    let records = signals.load_signals()?;
    summary.counts.processed = records.len();
    info!(records = records.len(), strict = config.strict, "applying signals");

    let mut engine = TransitionEngine::new(EngineConfig {
        asof: config.asof,
        default_qty: config.default_qty,
        run_url: config.run_url.clone(),
    });

    for record in &records {
        let derivation = deriver::derive(record, config.strict)?;
        summary.notes.extend(derivation.notes);
        let Some(decision) = derivation.decision else {
            continue;
        };

        if decision.entry_signal {
            summary.counts.entry_signals += 1;
        }
        if decision.exit_signal {
            summary.counts.exit_signals += 1;
        }

        let transition = engine.apply(&mut store, &decision);
        if let Some(exit) = transition.exit {
            debug!(ticker = %exit.ticker, qty = exit.qty, "exit");
            summary.exits.push(exit);
        }
        if let Some(entry) = transition.entry {
            debug!(ticker = %entry.ticker, qty = entry.qty, "entry");
            summary.entries.push(entry);
        }
    }
    summary.counts.entries = summary.entries.len();
    summary.counts.exits = summary.exits.len();

    store.mark_applied(config.asof);

    let events: Vec<Event> = summary.events().cloned().collect();
    let appended = ledger.append(config.asof, &events)?;
    debug!(appended, produced = events.len(), "ledger updated");

    store_port.save(&store)?;
    summary_out.write(&summary)?;

    info!(
        entries = summary.counts.entries,
        exits = summary.counts.exits,
        "run applied"
    );
    Ok(RunOutcome::Applied(summary))
}
