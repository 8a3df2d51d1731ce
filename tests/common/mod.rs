#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use tradeledger::domain::error::LedgerError;
use tradeledger::domain::event::Event;
use tradeledger::domain::signal::{SignalMetrics, SignalRecord};
use tradeledger::domain::store::PositionStore;
use tradeledger::domain::summary::RunSummary;
use tradeledger::ports::ledger_port::LedgerPort;
use tradeledger::ports::signal_port::SignalPort;
use tradeledger::ports::store_port::StorePort;
use tradeledger::ports::summary_port::SummaryPort;

pub struct MockSignalPort {
    pub records: Vec<SignalRecord>,
    pub missing: bool,
    pub loads: Cell<usize>,
}

impl MockSignalPort {
    pub fn new(records: Vec<SignalRecord>) -> Self {
        Self {
            records,
            missing: false,
            loads: Cell::new(0),
        }
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::new(vec![])
        }
    }
}

impl SignalPort for MockSignalPort {
    fn load_signals(&self) -> Result<Vec<SignalRecord>, LedgerError> {
        self.loads.set(self.loads.get() + 1);
        if self.missing {
            return Err(LedgerError::MissingInput {
                path: "mock.jsonl".into(),
            });
        }
        Ok(self.records.clone())
    }
}

pub struct MemoryStore {
    pub state: RefCell<PositionStore>,
    pub saves: Cell<usize>,
    pub fail_save: bool,
}

impl MemoryStore {
    pub fn new(state: PositionStore) -> Self {
        Self {
            state: RefCell::new(state),
            saves: Cell::new(0),
            fail_save: false,
        }
    }

    pub fn snapshot(&self) -> PositionStore {
        self.state.borrow().clone()
    }
}

impl StorePort for MemoryStore {
    fn load(&self) -> Result<PositionStore, LedgerError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, store: &PositionStore) -> Result<(), LedgerError> {
        if self.fail_save {
            return Err(LedgerError::Persist {
                path: "memory".into(),
                reason: "disk full".into(),
            });
        }
        *self.state.borrow_mut() = store.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// In-memory ledger with the same dedup-by-id behaviour as the file ledger.
pub struct MemoryLedger {
    pub events: RefCell<Vec<Event>>,
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            fail: false,
            calls: Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.events.borrow().iter().map(|e| e.event_id.clone()).collect()
    }
}

impl LedgerPort for MemoryLedger {
    fn append(&self, _asof: NaiveDate, events: &[Event]) -> Result<usize, LedgerError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(LedgerError::LedgerAppend {
                path: "memory".into(),
                reason: "read-only filesystem".into(),
            });
        }
        let mut stored = self.events.borrow_mut();
        let mut written = 0;
        for event in events {
            if stored.iter().any(|e| e.event_id == event.event_id) {
                continue;
            }
            stored.push(event.clone());
            written += 1;
        }
        Ok(written)
    }

    fn read_partition(&self, _asof: NaiveDate) -> Result<Vec<Event>, LedgerError> {
        Ok(self.events.borrow().clone())
    }
}

pub struct MemorySummary {
    pub last: RefCell<Option<RunSummary>>,
}

impl MemorySummary {
    pub fn new() -> Self {
        Self {
            last: RefCell::new(None),
        }
    }

    pub fn get(&self) -> RunSummary {
        self.last.borrow().clone().expect("no summary written")
    }
}

impl SummaryPort for MemorySummary {
    fn write(&self, summary: &RunSummary) -> Result<(), LedgerError> {
        *self.last.borrow_mut() = Some(summary.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A record carrying explicit entry/exit flags and all three levels.
pub fn signal(ticker: &str, close: f64, entry: bool, exit: bool) -> SignalRecord {
    SignalRecord {
        ticker: Some(ticker.to_string()),
        metrics: SignalMetrics {
            close: Some(close),
            prev20_high: Some(close - 50.0),
            prev10_low: Some(close + 100.0),
            ..SignalMetrics::default()
        },
        signal_entry: Some(entry),
        exit: Some(exit),
        ..SignalRecord::default()
    }
}

/// One JSONL line for a signal file.
pub fn signal_line(ticker: &str, close: f64, entry: bool, exit: bool) -> String {
    format!(
        r#"{{"ticker":"{ticker}","signal_entry":{entry},"exit":{exit},"metrics":{{"close":{close},"prev20_high":{},"prev10_low":{}}}}}"#,
        close - 50.0,
        close + 100.0
    )
}

/// Paths for a run rooted in a temp directory.
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn signals(&self) -> PathBuf {
        self.root.join("out/daily.jsonl")
    }

    pub fn positions(&self) -> PathBuf {
        self.root.join("data/state/positions.json")
    }

    pub fn ledger_dir(&self) -> PathBuf {
        self.root.join("data/state/ledger")
    }

    pub fn events_out(&self) -> PathBuf {
        self.root.join("out/events.json")
    }

    pub fn write_signals(&self, lines: &[String]) {
        let path = self.signals();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(path, text).unwrap();
    }

    pub fn run_config(&self, asof: NaiveDate) -> tradeledger::cli::RunConfig {
        tradeledger::cli::RunConfig {
            asof,
            signals: self.signals(),
            positions: self.positions(),
            ledger_dir: self.ledger_dir(),
            events_out: self.events_out(),
            default_qty: 200,
            run_url: "https://ci.example/run/1".into(),
            strict: false,
        }
    }

    pub fn read_summary(&self) -> RunSummary {
        serde_json::from_str(&std::fs::read_to_string(self.events_out()).unwrap()).unwrap()
    }

    pub fn read_store(&self) -> PositionStore {
        serde_json::from_str(&std::fs::read_to_string(self.positions()).unwrap()).unwrap()
    }

    pub fn ledger_file(&self, year: i32, month: u32) -> PathBuf {
        self.ledger_dir()
            .join(format!("ledger-{year:04}-{month:02}.jsonl"))
    }
}
