//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::adapters::jsonl_ledger_adapter::JsonlLedgerAdapter;
use crate::adapters::jsonl_signal_adapter::JsonlSignalAdapter;
use crate::adapters::summary_file_adapter::SummaryFileAdapter;
use crate::domain::config_validation::{parse_asof, validate_default_qty, validate_positions_config};
use crate::domain::error::LedgerError;
use crate::domain::reconcile::{ReconcileConfig, RunOutcome, run_reconcile};
use crate::domain::store::PositionStore;
use crate::domain::transition::DEFAULT_QTY;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;

pub const DEFAULT_SIGNALS: &str = "out/daily.jsonl";
pub const DEFAULT_POSITIONS: &str = "data/state/positions.json";
pub const DEFAULT_LEDGER_DIR: &str = "data/state/ledger";

#[derive(Parser, Debug)]
#[command(name = "tradeledger", about = "Update positions and ledger from daily signals")]
pub struct Cli {
    #[arg(long, global = true, value_enum, ignore_case = true, default_value = "INFO")]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply one as-of date's signals
    Apply(ApplyArgs),
    /// Print the position store
    Status {
        #[arg(long)]
        positions: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ApplyArgs {
    /// Trading date, YYYY-MM-DD
    #[arg(long)]
    pub asof: String,
    #[arg(long)]
    pub signals: Option<PathBuf>,
    #[arg(long)]
    pub positions: Option<PathBuf>,
    #[arg(long)]
    pub ledger_dir: Option<PathBuf>,
    /// Where the run summary JSON is written
    #[arg(long)]
    pub events_out: Option<PathBuf>,
    #[arg(long)]
    pub default_qty: Option<i64>,
    /// CI run URL recorded on every event for traceability
    #[arg(long)]
    pub run_url: Option<String>,
    /// Fail on missing required fields instead of inferring them
    #[arg(long)]
    pub strict: bool,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
        }
    }
}

/// Install the stderr log subscriber. A second call is a no-op.
pub fn init_logging(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Fully resolved parameters of one `apply` run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub asof: NaiveDate,
    pub signals: PathBuf,
    pub positions: PathBuf,
    pub ledger_dir: PathBuf,
    pub events_out: PathBuf,
    pub default_qty: i64,
    pub run_url: String,
    pub strict: bool,
}

impl RunConfig {
    pub fn reconcile_config(&self) -> ReconcileConfig {
        ReconcileConfig {
            asof: self.asof,
            default_qty: self.default_qty,
            run_url: self.run_url.clone(),
            strict: self.strict,
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Apply(args) => run_apply(&args),
        Command::Status { positions, config } => run_status(positions.as_ref(), config.as_ref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        error!("{e}");
        ExitCode::from(&e)
    })
}

/// Merge flags over the INI file over built-in defaults, then validate.
pub fn build_run_config(
    args: &ApplyArgs,
    file: Option<&dyn ConfigPort>,
) -> Result<RunConfig, LedgerError> {
    if let Some(file) = file {
        validate_positions_config(file)?;
    }
    let asof = parse_asof(&args.asof)?;

    let path = |flag: &Option<PathBuf>, key: &str| -> Option<PathBuf> {
        flag.clone()
            .or_else(|| file.and_then(|f| f.get_string("paths", key)).map(PathBuf::from))
    };

    let events_out = path(&args.events_out, "events_out").ok_or_else(|| {
        LedgerError::ConfigMissing {
            section: "paths".into(),
            key: "events_out".into(),
        }
    })?;

    let default_qty = match args.default_qty {
        Some(qty) => qty,
        None => file
            .and_then(|f| f.get_int("positions", "default_qty"))
            .and_then(Result::ok)
            .unwrap_or(DEFAULT_QTY),
    };
    validate_default_qty(default_qty)?;

    let strict = args.strict
        || file
            .and_then(|f| f.get_bool("positions", "strict"))
            .and_then(Result::ok)
            .unwrap_or(false);

    let run_url = args
        .run_url
        .clone()
        .or_else(|| file.and_then(|f| f.get_string("positions", "run_url")))
        .unwrap_or_default();

    Ok(RunConfig {
        asof,
        signals: path(&args.signals, "signals").unwrap_or_else(|| DEFAULT_SIGNALS.into()),
        positions: path(&args.positions, "positions").unwrap_or_else(|| DEFAULT_POSITIONS.into()),
        ledger_dir: path(&args.ledger_dir, "ledger_dir")
            .unwrap_or_else(|| DEFAULT_LEDGER_DIR.into()),
        events_out,
        default_qty,
        run_url,
        strict,
    })
}

/// Wire the file adapters for `config` and run one reconciliation.
pub fn apply(config: &RunConfig) -> Result<RunOutcome, LedgerError> {
    let signals = JsonlSignalAdapter::new(&config.signals);
    let store = JsonStoreAdapter::new(&config.positions);
    let ledger = JsonlLedgerAdapter::new(&config.ledger_dir);
    let summary = SummaryFileAdapter::new(&config.events_out);
    run_reconcile(&config.reconcile_config(), &signals, &store, &ledger, &summary)
}

fn run_apply(args: &ApplyArgs) -> ExitCode {
    let file = match args.config.as_deref().map(load_config).transpose() {
        Ok(f) => f,
        Err(code) => return code,
    };

    let config = match build_run_config(args, file.as_ref().map(|f| f as &dyn ConfigPort)) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };
    info!(
        asof = %config.asof,
        strict = config.strict,
        signals = %config.signals.display(),
        "starting run"
    );

    match apply(&config) {
        Ok(outcome) => {
            let s = outcome.summary();
            info!(
                "Entries: {}, exits: {}{}",
                s.counts.entries,
                s.counts.exits,
                if outcome.is_skipped() { " (skipped)" } else { "" }
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Human-readable dump of the store, one position per line.
pub fn render_status(store: &PositionStore) -> String {
    let mut out = String::new();
    let last = store.asof_last_applied.as_deref().unwrap_or("never");
    let _ = writeln!(out, "last applied: {last}");
    let _ = writeln!(
        out,
        "positions: {} ({} open)",
        store.positions.len(),
        store.open_count()
    );
    for (ticker, pos) in &store.positions {
        let _ = writeln!(
            out,
            "  {:<10} {:<6} qty={:>6} last={:.2} @ {}",
            ticker, pos.status, pos.qty, pos.last_price, pos.last_update
        );
    }
    out
}

fn run_status(positions: Option<&PathBuf>, config_path: Option<&PathBuf>) -> ExitCode {
    let file = match config_path.map(|p| load_config(p)).transpose() {
        Ok(f) => f,
        Err(code) => return code,
    };
    let path = positions
        .cloned()
        .or_else(|| {
            file.as_ref()
                .and_then(|f| f.get_string("paths", "positions"))
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_POSITIONS));

    match JsonStoreAdapter::new(&path).load() {
        Ok(store) => {
            print!("{}", render_status(&store));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}
