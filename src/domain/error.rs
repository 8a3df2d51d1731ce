//! Domain error types.
//!
//! Only fatal conditions live here. Recoverable field gaps are carried as
//! notes next to the decision they affect (see [`crate::domain::deriver`]).

/// Top-level error type for tradeledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("signal feed not found: {path}")]
    MissingInput { path: String },

    #[error("{field} missing for {ticker}")]
    MissingField { ticker: String, field: String },

    #[error("signal feed parse error at line {line}: {reason}")]
    SignalParse { line: usize, reason: String },

    #[error("position store {path} is unreadable: {reason}")]
    StoreCorrupt { path: String, reason: String },

    #[error("failed to append ledger {path}: {reason}")]
    LedgerAppend { path: String, reason: String },

    #[error("failed to persist {path}: {reason}")]
    Persist { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn missing_field(ticker: &str, field: &str) -> Self {
        LedgerError::MissingField {
            ticker: ticker.to_string(),
            field: field.to_string(),
        }
    }
}

/// Every fatal condition exits with status 2.
impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err {
            LedgerError::MissingInput { .. }
            | LedgerError::MissingField { .. }
            | LedgerError::SignalParse { .. }
            | LedgerError::StoreCorrupt { .. }
            | LedgerError::LedgerAppend { .. }
            | LedgerError::Persist { .. }
            | LedgerError::ConfigParse { .. }
            | LedgerError::ConfigMissing { .. }
            | LedgerError::ConfigInvalid { .. }
            | LedgerError::Io(_) => 2,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_ticker() {
        let err = LedgerError::missing_field("7203.T", "metrics.close");
        assert_eq!(err.to_string(), "metrics.close missing for 7203.T");
    }

    #[test]
    fn signal_parse_message_names_line() {
        let err = LedgerError::SignalParse {
            line: 3,
            reason: "expected value".into(),
        };
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }
}
