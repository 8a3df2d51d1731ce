//! Signal records produced by the upstream technical screen.
//!
//! One record per ticker per line of the feed. Every field is optional at
//! the type level; the deriver decides which gaps are fatal and which are
//! recoverable.

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Price metrics attached to a signal record.
///
/// Only the three levels the engine reads are typed. Any other metric the
/// screen emits is kept in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalMetrics {
    #[serde(default)]
    pub close: Option<f64>,
    /// Prior 20-day high, the entry reference level.
    #[serde(default)]
    pub prev20_high: Option<f64>,
    /// Prior 10-day low, the exit reference level.
    #[serde(default)]
    pub prev10_low: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SignalRecord {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: SignalMetrics,
    #[serde(default)]
    pub signal_entry: Option<bool>,
    #[serde(default)]
    pub exit: Option<bool>,
    #[serde(default)]
    pub regime_ok: Option<bool>,
    #[serde(default)]
    pub setup_ok: Option<bool>,
    #[serde(default)]
    pub entry_ok: Option<bool>,
}

impl SignalRecord {
    /// The ticker, if present and non-blank.
    pub fn ticker(&self) -> Option<&str> {
        self.ticker
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Parse one line of the feed. Bare `NaN`/`Infinity` values, as written
    /// for short-history tickers, read as `null`.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&null_non_finite(line))
    }
}

const NON_FINITE: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Rewrite non-finite number tokens outside string literals to `null`.
fn null_non_finite(line: &str) -> Cow<'_, str> {
    if !NON_FINITE.iter().any(|t| line.contains(t)) {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
