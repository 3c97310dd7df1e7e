//! Metrics collection.
//!
//! # Metrics
//! - `wallet_connected` (gauge): 1 while a wallet is connected, else 0
//! - `wallet_connection_failures_total` (counter): failed connects by error kind
//! - `wallet_transactions_total` (counter): finished attempts by kind and outcome
//!
//! # Design Decisions
//! - Thin wrappers over the `metrics` facade so call sites stay one line
//! - Labels are static strings or short error-kind labels

use crate::errors::ErrorKind;

/// Outcome label of a transaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    Success,
    Failure,
}

impl TxOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TxOutcome::Success => "success",
            TxOutcome::Failure => "failure",
        }
    }
}

pub fn record_connected(connected: bool) {
    ::metrics::gauge!("wallet_connected").set(if connected { 1.0 } else { 0.0 });
}

pub fn record_connection_failure(kind: ErrorKind) {
    ::metrics::counter!("wallet_connection_failures_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_transaction(kind: &str, outcome: TxOutcome) {
    ::metrics::counter!(
        "wallet_transactions_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
