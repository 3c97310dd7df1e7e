//! Error taxonomy and classification.
//!
//! # Data Flow
//! ```text
//! provider failure (code + raw message)
//!     → classifier.rs (numeric codes, then message substrings)
//!     → WalletError { kind, code, message }
//!     → recorded in WalletState / TransactionState and returned to the caller
//! ```
//!
//! # Design Decisions
//! - Callers only ever see `ErrorKind`; matching rules live behind `ErrorClassifier`
//! - The raw provider message is kept verbatim next to the derived kind

pub mod classifier;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use classifier::{DefaultClassifier, ErrorClassifier};

/// Stable error categories exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ProviderUnavailable,
    NoAccounts,
    UserRejected,
    ChainUnknown,
    InsufficientFunds,
    NetworkError,
    GasTooHigh,
    InternalProviderError,
    WalletNotConnected,
    Unclassified,
}

impl ErrorKind {
    /// Fixed user-facing text, or `None` when the raw message should be shown.
    pub fn user_text(self) -> Option<&'static str> {
        match self {
            ErrorKind::ProviderUnavailable => {
                Some("No wallet provider found. Please install a wallet to continue.")
            }
            ErrorKind::NoAccounts => Some("No accounts found. Please check your wallet connection."),
            ErrorKind::UserRejected => Some("Transaction rejected by user"),
            ErrorKind::ChainUnknown => Some("This network is not configured in your wallet."),
            ErrorKind::InsufficientFunds => Some("You don't have enough balance in your wallet."),
            ErrorKind::NetworkError => {
                Some("Network error. Please check your connection and try again.")
            }
            ErrorKind::GasTooHigh => Some("Transaction fee is too high. Please try again later."),
            ErrorKind::InternalProviderError => Some("Internal JSON-RPC error"),
            ErrorKind::WalletNotConnected => Some("Wallet not connected"),
            ErrorKind::Unclassified => None,
        }
    }

    /// Short label used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::NoAccounts => "no_accounts",
            ErrorKind::UserRejected => "user_rejected",
            ErrorKind::ChainUnknown => "chain_unknown",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::GasTooHigh => "gas_too_high",
            ErrorKind::InternalProviderError => "internal_provider_error",
            ErrorKind::WalletNotConnected => "wallet_not_connected",
            ErrorKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure, as recorded in state and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct WalletError {
    pub kind: ErrorKind,
    /// Numeric provider code, when the provider reported one.
    pub code: Option<i64>,
    /// Raw message, verbatim.
    pub message: String,
}

impl WalletError {
    pub fn new(kind: ErrorKind, code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Error for a kind that has no provider message of its own.
    pub fn of_kind(kind: ErrorKind) -> Self {
        let message = kind.user_text().unwrap_or("Unknown error");
        Self::new(kind, None, message)
    }

    pub fn provider_unavailable() -> Self {
        Self::of_kind(ErrorKind::ProviderUnavailable)
    }

    pub fn no_accounts() -> Self {
        Self::of_kind(ErrorKind::NoAccounts)
    }

    pub fn wallet_not_connected() -> Self {
        Self::of_kind(ErrorKind::WalletNotConnected)
    }

    /// Text suitable for showing to the user.
    pub fn user_message(&self) -> &str {
        self.kind.user_text().unwrap_or(self.message.as_str())
    }
}
