//! Provider error classification rules.

use crate::errors::{ErrorKind, WalletError};
use crate::provider::{GatewayError, ProviderError};

/// EIP-1193 "user rejected request".
pub const CODE_USER_REJECTED: i64 = 4001;
/// `wallet_switchEthereumChain`: chain has not been added to the wallet.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC internal error.
pub const CODE_INTERNAL_ERROR: i64 = -32603;

/// Maps raw provider failures onto the stable `ErrorKind` taxonomy.
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &ProviderError) -> ErrorKind;

    /// Classify any gateway failure into a `WalletError`, keeping the raw message.
    fn to_wallet_error(&self, error: &GatewayError) -> WalletError {
        match error {
            GatewayError::Unavailable => WalletError::provider_unavailable(),
            GatewayError::Provider(e) => WalletError::new(self.classify(e), e.code, e.message.clone()),
            GatewayError::InvalidRequest(msg) => {
                WalletError::new(ErrorKind::Unclassified, None, msg.clone())
            }
        }
    }
}

/// Code table first, then case-insensitive message substrings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

const MESSAGE_RULES: &[(&str, ErrorKind)] = &[
    ("insufficient funds", ErrorKind::InsufficientFunds),
    ("user rejected", ErrorKind::UserRejected),
    ("user denied", ErrorKind::UserRejected),
    ("unrecognized chain", ErrorKind::ChainUnknown),
    ("unknown chain", ErrorKind::ChainUnknown),
    ("network error", ErrorKind::NetworkError),
    ("could not detect network", ErrorKind::NetworkError),
    ("gas too high", ErrorKind::GasTooHigh),
    ("max fee per gas", ErrorKind::GasTooHigh),
];

impl ErrorClassifier for DefaultClassifier {
    fn classify(&self, error: &ProviderError) -> ErrorKind {
        match error.code {
            Some(CODE_USER_REJECTED) => return ErrorKind::UserRejected,
            Some(CODE_UNRECOGNIZED_CHAIN) => return ErrorKind::ChainUnknown,
            Some(CODE_INTERNAL_ERROR) => return ErrorKind::InternalProviderError,
            _ => {}
        }

        let message = error.message.to_lowercase();
        MESSAGE_RULES
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, kind)| *kind)
            .unwrap_or(ErrorKind::Unclassified)
    }
}
