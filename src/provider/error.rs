//! Raw provider failures.

use alloy::transports::{RpcError, TransportError};
use thiserror::Error;

/// A failure reported by the injected wallet, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// EIP-1193 / JSON-RPC error code, if any.
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self::new(Some(code), message)
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match &err {
            RpcError::ErrorResp(payload) => Self::new(Some(payload.code), payload.message.to_string()),
            _ => Self::new(None, err.to_string()),
        }
    }
}

/// Errors surfaced by `ProviderGateway` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No wallet provider is injected.
    #[error("no wallet provider is injected")]
    Unavailable,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The request could not be formed locally (bad amount, bad address).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
