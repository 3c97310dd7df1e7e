//! Transaction attempt state.

use serde::Serialize;

use crate::errors::WalletError;

/// Phase of the most recent transaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionPhase {
    Idle,
    Pending,
    Success,
    Failure,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    pub is_pending: bool,
    pub is_success: bool,
    pub is_error: bool,
    pub tx_hash: Option<String>,
    pub message: Option<String>,
    pub error: Option<WalletError>,
    /// Free-form tag: "transfer", "mint", "approve", ...
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionState {
    pub fn phase(&self) -> TransactionPhase {
        if self.is_pending {
            TransactionPhase::Pending
        } else if self.is_success {
            TransactionPhase::Success
        } else if self.is_error {
            TransactionPhase::Failure
        } else {
            TransactionPhase::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == TransactionPhase::Idle
    }

    /// Enter Pending, discarding whatever the previous attempt left behind.
    pub(crate) fn begin(&mut self, kind: &str, message: &str) {
        *self = Self {
            is_pending: true,
            message: Some(message.to_string()),
            kind: Some(kind.to_string()),
            ..Self::default()
        };
    }

    pub(crate) fn succeed(&mut self, kind: &str, tx_hash: &str, message: &str) {
        self.is_pending = false;
        self.is_success = true;
        self.is_error = false;
        self.tx_hash = Some(tx_hash.to_string());
        self.message = Some(message.to_string());
        self.error = None;
        self.kind = Some(kind.to_string());
    }

    pub(crate) fn fail(&mut self, kind: &str, error: WalletError) {
        self.is_pending = false;
        self.is_success = false;
        self.is_error = true;
        self.tx_hash = None;
        self.message = Some(error.user_message().to_string());
        self.error = Some(error);
        self.kind = Some(kind.to_string());
    }
}
