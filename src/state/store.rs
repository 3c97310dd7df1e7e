//! Shared state container.

use std::sync::Arc;
use tokio::sync::watch;

use crate::state::{TransactionState, WalletState};

/// Holds the current `WalletState` and `TransactionState`.
///
/// Clones share the same channels.
#[derive(Clone)]
pub struct StateStore {
    wallet: Arc<watch::Sender<WalletState>>,
    transaction: Arc<watch::Sender<TransactionState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            wallet: Arc::new(watch::Sender::new(WalletState::default())),
            transaction: Arc::new(watch::Sender::new(TransactionState::default())),
        }
    }

    /// Snapshot of the wallet state.
    pub fn wallet(&self) -> WalletState {
        self.wallet.borrow().clone()
    }

    /// Snapshot of the transaction state.
    pub fn transaction(&self) -> TransactionState {
        self.transaction.borrow().clone()
    }

    pub fn watch_wallet(&self) -> watch::Receiver<WalletState> {
        self.wallet.subscribe()
    }

    pub fn watch_transaction(&self) -> watch::Receiver<TransactionState> {
        self.transaction.subscribe()
    }

    pub(crate) fn update_wallet(&self, f: impl FnOnce(&mut WalletState)) {
        self.wallet.send_modify(f);
    }

    /// Apply `f` only if it reports a change; returns whether it did.
    pub(crate) fn update_wallet_if(&self, f: impl FnOnce(&mut WalletState) -> bool) -> bool {
        self.wallet.send_if_modified(f)
    }

    pub(crate) fn update_transaction(&self, f: impl FnOnce(&mut TransactionState)) {
        self.transaction.send_modify(f);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
