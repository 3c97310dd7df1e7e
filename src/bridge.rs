//! Wiring of the wallet bridge from configuration.

use std::sync::Arc;
use thiserror::Error;

use crate::config::{BridgeConfig, ConfigError};
use crate::connection::ConnectionManager;
use crate::persistence::{DisconnectMarker, FileMarkerStore, PersistenceError};
use crate::provider::{JsonRpcWallet, ProviderError, ProviderGateway};
use crate::state::{StateStore, TransactionState, WalletState};
use crate::transaction::TransactionOrchestrator;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("wallet provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Connection manager and transaction orchestrator over one provider slot
/// and one state store.
#[derive(Debug, Clone)]
pub struct WalletBridge {
    connection: ConnectionManager,
    transactions: TransactionOrchestrator,
}

impl WalletBridge {
    pub fn new(gateway: ProviderGateway, marker: Arc<dyn DisconnectMarker>) -> Self {
        let connection = ConnectionManager::new(gateway, StateStore::new(), marker);
        let transactions = TransactionOrchestrator::new(connection.clone());
        Self {
            connection,
            transactions,
        }
    }

    /// Build from config: inject the JSON-RPC wallet (if enabled) and open the
    /// state file.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let gateway = ProviderGateway::new();
        if config.provider.enabled {
            let wallet = JsonRpcWallet::new(&config.provider.endpoint)?
                .with_event_poll_interval(config.provider.event_poll_interval())
                .with_receipt_poll_interval(config.provider.receipt_poll_interval());
            gateway.inject(wallet);
        } else {
            tracing::info!("Wallet provider disabled by configuration");
        }

        let marker = FileMarkerStore::open(&config.persistence.state_file)?;
        tracing::debug!(state_file = %marker.path().display(), "Disconnect marker store opened");

        Ok(Self::new(gateway, Arc::new(marker)))
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn transactions(&self) -> &TransactionOrchestrator {
        &self.transactions
    }

    pub fn gateway(&self) -> &ProviderGateway {
        self.connection.gateway()
    }

    pub fn store(&self) -> &StateStore {
        self.connection.store()
    }

    pub fn wallet(&self) -> WalletState {
        self.connection.wallet()
    }

    pub fn transaction(&self) -> TransactionState {
        self.transactions.transaction_status()
    }
}
