//! Wallet connection and transaction state for EIP-1193 wallets.

pub mod bridge;
pub mod config;
pub mod connection;
pub mod errors;
pub mod network;
pub mod observability;
pub mod persistence;
pub mod provider;
pub mod state;
pub mod transaction;

pub use bridge::{BridgeError, WalletBridge};
pub use config::BridgeConfig;
pub use connection::{ConnectionManager, SigningContext};
pub use errors::{ErrorKind, WalletError};
pub use provider::{ProviderGateway, WalletProvider};
pub use state::{ConnectionStatus, StateStore, TransactionState, WalletState};
pub use transaction::{TransactionOrchestrator, TransactionPlan};
