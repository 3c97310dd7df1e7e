//! Observable wallet and transaction state.
//!
//! # Data Flow
//! ```text
//! ConnectionManager ──writes──▶ WalletState ──┐
//!                                             ├─▶ StateStore (watch channels)
//! TransactionOrchestrator ──▶ TransactionState┘        │
//!                                                      ▼
//!                                       snapshots + watch::Receiver
//! ```
//!
//! # Design Decisions
//! - Each transition is one atomic `send_modify` after all awaits complete
//! - Outside the crate, state is read-only

pub mod store;
pub mod transaction;
pub mod wallet;

pub use store::StateStore;
pub use transaction::{TransactionPhase, TransactionState};
pub use wallet::{format_balance, ConnectionStatus, WalletState};
