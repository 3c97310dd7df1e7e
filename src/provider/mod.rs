//! Access to the injected wallet provider.
//!
//! # Data Flow
//! ```text
//! ConnectionManager / TransactionOrchestrator
//!     → gateway.rs (ProviderGateway: availability check, chain id parsing)
//!     → dyn WalletProvider (injected: JsonRpcWallet or a test double)
//!     → rpc.rs (JSON-RPC over HTTP) + watcher.rs (polled provider events)
//! ```
//!
//! # Design Decisions
//! - The provider slot is swappable at runtime; every call re-checks it
//! - Providers report failures verbatim as `ProviderError`
//! - Events are delivered over unbounded channels, one sink per subscriber

pub mod error;
pub mod gateway;
pub mod rpc;
pub mod watcher;

pub use error::{GatewayError, ProviderError};
pub use gateway::{
    EventSink, PendingTransaction, PendingTx, ProviderEvent, ProviderEventKind, ProviderGateway,
    Receipt, WalletProvider,
};
pub use rpc::JsonRpcWallet;
