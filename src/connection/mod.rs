//! Wallet connection state machine.
//!
//! # Data Flow
//! ```text
//! connect / auto_connect / disconnect / switch_network (callers)
//!     → manager.rs (ConnectionManager: transitions over WalletState)
//!     → ProviderGateway (accounts, chain id, balance)
//!
//! accountsChanged / chainChanged (provider)
//!     → subscription.rs (EventSubscription: channel + drain task)
//!     → manager.rs handlers
//! ```
//!
//! # States
//! `Disconnected → Connecting → Connected | Failed(error)`; `disconnect` and
//! account revocation return to `Disconnected` from anywhere.

pub mod manager;
pub mod signing;
pub mod subscription;

pub use manager::ConnectionManager;
pub use signing::SigningContext;
pub use subscription::EventSubscription;
