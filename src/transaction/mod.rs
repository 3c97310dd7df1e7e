//! Transaction execution with observable progress.
//!
//! # Data Flow
//! ```text
//! caller (send_native_token, mint_nft, ... or a custom TransactionPlan)
//!     → orchestrator.rs (precondition, Pending, build, wait)
//!     → SigningContext → ProviderGateway (eth_sendTransaction)
//!     → PendingTransaction::wait (receipt)
//!     → TransactionState: Success | Failure
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per call, no retry, no timeout
//! - Overlapping attempts share one TransactionState; the last write wins
//! - Failures are recorded in state and also returned to the caller

pub mod actions;
pub mod orchestrator;
pub mod plan;

pub use orchestrator::{TransactionOrchestrator, SUBMITTED_MESSAGE};
pub use plan::TransactionPlan;
