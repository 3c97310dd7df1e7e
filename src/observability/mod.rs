//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ConnectionManager / TransactionOrchestrator produce:
//!     → logging.rs (structured log events, per-attempt spans)
//!     → metrics.rs (counters, gauges via the `metrics` facade)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - No recorder is installed here; without one, metric calls are no-ops

pub mod logging;
pub mod metrics;
