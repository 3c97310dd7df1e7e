//! Supported network registry.
//!
//! # Data Flow
//! ```text
//! provider chain id (hex string)
//!     → parse_chain_id
//!     → registry.rs lookup / is_supported
//!     → WalletState { network_id, network_name, is_supported }
//! ```
//!
//! # Design Decisions
//! - The table is static and immutable; there is no registration at runtime
//! - Unknown ids never fail, they resolve to a fixed fallback descriptor

pub mod registry;

pub use registry::{
    chain_id_hex, explorer_tx_url, is_supported, lookup, native_symbol, parse_chain_id,
    supported_networks, AddChainParams, NativeCurrency, NetworkDescriptor,
};
