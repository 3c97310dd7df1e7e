//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the wallet bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Wallet provider endpoint settings.
    pub provider: ProviderConfig,

    /// Where the disconnect marker is stored.
    pub persistence: PersistenceConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Inject a provider at startup. When false the bridge starts with an
    /// empty provider slot.
    pub enabled: bool,

    /// JSON-RPC endpoint of the wallet (e.g. Frame on 1248).
    pub endpoint: String,

    /// Poll interval for account and chain changes.
    pub event_poll_interval_ms: u64,

    /// Poll interval for transaction receipts.
    pub receipt_poll_interval_ms: u64,
}

impl ProviderConfig {
    pub fn event_poll_interval(&self) -> Duration {
        Duration::from_millis(self.event_poll_interval_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://127.0.0.1:1248".to_string(),
            event_poll_interval_ms: 1000,
            receipt_poll_interval_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    /// JSON key-value file holding durable session flags.
    pub state_file: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_file: ".wallet-bridge/state.json".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the pretty format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
