//! Wallet connection state.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::errors::WalletError;
use crate::network;

/// Connection status derived from `WalletState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Failed(WalletError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub is_connected: bool,
    pub is_connecting: bool,
    pub address: Option<Address>,
    /// Balance in ether, as a decimal string.
    pub balance: String,
    pub network_id: Option<u64>,
    pub network_name: Option<String>,
    pub is_supported: bool,
    pub error: Option<WalletError>,
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            is_connected: false,
            is_connecting: false,
            address: None,
            balance: "0".to_string(),
            network_id: None,
            network_name: None,
            is_supported: false,
            error: None,
        }
    }
}

impl WalletState {
    pub fn status(&self) -> ConnectionStatus {
        if self.is_connected {
            ConnectionStatus::Connected
        } else if self.is_connecting {
            ConnectionStatus::Connecting
        } else if let Some(error) = &self.error {
            ConnectionStatus::Failed(error.clone())
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// Set the network and re-derive everything that depends on it.
    pub fn set_network(&mut self, network_id: u64) {
        self.network_id = Some(network_id);
        self.network_name = Some(network::lookup(network_id).name.to_string());
        self.is_supported = network::is_supported(network_id);
    }

    pub(crate) fn begin_connecting(&mut self) {
        self.is_connecting = true;
        self.error = None;
    }

    pub(crate) fn apply_connected(&mut self, address: Address, balance: String, network_id: u64) {
        self.is_connecting = false;
        self.is_connected = true;
        self.address = Some(address);
        self.balance = balance;
        self.set_network(network_id);
        self.error = None;
    }

    pub(crate) fn apply_failed(&mut self, error: WalletError) {
        self.is_connecting = false;
        self.is_connected = false;
        self.error = Some(error);
    }
}

/// Render a wei amount as an ether decimal string ("1.5", "3.0").
///
/// Trailing zeros are trimmed down to one fractional digit.
pub fn format_balance(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            let frac = if frac.is_empty() { "0" } else { frac };
            format!("{}.{}", whole, frac)
        }
        None => format!("{}.0", formatted),
    }
}
