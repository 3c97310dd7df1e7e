//! Static network descriptor table.

use serde::Serialize;

/// Native currency metadata for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static metadata describing one blockchain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    /// EIP-155 chain id.
    pub id: u64,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub block_explorer_url: &'static str,
    pub native_currency: NativeCurrency,
}

const ETHER: NativeCurrency = NativeCurrency {
    name: "Ethereum",
    symbol: "ETH",
    decimals: 18,
};

const MATIC: NativeCurrency = NativeCurrency {
    name: "MATIC",
    symbol: "MATIC",
    decimals: 18,
};

const SUPPORTED_NETWORKS: [NetworkDescriptor; 4] = [
    NetworkDescriptor {
        id: 1,
        name: "Ethereum Mainnet",
        rpc_url: "https://mainnet.infura.io/v3/",
        block_explorer_url: "https://etherscan.io/",
        native_currency: ETHER,
    },
    NetworkDescriptor {
        id: 137,
        name: "Polygon Mainnet",
        rpc_url: "https://polygon-rpc.com/",
        block_explorer_url: "https://polygonscan.com/",
        native_currency: MATIC,
    },
    NetworkDescriptor {
        id: 5,
        name: "Goerli Testnet",
        rpc_url: "https://goerli.infura.io/v3/",
        block_explorer_url: "https://goerli.etherscan.io/",
        native_currency: ETHER,
    },
    NetworkDescriptor {
        id: 80001,
        name: "Polygon Mumbai",
        rpc_url: "https://rpc-mumbai.maticvigil.com/",
        block_explorer_url: "https://mumbai.polygonscan.com/",
        native_currency: MATIC,
    },
];

/// Name reported for any network outside the registry.
pub const UNKNOWN_NETWORK_NAME: &str = "Unknown Network";

/// Symbol used in transfer messages when the network is not registered.
const DEFAULT_NATIVE_SYMBOL: &str = "ETH";

fn unknown(network_id: u64) -> NetworkDescriptor {
    NetworkDescriptor {
        id: network_id,
        name: UNKNOWN_NETWORK_NAME,
        rpc_url: "",
        block_explorer_url: "",
        native_currency: NativeCurrency {
            name: "Unknown",
            symbol: "?",
            decimals: 18,
        },
    }
}

fn find(network_id: u64) -> Option<&'static NetworkDescriptor> {
    SUPPORTED_NETWORKS.iter().find(|n| n.id == network_id)
}

/// Look up a network, falling back to the "Unknown Network" descriptor.
pub fn lookup(network_id: u64) -> NetworkDescriptor {
    find(network_id).copied().unwrap_or_else(|| unknown(network_id))
}

/// True iff `network_id` is one of the registered networks.
pub fn is_supported(network_id: u64) -> bool {
    find(network_id).is_some()
}

/// All registered networks, in table order.
pub fn supported_networks() -> &'static [NetworkDescriptor] {
    &SUPPORTED_NETWORKS
}

/// Wire form of a chain id (`0x`-prefixed lowercase hex).
pub fn chain_id_hex(network_id: u64) -> String {
    format!("{:#x}", network_id)
}

/// Parse a chain id as reported by a provider.
///
/// Providers report hex quantities (`"0x89"`), but some emit plain decimals.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// Block explorer link for a transaction on a registered network.
pub fn explorer_tx_url(network_id: u64, tx_hash: &str) -> Option<String> {
    find(network_id).map(|n| format!("{}tx/{}", n.block_explorer_url, tx_hash))
}

/// Native currency symbol shown in transfer messages.
pub fn native_symbol(network_id: Option<u64>) -> &'static str {
    network_id
        .and_then(find)
        .map(|n| n.native_currency.symbol)
        .unwrap_or(DEFAULT_NATIVE_SYMBOL)
}

/// Parameters of a `wallet_addEthereumChain` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

impl From<&NetworkDescriptor> for AddChainParams {
    fn from(network: &NetworkDescriptor) -> Self {
        Self {
            chain_id: chain_id_hex(network.id),
            chain_name: network.name.to_string(),
            rpc_urls: vec![network.rpc_url.to_string()],
            block_explorer_urls: vec![network.block_explorer_url.to_string()],
            native_currency: network.native_currency,
        }
    }
}
