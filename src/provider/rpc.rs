//! EIP-1193 wallet reached over JSON-RPC.
//!
//! # Responsibilities
//! - Forward wallet requests (`eth_requestAccounts`, `wallet_switchEthereumChain`, ...)
//!   to a wallet endpoint such as Frame or a local signer
//! - Turn submitted hashes into pending transactions that poll for receipts
//! - Surface `accountsChanged` / `chainChanged` through the event watcher

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::client::{ClientBuilder, RpcClient};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::RpcError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokio::time::interval;

use crate::network::AddChainParams;
use crate::provider::error::ProviderError;
use crate::provider::gateway::{
    EventSink, PendingTransaction, PendingTx, ProviderEventKind, Receipt, WalletProvider,
};
use crate::provider::watcher::EventWatcher;

const DEFAULT_EVENT_POLL: Duration = Duration::from_millis(1000);
const DEFAULT_RECEIPT_POLL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwitchChainParams {
    chain_id: String,
}

/// Wallet provider backed by a JSON-RPC endpoint.
pub struct JsonRpcWallet {
    client: RpcClient,
    endpoint: String,
    receipt_poll_interval: Duration,
    watcher: EventWatcher,
}

impl JsonRpcWallet {
    /// Create a wallet client for `endpoint`.
    ///
    /// No request is made until the first call.
    pub fn new(endpoint: &str) -> Result<Self, ProviderError> {
        let url: url::Url = endpoint.parse().map_err(|e| {
            ProviderError::new(None, format!("Invalid wallet endpoint '{}': {}", endpoint, e))
        })?;
        let client = ClientBuilder::default().http(url);
        let watcher = EventWatcher::new(client.clone(), DEFAULT_EVENT_POLL);

        tracing::info!(endpoint = %endpoint, "Wallet RPC client initialized");

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            receipt_poll_interval: DEFAULT_RECEIPT_POLL,
            watcher,
        })
    }

    /// How often `accountsChanged` / `chainChanged` are checked.
    pub fn with_event_poll_interval(mut self, poll: Duration) -> Self {
        self.watcher = EventWatcher::new(self.client.clone(), poll);
        self
    }

    /// How often a pending transaction checks for its receipt.
    pub fn with_receipt_poll_interval(mut self, poll: Duration) -> Self {
        self.receipt_poll_interval = poll;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.client.request_noparams("eth_requestAccounts").await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.client.request_noparams("eth_accounts").await?)
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        Ok(self.client.request_noparams("eth_chainId").await?)
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        Ok(self.client.request("eth_getBalance", (address, "latest")).await?)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, ProviderError> {
        let hash: TxHash = self.client.request("eth_sendTransaction", (request,)).await?;
        tracing::debug!(tx_hash = %hash, "Transaction accepted by wallet");

        Ok(Box::new(RpcPendingTransaction {
            client: self.client.clone(),
            hash,
            hash_display: hash.to_string(),
            poll_interval: self.receipt_poll_interval,
        }))
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        let params = SwitchChainParams {
            chain_id: chain_id.to_string(),
        };
        let _: serde_json::Value = self
            .client
            .request("wallet_switchEthereumChain", (params,))
            .await?;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .client
            .request("wallet_addEthereumChain", (params.clone(),))
            .await?;
        Ok(())
    }

    fn subscribe(&self, kind: ProviderEventKind, sink: EventSink) {
        self.watcher.subscribe(kind, sink);
    }

    fn unsubscribe_all(&self, kind: ProviderEventKind) {
        self.watcher.unsubscribe_all(kind);
    }
}

/// Transaction submitted through `eth_sendTransaction`, resolved by polling.
struct RpcPendingTransaction {
    client: RpcClient,
    hash: TxHash,
    hash_display: String,
    poll_interval: Duration,
}

#[async_trait]
impl PendingTransaction for RpcPendingTransaction {
    fn hash(&self) -> &str {
        &self.hash_display
    }

    async fn wait(self: Box<Self>) -> Result<Receipt, ProviderError> {
        let mut ticker = interval(self.poll_interval);

        loop {
            ticker.tick().await;

            let receipt: Option<TransactionReceipt> = match self
                .client
                .request("eth_getTransactionReceipt", (self.hash,))
                .await
            {
                Ok(r) => r,
                Err(e @ RpcError::ErrorResp(_)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(tx_hash = %self.hash, error = %e, "Receipt poll failed, retrying");
                    continue;
                }
            };

            let Some(receipt) = receipt else {
                tracing::debug!(tx_hash = %self.hash, "Transaction pending");
                continue;
            };

            if !receipt.status() {
                return Err(ProviderError::new(None, "transaction reverted"));
            }

            return Ok(Receipt {
                transaction_hash: receipt.transaction_hash.to_string(),
                block_number: receipt.block_number,
                status: true,
            });
        }
    }
}
