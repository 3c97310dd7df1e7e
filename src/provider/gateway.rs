//! Capability surface of the injected wallet and the gateway in front of it.

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::network::{self, AddChainParams, NetworkDescriptor};
use crate::provider::error::{GatewayError, ProviderError};

/// Provider-originated event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    pub const ALL: [ProviderEventKind; 2] =
        [ProviderEventKind::AccountsChanged, ProviderEventKind::ChainChanged];

    /// EIP-1193 event name.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => "accountsChanged",
            ProviderEventKind::ChainChanged => "chainChanged",
        }
    }
}

/// An event emitted by the wallet, outside of any request we made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    /// New chain id, as the provider reported it (usually hex).
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }
}

/// Channel end a provider pushes events into.
pub type EventSink = mpsc::UnboundedSender<ProviderEvent>;

/// Confirmation record of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Hash exactly as the provider reported it.
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    pub status: bool,
}

/// A submitted transaction awaiting inclusion.
#[async_trait]
pub trait PendingTransaction: Send {
    fn hash(&self) -> &str;

    /// Resolve once the transaction is included. No timeout is applied.
    async fn wait(self: Box<Self>) -> Result<Receipt, ProviderError>;
}

pub type PendingTx = Box<dyn PendingTransaction>;

/// The raw capability set offered by an injected wallet.
///
/// Implementations report failures verbatim; classification happens upstream.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts`: may prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_accounts`: already-authorized accounts, never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_chainId`, as reported (hex string).
    async fn chain_id(&self) -> Result<String, ProviderError>;

    /// Balance in wei.
    async fn balance(&self, address: Address) -> Result<U256, ProviderError>;

    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError>;

    fn subscribe(&self, kind: ProviderEventKind, sink: EventSink);

    fn unsubscribe_all(&self, kind: ProviderEventKind);
}

#[async_trait]
impl<T: WalletProvider + ?Sized> WalletProvider for Arc<T> {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        (**self).request_accounts().await
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        (**self).accounts().await
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        (**self).chain_id().await
    }

    async fn balance(&self, address: Address) -> Result<U256, ProviderError> {
        (**self).balance(address).await
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, ProviderError> {
        (**self).send_transaction(request).await
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        (**self).switch_chain(chain_id).await
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        (**self).add_chain(params).await
    }

    fn subscribe(&self, kind: ProviderEventKind, sink: EventSink) {
        (**self).subscribe(kind, sink)
    }

    fn unsubscribe_all(&self, kind: ProviderEventKind) {
        (**self).unsubscribe_all(kind)
    }
}

type ProviderSlot = ArcSwapOption<Box<dyn WalletProvider>>;

/// Handle to the single process-wide provider slot.
///
/// Clones share the slot, so a provider injected (or removed) through one
/// clone is seen by all of them on their next call.
#[derive(Clone)]
pub struct ProviderGateway {
    slot: Arc<ProviderSlot>,
}

impl ProviderGateway {
    /// Gateway with no provider injected.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn with_provider(provider: impl WalletProvider + 'static) -> Self {
        let gateway = Self::new();
        gateway.inject(provider);
        gateway
    }

    /// Install (or replace) the injected provider.
    pub fn inject(&self, provider: impl WalletProvider + 'static) {
        let boxed: Box<dyn WalletProvider> = Box::new(provider);
        self.slot.store(Some(Arc::new(boxed)));
        tracing::debug!("Wallet provider injected");
    }

    /// Remove the injected provider.
    pub fn eject(&self) {
        self.slot.store(None);
        tracing::debug!("Wallet provider removed");
    }

    pub fn is_available(&self) -> bool {
        self.slot.load().is_some()
    }

    fn current(&self) -> Result<Arc<Box<dyn WalletProvider>>, GatewayError> {
        self.slot.load_full().ok_or(GatewayError::Unavailable)
    }

    pub async fn request_accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let provider = self.current()?;
        Ok(provider.request_accounts().await?)
    }

    pub async fn accounts(&self) -> Result<Vec<Address>, GatewayError> {
        let provider = self.current()?;
        Ok(provider.accounts().await?)
    }

    /// Active chain id, parsed from the provider's wire form.
    pub async fn chain_id(&self) -> Result<u64, GatewayError> {
        let provider = self.current()?;
        let raw = provider.chain_id().await?;
        network::parse_chain_id(&raw).ok_or_else(|| {
            GatewayError::Provider(ProviderError::new(
                None,
                format!("Provider returned a malformed chain id: {}", raw),
            ))
        })
    }

    pub async fn balance(&self, address: Address) -> Result<U256, GatewayError> {
        let provider = self.current()?;
        Ok(provider.balance(address).await?)
    }

    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, GatewayError> {
        let provider = self.current()?;
        Ok(provider.send_transaction(request).await?)
    }

    pub async fn switch_chain(&self, network_id: u64) -> Result<(), GatewayError> {
        let provider = self.current()?;
        Ok(provider.switch_chain(&network::chain_id_hex(network_id)).await?)
    }

    pub async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), GatewayError> {
        let provider = self.current()?;
        Ok(provider.add_chain(&AddChainParams::from(network)).await?)
    }

    pub fn subscribe(&self, kind: ProviderEventKind, sink: EventSink) -> Result<(), GatewayError> {
        self.current()?.subscribe(kind, sink);
        Ok(())
    }

    pub fn unsubscribe_all(&self, kind: ProviderEventKind) -> Result<(), GatewayError> {
        self.current()?.unsubscribe_all(kind);
        Ok(())
    }
}

impl Default for ProviderGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderGateway")
            .field("available", &self.is_available())
            .finish()
    }
}
