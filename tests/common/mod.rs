//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{watch, Notify};

use wallet_bridge::network::AddChainParams;
use wallet_bridge::persistence::{DisconnectMarker, MemoryMarker};
use wallet_bridge::provider::{
    EventSink, PendingTransaction, PendingTx, ProviderError, ProviderEvent, ProviderEventKind,
    ProviderGateway, Receipt, WalletProvider,
};
use wallet_bridge::WalletBridge;

pub const ALICE: Address = Address::repeat_byte(0xa1);
pub const BOB: Address = Address::repeat_byte(0xb0);

/// 1.5 ether in wei.
pub fn one_and_half_ether() -> U256 {
    U256::from(1_500_000_000_000_000_000u128)
}

type Observer = Arc<dyn Fn(&'static str) + Send + Sync>;

/// Programmable wallet behaviour.
#[derive(Clone)]
pub struct Script {
    pub accounts: Vec<Address>,
    pub chain_id: String,
    pub balance: U256,
    pub request_accounts_error: Option<ProviderError>,
    pub balance_error: Option<ProviderError>,
    pub switch_error: Option<ProviderError>,
    pub add_chain_error: Option<ProviderError>,
    pub send_error: Option<ProviderError>,
    pub wait_error: Option<ProviderError>,
    pub tx_hash: String,
    pub block_number: Option<u64>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            accounts: vec![ALICE],
            chain_id: "0x1".to_string(),
            balance: one_and_half_ether(),
            request_accounts_error: None,
            balance_error: None,
            switch_error: None,
            add_chain_error: None,
            send_error: None,
            wait_error: None,
            tx_hash: "0xabc".to_string(),
            block_number: Some(17),
        }
    }
}

/// In-memory wallet double that records every call.
#[derive(Default)]
pub struct ScriptedWallet {
    script: Mutex<Script>,
    calls: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<TransactionRequest>>,
    switched: Mutex<Vec<String>>,
    added: Mutex<Vec<AddChainParams>>,
    sinks: Mutex<HashMap<ProviderEventKind, Vec<EventSink>>>,
    observer: Mutex<Option<Observer>>,
    request_gate: Mutex<Option<Arc<Notify>>>,
    wait_gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedWallet {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            ..Self::default()
        })
    }

    pub fn script(&self, f: impl FnOnce(&mut Script)) {
        f(&mut self.script.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| **c == method).count()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn switched(&self) -> Vec<String> {
        self.switched.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<AddChainParams> {
        self.added.lock().unwrap().clone()
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.sinks.lock().unwrap().get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Called with "send" at `send_transaction` and "wait" at receipt wait.
    pub fn set_observer(&self, observer: impl Fn(&'static str) + Send + Sync + 'static) {
        *self.observer.lock().unwrap() = Some(Arc::new(observer));
    }

    /// Hold `eth_requestAccounts` until the returned gate is notified.
    pub fn gate_request_accounts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.request_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold receipt waits until the returned gate is notified.
    pub fn gate_wait(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.wait_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Push an event to every registered listener of its kind.
    pub fn emit(&self, event: ProviderEvent) {
        let mut sinks = self.sinks.lock().unwrap();
        if let Some(list) = sinks.get_mut(&event.kind()) {
            list.retain(|sink| sink.send(event.clone()).is_ok());
        }
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }

    fn observe(&self, point: &'static str) {
        let observer = self.observer.lock().unwrap().clone();
        if let Some(observer) = observer {
            observer(point);
        }
    }

    fn current(&self) -> Script {
        self.script.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_requestAccounts");
        let gate = self.request_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let script = self.current();
        match script.request_accounts_error {
            Some(e) => Err(e),
            None => Ok(script.accounts),
        }
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_accounts");
        Ok(self.current().accounts)
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        self.record("eth_chainId");
        Ok(self.current().chain_id)
    }

    async fn balance(&self, _address: Address) -> Result<U256, ProviderError> {
        self.record("eth_getBalance");
        let script = self.current();
        match script.balance_error {
            Some(e) => Err(e),
            None => Ok(script.balance),
        }
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, ProviderError> {
        self.record("eth_sendTransaction");
        self.observe("send");
        let script = self.current();
        if let Some(e) = script.send_error {
            return Err(e);
        }
        self.sent.lock().unwrap().push(request);

        Ok(Box::new(ScriptedPending {
            hash: script.tx_hash,
            block_number: script.block_number,
            error: script.wait_error,
            observer: self.observer.lock().unwrap().clone(),
            gate: self.wait_gate.lock().unwrap().clone(),
        }))
    }

    async fn switch_chain(&self, chain_id: &str) -> Result<(), ProviderError> {
        self.record("wallet_switchEthereumChain");
        self.switched.lock().unwrap().push(chain_id.to_string());
        match self.current().switch_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), ProviderError> {
        self.record("wallet_addEthereumChain");
        self.added.lock().unwrap().push(params.clone());
        match self.current().add_chain_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn subscribe(&self, kind: ProviderEventKind, sink: EventSink) {
        self.sinks.lock().unwrap().entry(kind).or_default().push(sink);
    }

    fn unsubscribe_all(&self, kind: ProviderEventKind) {
        self.sinks.lock().unwrap().remove(&kind);
    }
}

struct ScriptedPending {
    hash: String,
    block_number: Option<u64>,
    error: Option<ProviderError>,
    observer: Option<Observer>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl PendingTransaction for ScriptedPending {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(self: Box<Self>) -> Result<Receipt, ProviderError> {
        if let Some(observer) = &self.observer {
            observer("wait");
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.error {
            Some(e) => Err(e),
            None => Ok(Receipt {
                transaction_hash: self.hash,
                block_number: self.block_number,
                status: true,
            }),
        }
    }
}

/// Bridge over `wallet` with an in-memory disconnect marker.
pub fn bridge_with(wallet: &Arc<ScriptedWallet>) -> (WalletBridge, Arc<MemoryMarker>) {
    let marker = Arc::new(MemoryMarker::new());
    let bridge = WalletBridge::new(
        ProviderGateway::with_provider(wallet.clone()),
        marker.clone() as Arc<dyn DisconnectMarker>,
    );
    (bridge, marker)
}

/// Bridge with no provider injected.
pub fn bridge_without_provider() -> WalletBridge {
    WalletBridge::new(ProviderGateway::new(), Arc::new(MemoryMarker::new()))
}

/// Wait until `rx` holds a value matching `pred`, failing after a second.
pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, pred: F) -> T
where
    T: Clone,
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(1), rx.wait_for(pred))
        .await
        .expect("timed out waiting for state")
        .expect("state channel closed")
        .clone()
}
