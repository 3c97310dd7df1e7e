//! Polling watcher that turns wallet state changes into provider events.

use alloy::primitives::Address;
use alloy::rpc::client::RpcClient;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::provider::gateway::{EventSink, ProviderEvent, ProviderEventKind};

type Listeners = Arc<DashMap<ProviderEventKind, Vec<EventSink>>>;

/// Emits `accountsChanged` and `chainChanged` for an endpoint that cannot push them.
///
/// The poll task only runs while at least one listener is registered.
pub struct EventWatcher {
    client: RpcClient,
    poll_interval: Duration,
    listeners: Listeners,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EventWatcher {
    pub fn new(client: RpcClient, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
            listeners: Arc::new(DashMap::new()),
            task: Mutex::new(None),
        }
    }

    pub fn subscribe(&self, kind: ProviderEventKind, sink: EventSink) {
        self.listeners.entry(kind).or_default().push(sink);
        self.ensure_running();
    }

    pub fn unsubscribe_all(&self, kind: ProviderEventKind) {
        self.listeners.remove(&kind);
        if self.listeners.iter().all(|entry| entry.value().is_empty()) {
            self.stop();
        }
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.listeners.get(&kind).map(|l| l.len()).unwrap_or(0)
    }

    fn ensure_running(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime; wallet events will not be delivered");
            return;
        };

        tracing::debug!(poll_ms = self.poll_interval.as_millis() as u64, "Starting wallet event watcher");
        *task = Some(runtime.spawn(run(
            self.client.clone(),
            self.listeners.clone(),
            self.poll_interval,
        )));
    }

    fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
            tracing::debug!("Wallet event watcher stopped");
        }
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(client: RpcClient, listeners: Listeners, poll_interval: Duration) {
    let mut ticker = interval(poll_interval);
    let mut last_accounts: Option<Vec<Address>> = None;
    let mut last_chain: Option<String> = None;

    loop {
        ticker.tick().await;

        match client.request_noparams::<Vec<Address>>("eth_accounts").await {
            Ok(accounts) => {
                if last_accounts.as_ref().is_some_and(|prev| *prev != accounts) {
                    emit(&listeners, ProviderEvent::AccountsChanged(accounts.clone()));
                }
                last_accounts = Some(accounts);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to poll wallet accounts"),
        }

        match client.request_noparams::<String>("eth_chainId").await {
            Ok(chain) => {
                if last_chain.as_ref().is_some_and(|prev| *prev != chain) {
                    emit(&listeners, ProviderEvent::ChainChanged(chain.clone()));
                }
                last_chain = Some(chain);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to poll wallet chain id"),
        }
    }
}

/// Deliver to every listener of the event's kind, dropping closed sinks.
fn emit(listeners: &DashMap<ProviderEventKind, Vec<EventSink>>, event: ProviderEvent) {
    tracing::debug!(event = event.kind().as_str(), "Wallet event observed");
    if let Some(mut sinks) = listeners.get_mut(&event.kind()) {
        sinks.retain(|sink| sink.send(event.clone()).is_ok());
    }
}
