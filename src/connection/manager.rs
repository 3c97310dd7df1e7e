//! Connection lifecycle over the injected wallet.

use alloy::primitives::Address;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::connection::signing::SigningContext;
use crate::connection::subscription::EventSubscription;
use crate::errors::{DefaultClassifier, ErrorClassifier, ErrorKind, WalletError};
use crate::network;
use crate::observability::metrics;
use crate::persistence::DisconnectMarker;
use crate::provider::{GatewayError, ProviderEvent, ProviderGateway};
use crate::state::{format_balance, ConnectionStatus, StateStore, WalletState};

/// Message of the error returned when `connect` overlaps another attempt.
pub const CONNECT_IN_PROGRESS: &str = "connection already in progress";

const CONNECT_INTERRUPTED: &str = "connection interrupted by disconnect";

struct Inner {
    gateway: ProviderGateway,
    store: StateStore,
    marker: Arc<dyn DisconnectMarker>,
    classifier: Arc<dyn ErrorClassifier>,
    subscription: Mutex<Option<EventSubscription>>,
}

/// Owns `WalletState` and drives it through the connection lifecycle.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    pub fn new(gateway: ProviderGateway, store: StateStore, marker: Arc<dyn DisconnectMarker>) -> Self {
        Self::with_classifier(gateway, store, marker, Arc::new(DefaultClassifier))
    }

    pub fn with_classifier(
        gateway: ProviderGateway,
        store: StateStore,
        marker: Arc<dyn DisconnectMarker>,
        classifier: Arc<dyn ErrorClassifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                store,
                marker,
                classifier,
                subscription: Mutex::new(None),
            }),
        }
    }

    pub fn wallet(&self) -> WalletState {
        self.inner.store.wallet()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.store.wallet().status()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.store.wallet().is_connected
    }

    pub fn gateway(&self) -> &ProviderGateway {
        &self.inner.gateway
    }

    pub fn store(&self) -> &StateStore {
        &self.inner.store
    }

    pub(crate) fn classifier(&self) -> &dyn ErrorClassifier {
        self.inner.classifier.as_ref()
    }

    /// Signing context for the connected account, if there is one.
    pub fn signing_context(&self) -> Option<SigningContext> {
        let wallet = self.inner.store.wallet();
        if !wallet.is_connected || !self.inner.gateway.is_available() {
            return None;
        }
        let address = wallet.address?;
        Some(SigningContext::new(address, wallet.network_id, self.inner.gateway.clone()))
    }

    /// Prompt the wallet for access and move to `Connected`.
    ///
    /// Already connected: returns the current snapshot without prompting.
    pub async fn connect(&self) -> Result<WalletState, WalletError> {
        let mut current = None;
        let started = self.inner.store.update_wallet_if(|w| {
            if w.is_connected || w.is_connecting {
                current = Some(w.clone());
                false
            } else {
                w.begin_connecting();
                true
            }
        });

        if !started {
            return match current {
                Some(w) if w.is_connected => Ok(w),
                _ => Err(WalletError::new(ErrorKind::Unclassified, None, CONNECT_IN_PROGRESS)),
            };
        }

        tracing::debug!("Connecting wallet");

        let (address, balance, network_id) = match self.establish().await {
            Ok(session) => session,
            Err(error) => {
                self.inner.store.update_wallet_if(|w| {
                    if !w.is_connecting {
                        return false;
                    }
                    w.apply_failed(error.clone());
                    true
                });
                metrics::record_connection_failure(error.kind);
                tracing::warn!(kind = %error.kind, error = %error.message, "Wallet connection failed");
                return Err(error);
            }
        };

        let applied = self.inner.store.update_wallet_if(|w| {
            if !w.is_connecting {
                return false;
            }
            w.apply_connected(address, balance, network_id);
            true
        });
        if !applied {
            return Err(WalletError::new(ErrorKind::Unclassified, None, CONNECT_INTERRUPTED));
        }

        if let Err(e) = self.inner.marker.clear() {
            tracing::warn!(error = %e, "Failed to clear disconnect marker");
        }
        self.start_events();
        metrics::record_connected(true);

        let wallet = self.wallet();
        tracing::info!(
            address = %address,
            network_id = network_id,
            network = wallet.network_name.as_deref().unwrap_or_default(),
            supported = wallet.is_supported,
            "Wallet connected"
        );
        Ok(wallet)
    }

    async fn establish(&self) -> Result<(Address, String, u64), WalletError> {
        let gateway = &self.inner.gateway;

        let accounts = gateway.request_accounts().await.map_err(|e| self.classify(&e))?;
        let address = accounts.first().copied().ok_or_else(WalletError::no_accounts)?;
        let network_id = gateway.chain_id().await.map_err(|e| self.classify(&e))?;
        let balance = gateway.balance(address).await.map_err(|e| self.classify(&e))?;

        Ok((address, format_balance(balance), network_id))
    }

    /// Return to the initial state and remember that the user opted out.
    pub fn disconnect(&self) {
        self.inner.store.update_wallet(|w| *w = WalletState::default());
        if let Err(e) = self.inner.marker.set() {
            tracing::warn!(error = %e, "Failed to persist disconnect marker");
        }
        self.stop_events();
        metrics::record_connected(false);
        tracing::info!("Wallet disconnected");
    }

    /// Reconnect silently at startup if the wallet already authorized us.
    ///
    /// Returns the connected snapshot, or `None` when nothing was attempted or
    /// the attempt failed.
    pub async fn auto_connect(&self) -> Option<WalletState> {
        if !self.inner.gateway.is_available() {
            tracing::debug!("Auto-connect skipped: no provider");
            return None;
        }

        match self.inner.marker.is_set() {
            Ok(true) => {
                tracing::debug!("Auto-connect skipped: user disconnected");
                return None;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Could not read disconnect marker; skipping auto-connect");
                return None;
            }
        }

        let accounts = match self.inner.gateway.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "Auto-connect failed");
                return None;
            }
        };
        if accounts.is_empty() {
            return None;
        }

        match self.connect().await {
            Ok(wallet) => Some(wallet),
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e.message, "Auto-connect failed");
                None
            }
        }
    }

    /// Apply an `accountsChanged` event.
    pub async fn handle_accounts_changed(&self, accounts: Vec<Address>) {
        if !self.is_connected() {
            tracing::debug!("Ignoring accountsChanged while not connected");
            return;
        }

        let Some(&address) = accounts.first() else {
            // Revocation is not a manual disconnect: the marker stays as is.
            self.stop_events();
            self.inner.store.update_wallet(|w| *w = WalletState::default());
            metrics::record_connected(false);
            tracing::info!("Wallet access revoked");
            return;
        };

        let balance = match self.inner.gateway.balance(address).await {
            Ok(b) => format_balance(b),
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Failed to refresh account");
                return;
            }
        };

        let updated = self.inner.store.update_wallet_if(|w| {
            if !w.is_connected {
                return false;
            }
            w.address = Some(address);
            w.balance = balance;
            w.error = None;
            true
        });
        if updated {
            tracing::info!(address = %address, "Active account changed");
        }
    }

    /// Apply a `chainChanged` event.
    pub async fn handle_chain_changed(&self, chain_id: &str) {
        let Some(network_id) = network::parse_chain_id(chain_id) else {
            tracing::warn!(chain_id = %chain_id, "Ignoring malformed chain id");
            return;
        };

        let wallet = self.wallet();
        let Some(address) = wallet.address.filter(|_| wallet.is_connected) else {
            tracing::debug!("Ignoring chainChanged while not connected");
            return;
        };

        let balance = match self.inner.gateway.balance(address).await {
            Ok(b) => format_balance(b),
            Err(e) => {
                tracing::warn!(network_id = network_id, error = %e, "Failed to refresh network");
                return;
            }
        };

        let updated = self.inner.store.update_wallet_if(|w| {
            if !w.is_connected {
                return false;
            }
            w.set_network(network_id);
            if w.address == Some(address) {
                w.balance = balance;
            }
            w.error = None;
            true
        });
        if updated {
            tracing::info!(
                network_id = network_id,
                supported = network::is_supported(network_id),
                "Network changed"
            );
        }
    }

    /// Ask the wallet to switch chains, registering the chain first if the
    /// wallet does not know it.
    pub async fn switch_network(&self, network_id: u64) -> Result<(), WalletError> {
        if self.inner.store.transaction().is_pending {
            tracing::warn!(
                network_id = network_id,
                "Switching network while a transaction is pending"
            );
        }

        let gateway = &self.inner.gateway;
        let error = match gateway.switch_chain(network_id).await {
            Ok(()) => {
                tracing::info!(network_id = network_id, "Network switch requested");
                return Ok(());
            }
            Err(e) => self.classify(&e),
        };

        if error.kind != ErrorKind::ChainUnknown || !network::is_supported(network_id) {
            tracing::warn!(network_id = network_id, kind = %error.kind, error = %error.message, "Network switch failed");
            return Err(error);
        }

        let descriptor = network::lookup(network_id);
        tracing::info!(network_id = network_id, name = descriptor.name, "Chain unknown to wallet, adding it");
        gateway
            .add_chain(&descriptor)
            .await
            .map_err(|e| self.classify(&e))
    }

    async fn dispatch(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.handle_accounts_changed(accounts).await,
            ProviderEvent::ChainChanged(chain_id) => self.handle_chain_changed(&chain_id).await,
        }
    }

    fn start_events(&self) {
        self.stop_events();

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let started = EventSubscription::start(&self.inner.gateway, move |event| {
            let inner = weak.upgrade()?;
            Some(async move { ConnectionManager { inner }.dispatch(event).await })
        });

        match started {
            Ok(subscription) => *self.subscription_slot() = Some(subscription),
            Err(e) => tracing::warn!(error = %e, "Could not subscribe to wallet events"),
        }
    }

    fn stop_events(&self) {
        let subscription = self.subscription_slot().take();
        if let Some(subscription) = subscription {
            subscription.teardown(&self.inner.gateway);
            tracing::debug!("Wallet event subscription removed");
        }
    }

    fn subscription_slot(&self) -> std::sync::MutexGuard<'_, Option<EventSubscription>> {
        self.inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn classify(&self, error: &GatewayError) -> WalletError {
        self.inner.classifier.to_wallet_error(error)
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("status", &self.status())
            .field("gateway", &self.inner.gateway)
            .finish()
    }
}
