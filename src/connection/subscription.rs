//! Provider event subscription handle.

use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::provider::{GatewayError, ProviderEvent, ProviderEventKind, ProviderGateway};

/// Listeners registered with the provider plus the task draining them.
///
/// Dropping the handle stops the task; `teardown` also removes the
/// provider-side listeners.
pub struct EventSubscription {
    task: JoinHandle<()>,
}

impl EventSubscription {
    /// Register for both event kinds and start delivering events to `handler`.
    ///
    /// `handler` returns `None` once its target is gone, which ends the task.
    pub fn start<F, Fut>(gateway: &ProviderGateway, handler: F) -> Result<Self, GatewayError>
    where
        F: Fn(ProviderEvent) -> Option<Fut> + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for kind in ProviderEventKind::ALL {
            gateway.subscribe(kind, tx.clone())?;
        }

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match handler(event) {
                    Some(fut) => fut.await,
                    None => break,
                }
            }
            tracing::debug!("Wallet event loop finished");
        });

        Ok(Self { task })
    }

    /// Remove provider listeners and stop the drain task.
    pub fn teardown(self, gateway: &ProviderGateway) {
        for kind in ProviderEventKind::ALL {
            if let Err(e) = gateway.unsubscribe_all(kind) {
                tracing::debug!(event = kind.as_str(), error = %e, "Could not remove provider listeners");
            }
        }
        self.task.abort();
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
