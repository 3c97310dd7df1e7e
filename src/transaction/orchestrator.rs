//! Runs transaction attempts and reports their progress.

use std::future::Future;
use tracing::Instrument;
use uuid::Uuid;

use crate::connection::{ConnectionManager, SigningContext};
use crate::errors::WalletError;
use crate::observability::metrics::{self, TxOutcome};
use crate::provider::{GatewayError, PendingTx, Receipt};
use crate::state::TransactionState;
use crate::transaction::plan::TransactionPlan;

/// Pending message once the wallet has accepted the transaction.
pub const SUBMITTED_MESSAGE: &str = "Transaction submitted, awaiting confirmation...";

/// Owns `TransactionState`; submits through the connected wallet.
#[derive(Debug, Clone)]
pub struct TransactionOrchestrator {
    connection: ConnectionManager,
}

impl TransactionOrchestrator {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    pub(crate) fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    /// Run one attempt: Pending, build, submitted, wait, then Success or Failure.
    pub async fn execute_transaction<F, Fut>(&self, plan: TransactionPlan<F>) -> Result<Receipt, WalletError>
    where
        F: FnOnce(SigningContext) -> Fut + Send,
        Fut: Future<Output = Result<PendingTx, GatewayError>> + Send,
    {
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("transaction", attempt_id = %attempt_id, kind = %plan.kind);
        self.run(plan).instrument(span).await
    }

    async fn run<F, Fut>(&self, plan: TransactionPlan<F>) -> Result<Receipt, WalletError>
    where
        F: FnOnce(SigningContext) -> Fut + Send,
        Fut: Future<Output = Result<PendingTx, GatewayError>> + Send,
    {
        let TransactionPlan {
            kind,
            pending_message,
            success_message,
            build,
            on_success,
            on_error,
        } = plan;
        let store = self.connection.store();

        let Some(signer) = self.connection.signing_context() else {
            let error = WalletError::wallet_not_connected();
            store.update_transaction(|t| t.fail(&kind, error.clone()));
            metrics::record_transaction(&kind, TxOutcome::Failure);
            tracing::warn!("Transaction refused: wallet not connected");
            return Err(error);
        };

        store.update_transaction(|t| t.begin(&kind, &pending_message));
        tracing::debug!(from = %signer.address(), "Building transaction");

        let outcome = async {
            let pending = build(signer).await?;
            // Whole Pending shape: a reset may have landed while build was suspended.
            store.update_transaction(|t| t.begin(&kind, SUBMITTED_MESSAGE));
            tracing::info!(tx_hash = %pending.hash(), "Transaction submitted");
            pending.wait().await.map_err(GatewayError::from)
        }
        .await;

        match outcome {
            Ok(receipt) => {
                store.update_transaction(|t| {
                    t.succeed(&kind, &receipt.transaction_hash, &success_message)
                });
                metrics::record_transaction(&kind, TxOutcome::Success);
                tracing::info!(
                    tx_hash = %receipt.transaction_hash,
                    block_number = ?receipt.block_number,
                    "Transaction confirmed"
                );
                if let Some(hook) = on_success {
                    hook(&receipt);
                }
                Ok(receipt)
            }
            Err(e) => {
                let error = self.connection.classifier().to_wallet_error(&e);
                store.update_transaction(|t| t.fail(&kind, error.clone()));
                metrics::record_transaction(&kind, TxOutcome::Failure);
                tracing::warn!(kind = %error.kind, error = %error.message, "Transaction failed");
                if let Some(hook) = on_error {
                    hook(&error);
                }
                Err(error)
            }
        }
    }

    /// Back to idle. An in-flight confirmation keeps running.
    pub fn reset_transaction_state(&self) {
        self.connection
            .store()
            .update_transaction(|t| *t = TransactionState::default());
    }

    pub fn transaction_status(&self) -> TransactionState {
        self.connection.store().transaction()
    }
}
