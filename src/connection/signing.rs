//! Signing context handed to transaction builders.

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;

use crate::provider::{GatewayError, PendingTx, ProviderGateway};

/// The connected account, able to submit transactions through the wallet.
///
/// Only obtainable while the wallet is connected.
#[derive(Debug, Clone)]
pub struct SigningContext {
    address: Address,
    network_id: Option<u64>,
    gateway: ProviderGateway,
}

impl SigningContext {
    pub(crate) fn new(address: Address, network_id: Option<u64>, gateway: ProviderGateway) -> Self {
        Self {
            address,
            network_id,
            gateway,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn network_id(&self) -> Option<u64> {
        self.network_id
    }

    /// Submit `request` from the connected account.
    pub async fn send_transaction(&self, request: TransactionRequest) -> Result<PendingTx, GatewayError> {
        self.gateway
            .send_transaction(request.with_from(self.address))
            .await
    }
}
