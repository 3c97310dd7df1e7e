//! Ready-made transaction flows.

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::connection::SigningContext;
use crate::errors::WalletError;
use crate::network;
use crate::provider::{GatewayError, Receipt};
use crate::transaction::orchestrator::TransactionOrchestrator;
use crate::transaction::plan::TransactionPlan;

sol! {
    /// Payable ERC-721 style mint.
    function mint() external payable;

    /// ERC-20 allowance grant.
    function approve(address spender, uint256 amount) external returns (bool);
}

fn parse_amount(amount: &str) -> Result<U256, GatewayError> {
    parse_ether(amount.trim())
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid amount '{}': {}", amount, e)))
}

fn call(to: Address, value: U256, input: impl Into<Bytes>) -> TransactionRequest {
    TransactionRequest::default()
        .with_to(to)
        .with_value(value)
        .with_input(input)
}

impl TransactionOrchestrator {
    /// Transfer `amount` (decimal, in ether units) of the native currency.
    pub async fn send_native_token(&self, to: Address, amount: &str) -> Result<Receipt, WalletError> {
        let symbol = network::native_symbol(self.connection().wallet().network_id);
        let amount = amount.to_string();

        let plan = TransactionPlan::new({
            let amount = amount.clone();
            move |signer: SigningContext| async move {
                let value = parse_amount(&amount)?;
                signer
                    .send_transaction(TransactionRequest::default().with_to(to).with_value(value))
                    .await
            }
        })
        .with_kind("transfer")
        .with_pending_message(format!("Sending {} {}...", amount, symbol))
        .with_success_message(format!("Successfully sent {} {}!", amount, symbol));

        self.execute_transaction(plan).await
    }

    /// Call `method` on `contract` with pre-encoded calldata.
    pub async fn contract_interaction(
        &self,
        contract: Address,
        method: &str,
        calldata: Bytes,
        value: U256,
    ) -> Result<Receipt, WalletError> {
        let plan = TransactionPlan::new(move |signer: SigningContext| async move {
            signer.send_transaction(call(contract, value, calldata)).await
        })
        .with_kind("contract")
        .with_pending_message(format!("Executing {}...", method))
        .with_success_message(format!("{} executed successfully!", method));

        self.execute_transaction(plan).await
    }

    /// Call `mint()` on an NFT contract, paying `price` wei.
    pub async fn mint_nft(&self, contract: Address, price: U256) -> Result<Receipt, WalletError> {
        let plan = TransactionPlan::new(move |signer: SigningContext| async move {
            signer
                .send_transaction(call(contract, price, mintCall {}.abi_encode()))
                .await
        })
        .with_kind("mint")
        .with_pending_message("Minting NFT...")
        .with_success_message("NFT Minted Successfully!")
        .on_success(|receipt| {
            tracing::info!(tx_hash = %receipt.transaction_hash, "NFT minted");
        });

        self.execute_transaction(plan).await
    }

    /// Let `spender` move `amount` (decimal, 18 decimals) of `token`.
    pub async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        amount: &str,
    ) -> Result<Receipt, WalletError> {
        let amount = amount.to_string();
        let plan = TransactionPlan::new(move |signer: SigningContext| async move {
            let amount = parse_amount(&amount)?;
            let input = approveCall { spender, amount }.abi_encode();
            signer.send_transaction(call(token, U256::ZERO, input)).await
        })
        .with_kind("approve")
        .with_pending_message("Approving token spending...")
        .with_success_message("Token approval successful!");

        self.execute_transaction(plan).await
    }
}
