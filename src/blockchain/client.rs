//! Blockchain RPC client implementing the registry capabilities.
//!
//! # Responsibilities
//! - Connect to the network's JSON-RPC endpoints with the operator's wallet
//! - Read registry/escrow state, estimate gas and run static calls
//! - Broadcast transactions once and poll for receipts
//! - Suggest EIP-1559 fees for fee-market networks
//!
//! Reads fail over across the primary and failover endpoints on transport
//! errors and on node-side error responses (rate limits, missing state).
//! An execution revert is a verdict on the call and is returned without
//! trying the next endpoint.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::{TransportError, TransportResult};
use async_trait::async_trait;
use tokio::time::{interval, timeout};

use crate::blockchain::contracts::{ITitleEscrow, ITradeTrustToken};
use crate::blockchain::types::{ChainError, ChainId, ChainResult};
use crate::blockchain::wallet::SigningIdentity;
use crate::config::NetworkConfig;
use crate::fees::{FeeOracle, FeeQuote, SuggestedFees};
use crate::issuance::{
    ConfirmationReceipt, PendingTransaction, RegistryCall, RegistryReader, TransactionSubmitter,
};

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Wallet-backed RPC client for one network.
#[derive(Clone)]
pub struct ChainClient {
    /// Primary provider first, then failovers.
    providers: Vec<DynProvider>,
    network: NetworkConfig,
    sender: Address,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Connect to `network` signing as `identity`.
    ///
    /// Fails if the endpoint reports a different chain ID than configured.
    pub async fn connect(network: NetworkConfig, identity: &SigningIdentity) -> ChainResult<Self> {
        if !identity.network().eq_ignore_ascii_case(&network.name)
            || identity.chain_id() != network.chain_id
        {
            return Err(ChainError::Wallet(format!(
                "Signing identity is bound to '{}' (chain {}), not '{}' (chain {})",
                identity.network(),
                identity.chain_id(),
                network.name,
                network.chain_id
            )));
        }

        let timeout_duration = Duration::from_secs(network.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = network.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
        })?;
        providers.push(Arc::new(
            ProviderBuilder::new()
                .wallet(identity.wallet())
                .connect_http(primary_url),
        ) as DynProvider);

        for url_str in &network.failover_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => providers.push(Arc::new(
                    ProviderBuilder::new()
                        .wallet(identity.wallet())
                        .connect_http(url),
                ) as DynProvider),
                Err(_) => tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL"),
            }
        }

        let client = Self {
            providers,
            network,
            sender: identity.address(),
            timeout_duration,
        };

        client.verify_chain_id().await?;
        tracing::info!(
            rpc_url = %client.network.rpc_url,
            network = %client.network.name,
            chain_id = client.network.chain_id,
            "Chain client connected"
        );

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> ChainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.network.chain_id {
            return Err(ChainError::ChainMismatch {
                expected: self.network.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    pub async fn get_chain_id(&self) -> ChainResult<ChainId> {
        self.read("get chain id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> ChainResult<Option<TransactionReceipt>> {
        self.read("get receipt", move |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    fn primary(&self) -> &DynProvider {
        &self.providers[0]
    }

    fn request_for(&self, call: &RegistryCall) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.sender)
            .with_to(call.target)
            .with_input(call.calldata())
    }

    /// Run a read against each provider in turn until one answers.
    async fn read<T, F, Fut>(&self, op: &'static str, f: F) -> ChainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = TransportResult<T>>,
    {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, f(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => match classify(e) {
                    ChainError::Reverted(reason) => return Err(ChainError::Reverted(reason)),
                    other => {
                        tracing::warn!(provider_idx = i, op, error = %other, "RPC error, trying next provider");
                        last_error = other.to_string();
                    }
                },
                Err(_) => {
                    tracing::warn!(provider_idx = i, op, "RPC timeout, trying next provider");
                    last_error = format!("timed out after {}s", self.timeout_duration.as_secs());
                }
            }
        }
        Err(ChainError::Rpc(format!(
            "All RPC providers failed to {}: {}",
            op, last_error
        )))
    }

    async fn call_view(&self, target: Address, input: Vec<u8>) -> ChainResult<alloy::primitives::Bytes> {
        let tx = TransactionRequest::default()
            .with_to(target)
            .with_input(input);
        self.read("call view", move |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }
}

/// JSON-RPC error code geth and most clients use for execution reverts.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Map a transport error to a chain error.
///
/// Only execution reverts become `Reverted`; every other error response
/// (rate limits, unknown methods, missing state) stays `Rpc`.
fn classify(err: TransportError) -> ChainError {
    let Some(payload) = err.as_error_resp() else {
        return ChainError::Rpc(err.to_string());
    };

    if let Some(data) = payload.as_revert_data() {
        let reason =
            alloy::sol_types::decode_revert_reason(&data).unwrap_or_else(|| data.to_string());
        return ChainError::Reverted(reason);
    }

    if payload.code == EXECUTION_REVERTED_CODE
        || payload.message.to_ascii_lowercase().contains("execution reverted")
    {
        return ChainError::Reverted(payload.message.to_string());
    }

    ChainError::Rpc(format!("{} (code {})", payload.message, payload.code))
}

fn decode_address<C: SolCall<Return = Address>>(data: &[u8]) -> ChainResult<Address> {
    C::abi_decode_returns(data).map_err(|e| ChainError::Decode(e.to_string()))
}

#[async_trait]
impl RegistryReader for ChainClient {
    async fn owner_of(&self, registry: Address, token_id: U256) -> ChainResult<Address> {
        let input = ITradeTrustToken::ownerOfCall { tokenId: token_id }.abi_encode();
        let out = self.call_view(registry, input).await?;
        decode_address::<ITradeTrustToken::ownerOfCall>(&out)
    }

    async fn prev_beneficiary(&self, escrow: Address) -> ChainResult<Address> {
        let input = ITitleEscrow::prevBeneficiaryCall {}.abi_encode();
        let out = self.call_view(escrow, input).await?;
        decode_address::<ITitleEscrow::prevBeneficiaryCall>(&out)
    }

    async fn prev_holder(&self, escrow: Address) -> ChainResult<Address> {
        let input = ITitleEscrow::prevHolderCall {}.abi_encode();
        let out = self.call_view(escrow, input).await?;
        decode_address::<ITitleEscrow::prevHolderCall>(&out)
    }

    async fn estimate_gas(&self, call: &RegistryCall) -> ChainResult<u64> {
        let tx = self.request_for(call);
        self.read("estimate gas", move |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    async fn simulate(&self, call: &RegistryCall) -> ChainResult<()> {
        let tx = self.request_for(call);
        self.read("simulate call", move |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
        .map(|_| ())
    }
}

#[async_trait]
impl TransactionSubmitter for ChainClient {
    async fn submit(
        &self,
        call: &RegistryCall,
        fees: Option<&FeeQuote>,
    ) -> ChainResult<PendingTransaction> {
        let mut tx = self.request_for(call);
        if let Some(quote) = fees {
            tx = tx
                .with_max_fee_per_gas(quote.max_fee_per_gas)
                .with_max_priority_fee_per_gas(quote.max_priority_fee_per_gas);
        }

        // Single attempt on the primary endpoint.
        let pending = match timeout(self.timeout_duration, self.primary().send_transaction(tx)).await {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(classify(e)),
            Err(_) => return Err(ChainError::Timeout(self.network.rpc_timeout_secs)),
        };

        let tx_hash = *pending.tx_hash();
        tracing::trace!(tx_hash = %tx_hash, method = call.method(), "Transaction accepted by pool");
        Ok(PendingTransaction { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> ChainResult<ConfirmationReceipt> {
        let tx_hash = pending.tx_hash;
        let wait_secs = self.network.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(self.network.poll_interval_ms);

        let result = timeout(Duration::from_secs(wait_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                match self.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt query failed, still waiting")
                    }
                }
            }
        })
        .await;

        let receipt: TransactionReceipt = match result {
            Ok(receipt) => receipt,
            Err(_) => return Err(ChainError::ConfirmationTimeout(wait_secs)),
        };

        Ok(ConfirmationReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: receipt.gas_used,
            effective_gas_price: receipt.effective_gas_price,
            status: receipt.status(),
        })
    }
}

#[async_trait]
impl FeeOracle for ChainClient {
    async fn suggest_fees(&self) -> ChainResult<SuggestedFees> {
        let estimate = self
            .read("estimate fees", |p| async move { p.estimate_eip1559_fees().await })
            .await?;
        Ok(SuggestedFees {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("network", &self.network.name)
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("sender", &self.sender)
            .finish()
    }
}
