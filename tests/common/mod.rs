//! Shared in-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use registry_ops::blockchain::{ChainError, ChainResult};
use registry_ops::config::NetworkConfig;
use registry_ops::error::MutationError;
use registry_ops::fees::{FeeOracle, FeeQuote, SuggestedFees};
use registry_ops::issuance::{
    ConfirmationReceipt, PendingTransaction, PipelineObserver, RegistryCall, RegistryReader,
    StageEvent, SubmissionState, TransactionSubmitter,
};

pub const REGISTRY: Address = Address::repeat_byte(0x11);
pub const ESCROW: Address = Address::repeat_byte(0xe5);
pub const BENEFICIARY: Address = Address::repeat_byte(0xb1);
pub const HOLDER: Address = Address::repeat_byte(0x40);
pub const TX_HASH: TxHash = TxHash::repeat_byte(0xaa);
pub const REMARK_KEY: &str = "0x000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Every collaborator call, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    OwnerOf { registry: Address, token_id: U256 },
    PrevBeneficiary(Address),
    PrevHolder(Address),
    EstimateGas(RegistryCall),
    Simulate(RegistryCall),
    Submit { call: RegistryCall, fees: Option<FeeQuote> },
    AwaitConfirmation(TxHash),
    SuggestFees,
}

/// What `await_confirmation` does.
#[derive(Debug, Clone)]
pub enum Confirmation {
    Mined { block_number: u64, status: bool },
    Fails(ChainError),
}

/// Scriptable chain implementing every capability trait.
#[derive(Debug)]
pub struct MockChain {
    pub owner: Address,
    pub prev_beneficiary: Address,
    pub prev_holder: Address,
    pub gas: ChainResult<u64>,
    pub simulation: ChainResult<()>,
    pub submission: ChainResult<TxHash>,
    pub confirmation: Confirmation,
    pub suggested: ChainResult<SuggestedFees>,
    pub calls: Mutex<Vec<Recorded>>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            owner: ESCROW,
            prev_beneficiary: Address::repeat_byte(0x0b),
            prev_holder: Address::repeat_byte(0x0c),
            gas: Ok(120_000),
            simulation: Ok(()),
            submission: Ok(TX_HASH),
            confirmation: Confirmation::Mined {
                block_number: 42,
                status: true,
            },
            suggested: Ok(SuggestedFees {
                max_fee_per_gas: 30_000_000_000,
                max_priority_fee_per_gas: 2_000_000_000,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Recorded) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn submits(&self) -> Vec<(RegistryCall, Option<FeeQuote>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Recorded::Submit { call, fees } => Some((call, fees)),
                _ => None,
            })
            .collect()
    }

    pub fn simulations(&self) -> Vec<RegistryCall> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Recorded::Simulate(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    pub fn estimates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Recorded::EstimateGas(_)))
            .count()
    }

    pub fn fee_queries(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Recorded::SuggestFees))
            .count()
    }
}

#[async_trait]
impl RegistryReader for MockChain {
    async fn owner_of(&self, registry: Address, token_id: U256) -> ChainResult<Address> {
        self.record(Recorded::OwnerOf { registry, token_id });
        Ok(self.owner)
    }

    async fn prev_beneficiary(&self, escrow: Address) -> ChainResult<Address> {
        self.record(Recorded::PrevBeneficiary(escrow));
        Ok(self.prev_beneficiary)
    }

    async fn prev_holder(&self, escrow: Address) -> ChainResult<Address> {
        self.record(Recorded::PrevHolder(escrow));
        Ok(self.prev_holder)
    }

    async fn estimate_gas(&self, call: &RegistryCall) -> ChainResult<u64> {
        self.record(Recorded::EstimateGas(call.clone()));
        self.gas.clone()
    }

    async fn simulate(&self, call: &RegistryCall) -> ChainResult<()> {
        self.record(Recorded::Simulate(call.clone()));
        self.simulation.clone()
    }
}

#[async_trait]
impl TransactionSubmitter for MockChain {
    async fn submit(
        &self,
        call: &RegistryCall,
        fees: Option<&FeeQuote>,
    ) -> ChainResult<PendingTransaction> {
        self.record(Recorded::Submit {
            call: call.clone(),
            fees: fees.copied(),
        });
        self.submission
            .clone()
            .map(|tx_hash| PendingTransaction { tx_hash })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> ChainResult<ConfirmationReceipt> {
        self.record(Recorded::AwaitConfirmation(pending.tx_hash));
        match &self.confirmation {
            Confirmation::Mined {
                block_number,
                status,
            } => Ok(ConfirmationReceipt {
                transaction_hash: pending.tx_hash,
                block_number: *block_number,
                gas_used: 98_000,
                effective_gas_price: 25_000_000_000,
                status: *status,
            }),
            Confirmation::Fails(err) => Err(err.clone()),
        }
    }
}

#[async_trait]
impl FeeOracle for MockChain {
    async fn suggest_fees(&self) -> ChainResult<SuggestedFees> {
        self.record(Recorded::SuggestFees);
        self.suggested.clone()
    }
}

/// Observer that keeps every notification.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub states: Mutex<Vec<SubmissionState>>,
    pub estimates: Mutex<Vec<u64>>,
    pub failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn states(&self) -> Vec<SubmissionState> {
        self.states.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_transition(&self, event: &StageEvent) {
        self.states.lock().unwrap().push(event.state);
    }

    fn on_estimate(&self, _kind: &'static str, gas_units: u64) {
        self.estimates.lock().unwrap().push(gas_units);
    }

    fn on_failure(&self, _kind: &'static str, error: &MutationError) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

pub fn fee_market_network() -> NetworkConfig {
    NetworkConfig {
        name: "sepolia".to_string(),
        chain_id: 11155111,
        fee_market: true,
        ..NetworkConfig::default()
    }
}

pub fn legacy_network() -> NetworkConfig {
    NetworkConfig {
        name: "xdc".to_string(),
        chain_id: 50,
        fee_market: false,
        ..NetworkConfig::default()
    }
}
