//! Narrow capability interfaces the pipeline consumes.
//!
//! The registry binding is split into a read side (lookups, gas estimation,
//! static-call simulation) and a write side (broadcast, confirmation) so each
//! can be mocked independently.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde::Serialize;

use crate::blockchain::contracts::{ITitleEscrow, ITradeTrustToken};
use crate::blockchain::ChainResult;
use crate::fees::FeeQuote;

/// A contract method invocation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Mint {
        beneficiary: Address,
        holder: Address,
        token_id: U256,
        remark: Bytes,
    },
    Burn {
        token_id: U256,
        remark: Bytes,
    },
    RejectTransferBeneficiary {
        remark: Bytes,
    },
    RejectTransferHolder {
        remark: Bytes,
    },
    RejectTransferOwners {
        remark: Bytes,
    },
}

impl ContractCall {
    /// Solidity method name.
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::Mint { .. } => "mint",
            ContractCall::Burn { .. } => "burn",
            ContractCall::RejectTransferBeneficiary { .. } => "rejectTransferBeneficiary",
            ContractCall::RejectTransferHolder { .. } => "rejectTransferHolder",
            ContractCall::RejectTransferOwners { .. } => "rejectTransferOwners",
        }
    }

    /// Encoded remark carried by the call.
    pub fn remark(&self) -> &Bytes {
        match self {
            ContractCall::Mint { remark, .. }
            | ContractCall::Burn { remark, .. }
            | ContractCall::RejectTransferBeneficiary { remark }
            | ContractCall::RejectTransferHolder { remark }
            | ContractCall::RejectTransferOwners { remark } => remark,
        }
    }

    /// ABI-encoded calldata.
    pub fn calldata(&self) -> Bytes {
        let encoded = match self.clone() {
            ContractCall::Mint {
                beneficiary,
                holder,
                token_id,
                remark,
            } => ITradeTrustToken::mintCall {
                beneficiary,
                holder,
                tokenId: token_id,
                remark,
            }
            .abi_encode(),
            ContractCall::Burn { token_id, remark } => ITradeTrustToken::burnCall {
                tokenId: token_id,
                remark,
            }
            .abi_encode(),
            ContractCall::RejectTransferBeneficiary { remark } => {
                ITitleEscrow::rejectTransferBeneficiaryCall { remark }.abi_encode()
            }
            ContractCall::RejectTransferHolder { remark } => {
                ITitleEscrow::rejectTransferHolderCall { remark }.abi_encode()
            }
            ContractCall::RejectTransferOwners { remark } => {
                ITitleEscrow::rejectTransferOwnersCall { remark }.abi_encode()
            }
        };
        encoded.into()
    }
}

/// A contract call bound to the address it is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryCall {
    pub target: Address,
    pub call: ContractCall,
}

impl RegistryCall {
    pub fn new(target: Address, call: ContractCall) -> Self {
        Self { target, call }
    }

    pub fn method(&self) -> &'static str {
        self.call.method()
    }

    pub fn calldata(&self) -> Bytes {
        self.call.calldata()
    }
}

/// Handle for a transaction accepted into the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingTransaction {
    pub tx_hash: TxHash,
}

/// Receipt summary for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    /// `false` when the transaction was mined but reverted.
    pub status: bool,
}

/// Read-only access to the registry: lookups, estimation and simulation.
#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// `registry.ownerOf(tokenId)`: the escrow holding the token.
    async fn owner_of(&self, registry: Address, token_id: U256) -> ChainResult<Address>;

    async fn prev_beneficiary(&self, escrow: Address) -> ChainResult<Address>;

    async fn prev_holder(&self, escrow: Address) -> ChainResult<Address>;

    /// Gas units the call would consume. Never broadcasts.
    async fn estimate_gas(&self, call: &RegistryCall) -> ChainResult<u64>;

    /// Static call; a revert is reported as `ChainError::Reverted`.
    async fn simulate(&self, call: &RegistryCall) -> ChainResult<()>;
}

/// Write access: broadcast and confirmation.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Broadcast once. `fees` is `None` on legacy networks.
    async fn submit(
        &self,
        call: &RegistryCall,
        fees: Option<&FeeQuote>,
    ) -> ChainResult<PendingTransaction>;

    /// Wait for inclusion; a provider-side timeout is
    /// `ChainError::ConfirmationTimeout`.
    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> ChainResult<ConfirmationReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_calldata_round_trips_through_abi() {
        let call = ContractCall::Mint {
            beneficiary: Address::repeat_byte(0x0b),
            holder: Address::repeat_byte(0x0c),
            token_id: U256::from(1),
            remark: Bytes::from_static(b"sealed"),
        };
        let data = call.calldata();
        assert_eq!(&data[..4], ITradeTrustToken::mintCall::SELECTOR.as_slice());

        let decoded = ITradeTrustToken::mintCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.beneficiary, Address::repeat_byte(0x0b));
        assert_eq!(decoded.tokenId, U256::from(1));
        assert_eq!(decoded.remark, Bytes::from_static(b"sealed"));
    }

    #[test]
    fn test_escrow_call_selectors() {
        let remark = Bytes::new();
        let cases = [
            (
                ContractCall::RejectTransferBeneficiary { remark: remark.clone() },
                ITitleEscrow::rejectTransferBeneficiaryCall::SELECTOR,
            ),
            (
                ContractCall::RejectTransferHolder { remark: remark.clone() },
                ITitleEscrow::rejectTransferHolderCall::SELECTOR,
            ),
            (
                ContractCall::RejectTransferOwners { remark },
                ITitleEscrow::rejectTransferOwnersCall::SELECTOR,
            ),
        ];
        for (call, selector) in cases {
            assert_eq!(&call.calldata()[..4], selector.as_slice());
        }
    }
}
