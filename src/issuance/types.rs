//! Request and result types for registry mutations.

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;

use crate::error::MutationResult;
use crate::fees::FeeMultiplier;
use crate::issuance::capabilities::ConfirmationReceipt;
use crate::remark::{self, RemarkPayload};

/// The mutation a request performs, with its kind-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Mint a document token to a beneficiary and holder.
    Issue { beneficiary: Address, holder: Address },
    /// Burn a token that was returned to the registry.
    AcceptReturned,
    /// Reject a pending beneficiary change on the token's escrow.
    RejectTransferOwner,
    /// Reject a pending holder change on the token's escrow.
    RejectTransferHolder,
    /// Reject a combined beneficiary and holder change.
    RejectTransferOwnerHolder,
}

impl MutationKind {
    /// Stable name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Issue { .. } => "issue",
            MutationKind::AcceptReturned => "accept_returned",
            MutationKind::RejectTransferOwner => "reject_transfer_owner",
            MutationKind::RejectTransferHolder => "reject_transfer_holder",
            MutationKind::RejectTransferOwnerHolder => "reject_transfer_owner_holder",
        }
    }

    /// Whether the call goes to the token's escrow rather than the registry.
    pub fn targets_escrow(&self) -> bool {
        !matches!(self, MutationKind::Issue { .. } | MutationKind::AcceptReturned)
    }
}

/// One intended on-chain call against a document registry.
#[derive(Debug, Clone)]
pub struct MutationRequest {
    pub registry: Address,
    pub token_id: U256,
    pub kind: MutationKind,
    pub remark: String,
    pub encryption_key: String,
    pub network: String,
    pub dry_run: bool,
    pub fee_multiplier: f64,
}

impl MutationRequest {
    /// Base request with no remark, fee multiplier 1 and dry run off.
    pub fn new(
        kind: MutationKind,
        registry: Address,
        token_id: U256,
        network: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            token_id,
            kind,
            remark: String::new(),
            encryption_key: String::new(),
            network: network.into(),
            dry_run: false,
            fee_multiplier: 1.0,
        }
    }

    pub fn issue(
        registry: Address,
        token_id: U256,
        beneficiary: Address,
        holder: Address,
        network: impl Into<String>,
    ) -> Self {
        Self::new(
            MutationKind::Issue { beneficiary, holder },
            registry,
            token_id,
            network,
        )
    }

    pub fn accept_returned(registry: Address, token_id: U256, network: impl Into<String>) -> Self {
        Self::new(MutationKind::AcceptReturned, registry, token_id, network)
    }

    pub fn reject_transfer_owner(
        registry: Address,
        token_id: U256,
        network: impl Into<String>,
    ) -> Self {
        Self::new(MutationKind::RejectTransferOwner, registry, token_id, network)
    }

    /// Attach a remark and the key it is encrypted with.
    pub fn with_remark(mut self, remark: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        self.remark = remark.into();
        self.encryption_key = encryption_key.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_fee_multiplier(mut self, multiplier: f64) -> Self {
        self.fee_multiplier = multiplier;
        self
    }

    /// Check the caller-supplied inputs and encode the remark.
    ///
    /// Pure: touches no network, so callers can run it before connecting.
    pub fn validate(&self) -> MutationResult<(FeeMultiplier, RemarkPayload)> {
        let multiplier = FeeMultiplier::new(self.fee_multiplier)?;
        let payload = remark::encode(&self.remark, &self.encryption_key)?;
        Ok((multiplier, payload))
    }
}

/// Gas estimate produced instead of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DryRunReport {
    pub kind: &'static str,
    pub network: String,
    pub target: Address,
    pub estimated_gas_units: u64,
}

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub receipt: ConfirmationReceipt,
}

/// Terminal artifact of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PipelineOutcome {
    DryRun(DryRunReport),
    Confirmed(TransactionOutcome),
}

impl PipelineOutcome {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, PipelineOutcome::DryRun(_))
    }

    pub fn dry_run_report(&self) -> Option<&DryRunReport> {
        match self {
            PipelineOutcome::DryRun(report) => Some(report),
            PipelineOutcome::Confirmed(_) => None,
        }
    }

    pub fn transaction(&self) -> Option<&TransactionOutcome> {
        match self {
            PipelineOutcome::Confirmed(outcome) => Some(outcome),
            PipelineOutcome::DryRun(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = MutationRequest::accept_returned(Address::ZERO, U256::from(1), "sepolia")
            .with_remark("returned", "00112233445566778899aabbccddeeff")
            .with_dry_run(true)
            .with_fee_multiplier(1.25);

        assert_eq!(request.kind, MutationKind::AcceptReturned);
        assert_eq!(request.remark, "returned");
        assert!(request.dry_run);
        assert_eq!(request.fee_multiplier, 1.25);
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let request = MutationRequest::accept_returned(Address::ZERO, U256::from(1), "sepolia")
            .with_fee_multiplier(-1.0);
        assert!(matches!(
            request.validate(),
            Err(crate::error::MutationError::InvalidFeeMultiplier(_))
        ));

        let request = MutationRequest::accept_returned(Address::ZERO, U256::from(1), "sepolia")
            .with_remark("x".repeat(500), "zz");
        assert!(matches!(
            request.validate(),
            Err(crate::error::MutationError::InvalidRemarkFormat(_))
        ));

        let request = MutationRequest::accept_returned(Address::ZERO, U256::from(1), "sepolia");
        let (multiplier, payload) = request.validate().unwrap();
        assert_eq!(multiplier.value(), 1.0);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_kind_targets() {
        let issue = MutationKind::Issue {
            beneficiary: Address::ZERO,
            holder: Address::ZERO,
        };
        assert!(!issue.targets_escrow());
        assert!(!MutationKind::AcceptReturned.targets_escrow());
        assert!(MutationKind::RejectTransferOwner.targets_escrow());
        assert_eq!(MutationKind::RejectTransferOwnerHolder.name(), "reject_transfer_owner_holder");
    }

    #[test]
    fn test_dry_run_outcome_serializes_with_tag() {
        let outcome = PipelineOutcome::DryRun(DryRunReport {
            kind: "issue",
            network: "sepolia".to_string(),
            target: Address::ZERO,
            estimated_gas_units: 120_000,
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "dry_run");
        assert_eq!(json["estimated_gas_units"], 120_000);
        assert!(outcome.transaction().is_none());
    }
}
