//! Error types for registry mutations.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;

use crate::blockchain::ChainError;
use crate::remark::RemarkError;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Lookup,
    Estimation,
    FeeSelection,
    Simulation,
    Submission,
    Confirmation,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Lookup => "lookup",
            Stage::Estimation => "estimation",
            Stage::FeeSelection => "fee_selection",
            Stage::Simulation => "simulation",
            Stage::Submission => "submission",
            Stage::Confirmation => "confirmation",
        }
    }
}

/// What the chain saw before the error, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// No transaction was broadcast; the request can be corrected and rerun.
    NothingSubmitted,
    /// A transaction was accepted by the pool but its fate is unknown;
    /// re-query the hash instead of resubmitting.
    SubmittedUnconfirmed,
    /// The transaction was mined and reverted.
    MinedReverted,
}

/// Main error type for a mutation request.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("Invalid remark: {0}")]
    InvalidRemarkFormat(String),

    #[error("Invalid encryption key: {0}")]
    InvalidEncryptionKey(String),

    #[error("Remark decryption failed: {0}")]
    RemarkDecryptionFailed(String),

    #[error("Invalid fee multiplier {0}: must be a positive finite number")]
    InvalidFeeMultiplier(f64),

    #[error("Request targets network '{requested}' but the signer is bound to '{bound}'")]
    NetworkMismatch { requested: String, bound: String },

    #[error("Failed to look up {what}: {source}")]
    LookupFailed {
        what: &'static str,
        #[source]
        source: ChainError,
    },

    #[error("Escrow {escrow} has no previous {role} to restore")]
    NoPreviousParty { escrow: Address, role: &'static str },

    #[error("Gas estimation failed: {0}")]
    EstimationFailed(#[source] ChainError),

    #[error("Fee estimation failed: {0}")]
    FeeEstimationFailed(#[source] ChainError),

    #[error("Simulation reverted: {reason}")]
    SimulationReverted { reason: String },

    #[error("Simulation could not be run: {0}")]
    SimulationFailed(#[source] ChainError),

    #[error("Submission failed: {0}")]
    SubmissionFailed(#[source] ChainError),

    #[error("Transaction {tx_hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },

    #[error("Lost track of transaction {tx_hash}: {source}")]
    ConfirmationFailed {
        tx_hash: TxHash,
        #[source]
        source: ChainError,
    },

    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    TransactionReverted { tx_hash: TxHash, block_number: u64 },
}

impl MutationError {
    /// Stage the request failed in.
    pub fn stage(&self) -> Stage {
        match self {
            MutationError::InvalidRemarkFormat(_)
            | MutationError::InvalidEncryptionKey(_)
            | MutationError::RemarkDecryptionFailed(_)
            | MutationError::InvalidFeeMultiplier(_)
            | MutationError::NetworkMismatch { .. } => Stage::Validation,
            MutationError::LookupFailed { .. } | MutationError::NoPreviousParty { .. } => {
                Stage::Lookup
            }
            MutationError::EstimationFailed(_) => Stage::Estimation,
            MutationError::FeeEstimationFailed(_) => Stage::FeeSelection,
            MutationError::SimulationReverted { .. } | MutationError::SimulationFailed(_) => {
                Stage::Simulation
            }
            MutationError::SubmissionFailed(_) => Stage::Submission,
            MutationError::ConfirmationTimeout { .. }
            | MutationError::ConfirmationFailed { .. }
            | MutationError::TransactionReverted { .. } => Stage::Confirmation,
        }
    }

    /// Whether anything reached the chain before the failure.
    pub fn effect(&self) -> Effect {
        match self {
            MutationError::ConfirmationTimeout { .. } | MutationError::ConfirmationFailed { .. } => {
                Effect::SubmittedUnconfirmed
            }
            MutationError::TransactionReverted { .. } => Effect::MinedReverted,
            _ => Effect::NothingSubmitted,
        }
    }

    /// Hash of the broadcast transaction, if one exists.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            MutationError::ConfirmationTimeout { tx_hash, .. }
            | MutationError::ConfirmationFailed { tx_hash, .. }
            | MutationError::TransactionReverted { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

impl From<RemarkError> for MutationError {
    fn from(err: RemarkError) -> Self {
        match err {
            RemarkError::InvalidKey(msg) => MutationError::InvalidEncryptionKey(msg),
            RemarkError::InvalidFormat(msg) => MutationError::InvalidRemarkFormat(msg),
            RemarkError::DecryptionFailed(msg) => MutationError::RemarkDecryptionFailed(msg),
        }
    }
}

/// Result type for mutation requests.
pub type MutationResult<T> = Result<T, MutationError>;
