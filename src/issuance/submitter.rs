//! Simulate, submit and confirm state machine.
//!
//! ```text
//! Idle → Simulating → Submitting → Pending → Confirmed
//!            ↘ Failed      ↘ Failed     ↘ Failed
//! ```
//!
//! Submission only happens after a successful simulation and is attempted
//! exactly once. Once `Pending`, the machine can only confirm or fail; it
//! never retracts a broadcast transaction.

use serde::Serialize;

use crate::blockchain::ChainError;
use crate::error::{MutationError, MutationResult};
use crate::fees::FeeQuote;
use crate::issuance::capabilities::{RegistryCall, RegistryReader, TransactionSubmitter};
use crate::issuance::observer::{PipelineObserver, StageEvent};
use crate::issuance::types::TransactionOutcome;
use alloy::primitives::TxHash;

/// Submitter lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Simulating,
    Submitting,
    Pending,
    Confirmed,
    Failed,
}

impl SubmissionState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Idle, Simulating)
                | (Simulating, Submitting)
                | (Simulating, Failed)
                | (Submitting, Pending)
                | (Submitting, Failed)
                | (Pending, Confirmed)
                | (Pending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Confirmed | SubmissionState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Simulating => "simulating",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Pending => "pending",
            SubmissionState::Confirmed => "confirmed",
            SubmissionState::Failed => "failed",
        }
    }
}

/// One-shot submitter for a single call.
pub struct MutationSubmitter<'a, R: ?Sized, S: ?Sized> {
    reader: &'a R,
    submitter: &'a S,
    observer: &'a dyn PipelineObserver,
    kind: &'static str,
    state: SubmissionState,
}

impl<'a, R, S> MutationSubmitter<'a, R, S>
where
    R: RegistryReader + ?Sized,
    S: TransactionSubmitter + ?Sized,
{
    pub fn new(
        kind: &'static str,
        reader: &'a R,
        submitter: &'a S,
        observer: &'a dyn PipelineObserver,
    ) -> Self {
        Self {
            reader,
            submitter,
            observer,
            kind,
            state: SubmissionState::Idle,
        }
    }

    /// Drive the call to a terminal state. Consumes the submitter: one
    /// instance per request.
    pub async fn run(
        mut self,
        call: &RegistryCall,
        fees: Option<&FeeQuote>,
    ) -> MutationResult<TransactionOutcome> {
        self.transition(call, SubmissionState::Simulating, None);
        if let Err(e) = self.reader.simulate(call).await {
            let err = match e {
                ChainError::Reverted(reason) => MutationError::SimulationReverted { reason },
                other => MutationError::SimulationFailed(other),
            };
            return Err(self.fail(call, err));
        }

        self.transition(call, SubmissionState::Submitting, None);
        let pending = match self.submitter.submit(call, fees).await {
            Ok(pending) => pending,
            Err(e) => return Err(self.fail(call, MutationError::SubmissionFailed(e))),
        };
        let tx_hash = pending.tx_hash;

        self.transition(call, SubmissionState::Pending, Some(tx_hash));
        let receipt = match self.submitter.await_confirmation(&pending).await {
            Ok(receipt) => receipt,
            Err(ChainError::ConfirmationTimeout(waited_secs)) => {
                let err = MutationError::ConfirmationTimeout {
                    tx_hash,
                    waited_secs,
                };
                return Err(self.fail(call, err));
            }
            Err(source) => {
                return Err(self.fail(call, MutationError::ConfirmationFailed { tx_hash, source }));
            }
        };

        if !receipt.status {
            let err = MutationError::TransactionReverted {
                tx_hash,
                block_number: receipt.block_number,
            };
            return Err(self.fail(call, err));
        }

        self.transition(call, SubmissionState::Confirmed, Some(tx_hash));
        Ok(TransactionOutcome {
            transaction_hash: tx_hash,
            block_number: receipt.block_number,
            receipt,
        })
    }

    fn transition(&mut self, call: &RegistryCall, next: SubmissionState, tx_hash: Option<TxHash>) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
        self.observer.on_transition(&StageEvent {
            kind: self.kind,
            method: call.method(),
            state: next,
            tx_hash,
        });
    }

    fn fail(&mut self, call: &RegistryCall, err: MutationError) -> MutationError {
        debug_assert!(!self.state.is_terminal(), "request already finished");
        self.observer.on_failure(self.kind, &err);
        self.transition(call, SubmissionState::Failed, err.tx_hash());
        err
    }
}
