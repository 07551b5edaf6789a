//! Stage notifications emitted by the pipeline.

use std::sync::Arc;

use alloy::primitives::TxHash;

use crate::error::MutationError;
use crate::fees::FeeQuote;
use crate::issuance::submitter::SubmissionState;

/// A state transition of the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent {
    pub kind: &'static str,
    pub method: &'static str,
    pub state: SubmissionState,
    pub tx_hash: Option<TxHash>,
}

/// Receives progress notifications. All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    fn on_transition(&self, _event: &StageEvent) {}

    fn on_estimate(&self, _kind: &'static str, _gas_units: u64) {}

    fn on_fees_selected(&self, _kind: &'static str, _quote: Option<&FeeQuote>) {}

    fn on_failure(&self, _kind: &'static str, _error: &MutationError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs stage transitions through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_transition(&self, event: &StageEvent) {
        match (event.state, event.tx_hash) {
            (SubmissionState::Submitting, _) => {
                tracing::info!(kind = event.kind, method = event.method, "Sending transaction to pool");
            }
            (SubmissionState::Pending, Some(hash)) => {
                tracing::info!(kind = event.kind, tx_hash = %hash, "Waiting for transaction to be mined");
            }
            (SubmissionState::Confirmed, Some(hash)) => {
                tracing::info!(kind = event.kind, tx_hash = %hash, "Transaction confirmed");
            }
            (state, hash) => {
                tracing::debug!(kind = event.kind, method = event.method, ?state, tx_hash = ?hash, "Stage transition");
            }
        }
    }

    fn on_estimate(&self, kind: &'static str, gas_units: u64) {
        tracing::info!(kind, gas_units, "Dry run gas estimate");
    }

    fn on_fees_selected(&self, kind: &'static str, quote: Option<&FeeQuote>) {
        match quote {
            Some(quote) => tracing::trace!(
                kind,
                max_fee_per_gas = quote.max_fee_per_gas,
                max_priority_fee_per_gas = quote.max_priority_fee_per_gas,
                "Gas fees"
            ),
            None => tracing::trace!(kind, "Network negotiates gas price"),
        }
    }

    fn on_failure(&self, kind: &'static str, error: &MutationError) {
        tracing::error!(kind, stage = ?error.stage(), effect = ?error.effect(), error = %error, "Mutation failed");
    }
}

/// Fans notifications out to several observers.
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_transition(&self, event: &StageEvent) {
        self.observers.iter().for_each(|o| o.on_transition(event));
    }

    fn on_estimate(&self, kind: &'static str, gas_units: u64) {
        self.observers.iter().for_each(|o| o.on_estimate(kind, gas_units));
    }

    fn on_fees_selected(&self, kind: &'static str, quote: Option<&FeeQuote>) {
        self.observers.iter().for_each(|o| o.on_fees_selected(kind, quote));
    }

    fn on_failure(&self, kind: &'static str, error: &MutationError) {
        self.observers.iter().for_each(|o| o.on_failure(kind, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting(AtomicUsize);

    impl PipelineObserver for Counting {
        fn on_transition(&self, _event: &StageEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_composite_fans_out() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let composite = CompositeObserver::new()
            .with(a.clone())
            .with(b.clone())
            .with(Arc::new(NoopObserver));
        assert_eq!(composite.len(), 3);

        composite.on_transition(&StageEvent {
            kind: "issue",
            method: "mint",
            state: SubmissionState::Simulating,
            tx_hash: None,
        });
        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 1);
    }
}
