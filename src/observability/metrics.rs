//! Mutation metrics.
//!
//! # Metrics
//! - `registry_mutation_stage_total` (counter): submitter transitions by kind, stage
//! - `registry_mutation_failures_total` (counter): failures by kind, stage, effect
//! - `registry_mutation_gas_estimate` (histogram): dry-run gas estimates by kind
//! - `registry_mutation_fee_market_total` (counter): quotes attached vs. left to the node

use crate::error::{Effect, MutationError};
use crate::fees::FeeQuote;
use crate::issuance::{PipelineObserver, StageEvent};

pub const STAGE_TOTAL: &str = "registry_mutation_stage_total";
pub const FAILURES_TOTAL: &str = "registry_mutation_failures_total";
pub const GAS_ESTIMATE: &str = "registry_mutation_gas_estimate";
pub const FEE_MODE_TOTAL: &str = "registry_mutation_fee_market_total";

/// Records pipeline progress through the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl PipelineObserver for MetricsObserver {
    fn on_transition(&self, event: &StageEvent) {
        metrics::counter!(STAGE_TOTAL, "kind" => event.kind, "stage" => event.state.as_str())
            .increment(1);
    }

    fn on_estimate(&self, kind: &'static str, gas_units: u64) {
        metrics::histogram!(GAS_ESTIMATE, "kind" => kind).record(gas_units as f64);
    }

    fn on_fees_selected(&self, kind: &'static str, quote: Option<&FeeQuote>) {
        let mode = if quote.is_some() { "quoted" } else { "node" };
        metrics::counter!(FEE_MODE_TOTAL, "kind" => kind, "mode" => mode).increment(1);
    }

    fn on_failure(&self, kind: &'static str, error: &MutationError) {
        let effect = match error.effect() {
            Effect::NothingSubmitted => "nothing_submitted",
            Effect::SubmittedUnconfirmed => "submitted_unconfirmed",
            Effect::MinedReverted => "mined_reverted",
        };
        metrics::counter!(
            FAILURES_TOTAL,
            "kind" => kind,
            "stage" => error.stage().as_str(),
            "effect" => effect
        )
        .increment(1);
    }
}
