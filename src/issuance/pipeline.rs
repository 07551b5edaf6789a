//! Single entry point for registry mutations.

use crate::config::NetworkConfig;
use crate::error::{MutationError, MutationResult};
use crate::fees::{self, FeeMultiplier, FeeOracle};
use crate::issuance::calls::resolve_call;
use crate::issuance::capabilities::{RegistryReader, TransactionSubmitter};
use crate::issuance::estimator::DryRunEstimator;
use crate::issuance::observer::{NoopObserver, PipelineObserver};
use crate::issuance::submitter::MutationSubmitter;
use crate::issuance::types::{MutationRequest, PipelineOutcome};
use crate::remark::RemarkPayload;

static NOOP: NoopObserver = NoopObserver;

/// Runs requests against one network through borrowed collaborators.
///
/// Holds no mutable state; concurrent `execute` calls are independent.
pub struct MutationPipeline<'a, R: ?Sized, S: ?Sized, F: ?Sized> {
    network: &'a NetworkConfig,
    reader: &'a R,
    submitter: &'a S,
    oracle: &'a F,
    observer: &'a dyn PipelineObserver,
}

impl<'a, R, S, F> MutationPipeline<'a, R, S, F>
where
    R: RegistryReader + ?Sized,
    S: TransactionSubmitter + ?Sized,
    F: FeeOracle + ?Sized,
{
    pub fn new(network: &'a NetworkConfig, reader: &'a R, submitter: &'a S, oracle: &'a F) -> Self {
        Self {
            network,
            reader,
            submitter,
            oracle,
            observer: &NOOP,
        }
    }

    /// Replace the observer notified at stage transitions.
    pub fn with_observer(mut self, observer: &'a dyn PipelineObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        self.network
    }

    /// Execute a request.
    ///
    /// Input validation runs before any network call. A dry run returns a
    /// report after estimation and performs nothing else; otherwise the call
    /// is simulated, submitted once, and awaited.
    pub async fn execute(&self, request: &MutationRequest) -> MutationResult<PipelineOutcome> {
        let kind = request.kind.name();

        let validated = self.validate(request);
        let (multiplier, payload) = match validated {
            Ok(v) => v,
            Err(err) => {
                self.observer.on_failure(kind, &err);
                return Err(err);
            }
        };

        let call = match resolve_call(self.reader, request, payload).await {
            Ok(call) => call,
            Err(err) => {
                self.observer.on_failure(kind, &err);
                return Err(err);
            }
        };

        tracing::debug!(
            kind,
            method = call.method(),
            target = %call.target,
            via_escrow = request.kind.targets_escrow(),
            network = %self.network.name,
            dry_run = request.dry_run,
            "Call resolved"
        );

        if request.dry_run {
            let report = DryRunEstimator::new(self.reader, self.observer)
                .estimate(kind, &self.network.name, &call)
                .await?;
            return Ok(PipelineOutcome::DryRun(report));
        }

        let quote = match fees::select(self.network, self.oracle, multiplier).await {
            Ok(quote) => quote,
            Err(err) => {
                self.observer.on_failure(kind, &err);
                return Err(err);
            }
        };
        self.observer.on_fees_selected(kind, quote.as_ref());

        let outcome = MutationSubmitter::new(kind, self.reader, self.submitter, self.observer)
            .run(&call, quote.as_ref())
            .await?;

        Ok(PipelineOutcome::Confirmed(outcome))
    }

    fn validate(&self, request: &MutationRequest) -> MutationResult<(FeeMultiplier, RemarkPayload)> {
        if !request.network.eq_ignore_ascii_case(&self.network.name) {
            return Err(MutationError::NetworkMismatch {
                requested: request.network.clone(),
                bound: self.network.name.clone(),
            });
        }

        request.validate()
    }
}
