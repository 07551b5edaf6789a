//! Dry-run gas estimation.

use crate::error::{MutationError, MutationResult};
use crate::issuance::capabilities::{RegistryCall, RegistryReader};
use crate::issuance::observer::PipelineObserver;
use crate::issuance::types::DryRunReport;

/// Estimates the cost of a call without broadcasting it.
pub struct DryRunEstimator<'a, R: ?Sized> {
    reader: &'a R,
    observer: &'a dyn PipelineObserver,
}

impl<'a, R> DryRunEstimator<'a, R>
where
    R: RegistryReader + ?Sized,
{
    pub fn new(reader: &'a R, observer: &'a dyn PipelineObserver) -> Self {
        Self { reader, observer }
    }

    /// Estimate gas for `call`. A call that would revert fails with
    /// `EstimationFailed`.
    pub async fn estimate(
        &self,
        kind: &'static str,
        network: &str,
        call: &RegistryCall,
    ) -> MutationResult<DryRunReport> {
        let estimated_gas_units = match self.reader.estimate_gas(call).await {
            Ok(units) => units,
            Err(e) => {
                let err = MutationError::EstimationFailed(e);
                self.observer.on_failure(kind, &err);
                return Err(err);
            }
        };

        self.observer.on_estimate(kind, estimated_gas_units);

        Ok(DryRunReport {
            kind,
            network: network.to_string(),
            target: call.target,
            estimated_gas_units,
        })
    }
}
