//! Fee-market quote computation.

use async_trait::async_trait;
use serde::Serialize;

use crate::blockchain::ChainResult;
use crate::config::NetworkConfig;
use crate::error::{MutationError, MutationResult};

/// Fixed-point precision for the multiplier (four decimal places).
const MULTIPLIER_SCALE: u128 = 10_000;

/// Fee parameters suggested by the network, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedFees {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Fee fields attached to a fee-market transaction, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Source of current fee suggestions for one network.
#[async_trait]
pub trait FeeOracle: Send + Sync {
    async fn suggest_fees(&self) -> ChainResult<SuggestedFees>;
}

/// Validated priority fee multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeMultiplier {
    value: f64,
    factor: u128,
}

impl FeeMultiplier {
    /// Validate a raw multiplier. Rejects non-finite, non-positive and
    /// values too small to survive fixed-point rounding.
    pub fn new(value: f64) -> MutationResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(MutationError::InvalidFeeMultiplier(value));
        }

        let scaled = (value * MULTIPLIER_SCALE as f64).round();
        if scaled < 1.0 || scaled > u64::MAX as f64 {
            return Err(MutationError::InvalidFeeMultiplier(value));
        }

        Ok(Self {
            value,
            factor: scaled as u128,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Scale an amount of wei, rounding down.
    pub fn apply(&self, wei: u128) -> u128 {
        wei.saturating_mul(self.factor) / MULTIPLIER_SCALE
    }
}

impl Default for FeeMultiplier {
    fn default() -> Self {
        Self {
            value: 1.0,
            factor: MULTIPLIER_SCALE,
        }
    }
}

impl FeeQuote {
    /// Build a quote from oracle suggestions.
    ///
    /// The priority tip is scaled; the max fee moves by the same absolute
    /// amount so the base-fee headroom is preserved.
    pub fn from_suggestion(suggested: SuggestedFees, multiplier: FeeMultiplier) -> Self {
        let priority = multiplier.apply(suggested.max_priority_fee_per_gas);
        let max_fee = suggested
            .max_fee_per_gas
            .saturating_add(priority)
            .saturating_sub(suggested.max_priority_fee_per_gas)
            .max(priority);

        Self {
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: priority,
        }
    }
}

/// Select fee parameters for a network.
///
/// Returns `None` for legacy networks, where the provider negotiates a gas
/// price at submission time.
pub async fn select<O>(
    network: &NetworkConfig,
    oracle: &O,
    multiplier: FeeMultiplier,
) -> MutationResult<Option<FeeQuote>>
where
    O: FeeOracle + ?Sized,
{
    if !network.fee_market {
        tracing::debug!(network = %network.name, "Legacy gas pricing, no fee quote");
        return Ok(None);
    }

    let suggested = oracle
        .suggest_fees()
        .await
        .map_err(MutationError::FeeEstimationFailed)?;
    let quote = FeeQuote::from_suggestion(suggested, multiplier);

    tracing::trace!(
        network = %network.name,
        max_fee_per_gas = quote.max_fee_per_gas,
        max_priority_fee_per_gas = quote.max_priority_fee_per_gas,
        multiplier = multiplier.value(),
        "Fee quote selected"
    );

    Ok(Some(quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ChainError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedOracle {
        result: ChainResult<SuggestedFees>,
        calls: AtomicUsize,
    }

    impl FixedOracle {
        fn new(result: ChainResult<SuggestedFees>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FeeOracle for FixedOracle {
        async fn suggest_fees(&self) -> ChainResult<SuggestedFees> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn network(fee_market: bool) -> NetworkConfig {
        NetworkConfig {
            name: "testnet".to_string(),
            fee_market,
            ..NetworkConfig::default()
        }
    }

    const SUGGESTED: SuggestedFees = SuggestedFees {
        max_fee_per_gas: 30_000_000_000,
        max_priority_fee_per_gas: 2_000_000_000,
    };

    #[test]
    fn test_multiplier_validation() {
        for bad in [-1.0, 0.0, f64::NAN, f64::INFINITY, 0.00001] {
            assert!(matches!(
                FeeMultiplier::new(bad),
                Err(MutationError::InvalidFeeMultiplier(_))
            ));
        }
        assert!(FeeMultiplier::new(0.5).is_ok());
        assert_eq!(FeeMultiplier::default(), FeeMultiplier::new(1.0).unwrap());
    }

    #[test]
    fn test_unit_multiplier_keeps_oracle_values() {
        let quote = FeeQuote::from_suggestion(SUGGESTED, FeeMultiplier::default());
        assert_eq!(quote.max_fee_per_gas, SUGGESTED.max_fee_per_gas);
        assert_eq!(quote.max_priority_fee_per_gas, SUGGESTED.max_priority_fee_per_gas);
    }

    #[test]
    fn test_scaled_priority_shifts_max_fee() {
        let quote = FeeQuote::from_suggestion(SUGGESTED, FeeMultiplier::new(1.5).unwrap());
        assert_eq!(quote.max_priority_fee_per_gas, 3_000_000_000);
        assert_eq!(quote.max_fee_per_gas, 31_000_000_000);

        let quote = FeeQuote::from_suggestion(SUGGESTED, FeeMultiplier::new(0.5).unwrap());
        assert_eq!(quote.max_priority_fee_per_gas, 1_000_000_000);
        assert_eq!(quote.max_fee_per_gas, 29_000_000_000);
    }

    #[test]
    fn test_max_fee_never_below_priority() {
        let suggested = SuggestedFees {
            max_fee_per_gas: 1,
            max_priority_fee_per_gas: 1,
        };
        let quote = FeeQuote::from_suggestion(suggested, FeeMultiplier::new(10.0).unwrap());
        assert!(quote.max_fee_per_gas >= quote.max_priority_fee_per_gas);
    }

    #[tokio::test]
    async fn test_legacy_network_skips_oracle() {
        let oracle = FixedOracle::new(Ok(SUGGESTED));
        let quote = select(&network(false), &oracle, FeeMultiplier::default())
            .await
            .unwrap();
        assert!(quote.is_none());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fee_market_network_queries_oracle() {
        let oracle = FixedOracle::new(Ok(SUGGESTED));
        let quote = select(&network(true), &oracle, FeeMultiplier::new(2.0).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(quote.max_priority_fee_per_gas, 4_000_000_000);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oracle_failure_propagates() {
        let oracle = FixedOracle::new(Err(ChainError::Rpc("unreachable".to_string())));
        let err = select(&network(true), &oracle, FeeMultiplier::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::FeeEstimationFailed(_)));
    }
}
