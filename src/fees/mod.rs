//! Fee strategy selection.
//!
//! # Responsibilities
//! - Decide per network whether explicit EIP-1559 fee fields are attached
//! - Query the fee oracle for fee-market networks
//! - Scale the priority tip by the operator's multiplier
//!
//! # Design Decisions
//! - The fee-market/legacy classification comes from `NetworkConfig`
//! - Quotes are computed per request and never cached
//! - Oracle failures propagate; there is no fallback strategy

pub mod selector;

pub use selector::{select, FeeMultiplier, FeeOracle, FeeQuote, SuggestedFees};
