//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! key flag / key file / environment variable
//!     → wallet.rs (SigningIdentity bound to one network)
//!     → client.rs (RPC connection with timeouts, wallet filler)
//!     → RegistryReader / TransactionSubmitter / FeeOracle for the pipeline
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - The RPC chain ID must match the configured network before signing

pub mod client;
pub mod contracts;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use types::{ChainError, ChainId, ChainResult};
pub use wallet::{KeySource, SigningIdentity};
