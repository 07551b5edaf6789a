//! Document registry operations library

pub mod blockchain;
pub mod cli;
pub mod config;
pub mod error;
pub mod fees;
pub mod issuance;
pub mod observability;
pub mod remark;

pub use config::schema::AppConfig;
pub use error::{MutationError, MutationResult};
pub use issuance::{MutationPipeline, MutationRequest, PipelineOutcome};
