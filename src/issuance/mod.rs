//! Transaction issuance pipeline.
//!
//! # Data Flow
//! ```text
//! MutationRequest
//!     → remark codec (encrypted payload, validation)
//!     → calls.rs (registry call, or escrow call via ownerOf lookup)
//!     → dry run?  estimator.rs → DryRunReport (done)
//!     → fees::select (fee-market quote or none)
//!     → submitter.rs (simulate → submit → confirm) → TransactionOutcome
//! ```
//!
//! # Design Decisions
//! - One pipeline for every mutation kind; kinds differ only in the call
//! - The registry binding is consumed through two narrow traits:
//!   `RegistryReader` (read/simulate) and `TransactionSubmitter` (write)
//! - Progress is reported through `PipelineObserver`, not hard-wired logging
//! - No retries anywhere: a failed stage ends the request

pub mod calls;
pub mod capabilities;
pub mod estimator;
pub mod observer;
pub mod pipeline;
pub mod submitter;
pub mod types;

pub use capabilities::{
    ConfirmationReceipt, ContractCall, PendingTransaction, RegistryCall, RegistryReader,
    TransactionSubmitter,
};
pub use estimator::DryRunEstimator;
pub use observer::{CompositeObserver, NoopObserver, PipelineObserver, StageEvent, TracingObserver};
pub use pipeline::MutationPipeline;
pub use submitter::{MutationSubmitter, SubmissionState};
pub use types::{DryRunReport, MutationKind, MutationRequest, PipelineOutcome, TransactionOutcome};
