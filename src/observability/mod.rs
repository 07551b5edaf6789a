//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! MutationPipeline stage notifications
//!     → TracingObserver (structured log events)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stderr log stream (text or JSON)
//!     → whatever recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Log level from `RUST_LOG`, falling back to the config file
//! - No recorder is installed here; without one, metric updates are no-ops

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::MetricsObserver;
