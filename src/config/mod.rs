//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → NetworkConfig handed to the chain client and fee selector
//! ```
//!
//! # Design Decisions
//! - The fee-market/legacy split is configuration, never probed at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{AppConfig, LoggingConfig, NetworkConfig};
pub use validation::ValidationError;
