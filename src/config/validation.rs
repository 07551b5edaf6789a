//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Unique, non-empty network names
//! - Parsable RPC URLs and non-zero timing values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{AppConfig, NetworkConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no networks configured")]
    NoNetworks,

    #[error("network #{0} has an empty name")]
    EmptyName(usize),

    #[error("network '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("network '{network}' has invalid URL '{url}'")]
    InvalidUrl { network: String, url: String },

    #[error("network '{network}': {field} must be greater than zero")]
    ZeroValue { network: String, field: &'static str },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.logging.level.clone()));
    }

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    }

    let mut seen = HashSet::new();
    for (idx, network) in config.networks.iter().enumerate() {
        if network.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName(idx));
            continue;
        }
        if !seen.insert(network.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateName(network.name.clone()));
        }
        validate_network(network, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(network: &NetworkConfig, errors: &mut Vec<ValidationError>) {
    for url in std::iter::once(&network.rpc_url).chain(network.failover_urls.iter()) {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidUrl {
                network: network.name.clone(),
                url: url.clone(),
            });
        }
    }

    let timings = [
        ("rpc_timeout_secs", network.rpc_timeout_secs),
        ("confirmation_timeout_secs", network.confirmation_timeout_secs),
        ("poll_interval_ms", network.poll_interval_ms),
    ];
    for (field, value) in timings {
        if value == 0 {
            errors.push(ValidationError::ZeroValue {
                network: network.name.clone(),
                field,
            });
        }
    }
}
