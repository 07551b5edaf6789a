//! Signing identity resolution.
//!
//! # Security
//! - Private keys come from a flag, a key file, or an environment variable
//! - Keys are never logged or serialized

use std::path::Path;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{ChainError, ChainResult};
use crate::config::NetworkConfig;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "REGISTRY_OPS_PRIVATE_KEY";

/// Where to read the operator's private key from.
#[derive(Debug, Clone, Default)]
pub enum KeySource {
    /// Hex key given directly.
    Inline(String),
    /// File containing the hex key.
    File(std::path::PathBuf),
    /// `REGISTRY_OPS_PRIVATE_KEY`.
    #[default]
    Env,
}

/// An authorized signer bound to exactly one network.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    signer: PrivateKeySigner,
    network: String,
    chain_id: u64,
}

impl SigningIdentity {
    /// Create an identity from a hex-encoded private key.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `network` - Network the identity signs for
    pub fn from_private_key(private_key_hex: &str, network: &NetworkConfig) -> ChainResult<Self> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;
        let signer = signer.with_chain_id(Some(network.chain_id));

        tracing::info!(
            address = %signer.address(),
            network = %network.name,
            chain_id = network.chain_id,
            "Signing identity resolved"
        );

        Ok(Self {
            signer,
            network: network.name.clone(),
            chain_id: network.chain_id,
        })
    }

    /// Read the key from a file (first line, surrounding whitespace ignored).
    pub fn from_file(path: &Path, network: &NetworkConfig) -> ChainResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChainError::Wallet(format!("Cannot read key file {}: {}", path.display(), e))
        })?;
        let key = content.lines().next().unwrap_or_default();
        Self::from_private_key(key, network)
    }

    /// Read the key from `REGISTRY_OPS_PRIVATE_KEY`.
    pub fn from_env(network: &NetworkConfig) -> ChainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            ChainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;
        Self::from_private_key(&private_key, network)
    }

    /// Resolve an identity from a key source.
    pub fn resolve(source: &KeySource, network: &NetworkConfig) -> ChainResult<Self> {
        match source {
            KeySource::Inline(key) => Self::from_private_key(key, network),
            KeySource::File(path) => Self::from_file(path, network),
            KeySource::Env => Self::from_env(network),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Wallet used by the provider's signing filler.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
