//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! field has a default so an absent or partial file is still usable.

use serde::{Deserialize, Serialize};

/// Root configuration for the registry operator tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging settings.
    pub logging: LoggingConfig,

    /// Known networks and their fee model classification.
    pub networks: Vec<NetworkConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            networks: builtin_networks(),
        }
    }
}

impl AppConfig {
    /// Look up a network by name (case-insensitive).
    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// Names of all configured networks.
    pub fn network_names(&self) -> Vec<&str> {
        self.networks.iter().map(|n| n.name.as_str()).collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// A single network the tool can submit to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network name used on the command line (e.g. "sepolia").
    pub name: String,

    /// Chain ID (e.g. 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// Whether transactions carry explicit EIP-1559 fee fields.
    pub fee_market: bool,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a receipt before giving up.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            chain_id: 31337,
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            fee_market: true,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
        }
    }
}

impl NetworkConfig {
    fn builtin(name: &str, chain_id: u64, rpc_url: &str, fee_market: bool) -> Self {
        Self {
            name: name.to_string(),
            chain_id,
            rpc_url: rpc_url.to_string(),
            fee_market,
            ..Self::default()
        }
    }
}

/// Networks known without a config file.
pub fn builtin_networks() -> Vec<NetworkConfig> {
    vec![
        NetworkConfig::builtin("local", 31337, "http://localhost:8545", true),
        NetworkConfig::builtin("mainnet", 1, "https://ethereum-rpc.publicnode.com", true),
        NetworkConfig::builtin(
            "sepolia",
            11155111,
            "https://ethereum-sepolia-rpc.publicnode.com",
            true,
        ),
        NetworkConfig::builtin("matic", 137, "https://polygon-bor-rpc.publicnode.com", true),
        NetworkConfig::builtin(
            "amoy",
            80002,
            "https://polygon-amoy-bor-rpc.publicnode.com",
            true,
        ),
        NetworkConfig::builtin("xdc", 50, "https://rpc.xinfin.network", false),
        NetworkConfig::builtin("xdcapothem", 51, "https://erpc.apothem.network", false),
    ]
}
