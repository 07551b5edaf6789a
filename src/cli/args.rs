//! Command-line argument definitions.

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};

use crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR;
use crate::blockchain::KeySource;
use crate::config::loader::CONFIG_ENV_VAR;
use crate::issuance::{MutationKind, MutationRequest};

#[derive(Debug, Parser)]
#[command(name = "registry-ops")]
#[command(about = "Issue and manage transferable document records", long_about = None)]
pub struct Cli {
    /// TOML configuration file with network definitions
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mint a document token to a beneficiary and holder
    Issue {
        #[command(flatten)]
        target: TokenTarget,

        /// Initial beneficiary of the token
        #[arg(long)]
        beneficiary: Address,

        /// Initial holder of the token
        #[arg(long)]
        holder: Address,

        #[command(flatten)]
        common: MutationArgs,
    },
    /// Burn a token that was returned to the registry
    AcceptReturned {
        #[command(flatten)]
        target: TokenTarget,

        #[command(flatten)]
        common: MutationArgs,
    },
    /// Reject a pending beneficiary change
    RejectTransferOwner {
        #[command(flatten)]
        target: TokenTarget,

        #[command(flatten)]
        common: MutationArgs,
    },
    /// Reject a pending holder change
    RejectTransferHolder {
        #[command(flatten)]
        target: TokenTarget,

        #[command(flatten)]
        common: MutationArgs,
    },
    /// Reject a pending beneficiary and holder change
    RejectTransferOwnerHolder {
        #[command(flatten)]
        target: TokenTarget,

        #[command(flatten)]
        common: MutationArgs,
    },
    /// Decrypt a remark payload read from the chain
    DecryptRemark(DecryptArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DecryptArgs {
    /// Hex-encoded payload (with or without 0x)
    #[arg(long)]
    pub payload: String,

    #[arg(long)]
    pub encryption_key: String,
}

/// What a parsed command asks for.
#[derive(Debug)]
pub enum Invocation {
    Mutation(MutationRequest, KeyArgs),
    Decrypt(DecryptArgs),
}

/// Registry and token a mutation acts on.
#[derive(Debug, Clone, Args)]
pub struct TokenTarget {
    /// Document registry contract address
    #[arg(long = "address")]
    pub registry: Address,

    /// Token id, decimal or 0x-prefixed hex
    #[arg(long, value_parser = parse_token_id)]
    pub token_id: U256,
}

/// Flags shared by every mutation subcommand.
#[derive(Debug, Clone, Args)]
pub struct MutationArgs {
    #[arg(long, default_value = "sepolia")]
    pub network: String,

    /// Plaintext remark stored encrypted on chain
    #[arg(long, default_value = "")]
    pub remark: String,

    /// Hex key the remark is encrypted with
    #[arg(long, default_value = "")]
    pub encryption_key: String,

    /// Estimate gas and exit without sending a transaction
    #[arg(long)]
    pub dry_run: bool,

    /// Multiplier applied to the suggested priority fee
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub priority_fee_scale: f64,

    #[command(flatten)]
    pub key: KeyArgs,
}

/// Where the signing key comes from. Defaults to the environment.
#[derive(Debug, Clone, Args)]
#[group(multiple = false)]
pub struct KeyArgs {
    /// Private key in hex
    #[arg(long)]
    pub key: Option<String>,

    /// File whose first line is the private key
    #[arg(long)]
    pub key_file: Option<PathBuf>,
}

impl KeyArgs {
    pub fn source(&self) -> KeySource {
        match (&self.key, &self.key_file) {
            (Some(key), _) => KeySource::Inline(key.clone()),
            (None, Some(path)) => KeySource::File(path.clone()),
            (None, None) => KeySource::Env,
        }
    }

    /// Human-readable description of the source, never the key itself.
    pub fn describe(&self) -> String {
        match self.source() {
            KeySource::Inline(_) => "--key".to_string(),
            KeySource::File(path) => format!("key file {}", path.display()),
            KeySource::Env => format!("${}", PRIVATE_KEY_ENV_VAR),
        }
    }
}

impl MutationArgs {
    pub fn into_request(self, kind: MutationKind, target: TokenTarget) -> MutationRequest {
        MutationRequest::new(kind, target.registry, target.token_id, self.network)
            .with_remark(self.remark, self.encryption_key)
            .with_dry_run(self.dry_run)
            .with_fee_multiplier(self.priority_fee_scale)
    }
}

impl Commands {
    /// Split a mutation subcommand into its request and key source.
    pub fn into_invocation(self) -> Invocation {
        let (kind, target, common) = match self {
            Commands::Issue {
                target,
                beneficiary,
                holder,
                common,
            } => (MutationKind::Issue { beneficiary, holder }, target, common),
            Commands::AcceptReturned { target, common } => {
                (MutationKind::AcceptReturned, target, common)
            }
            Commands::RejectTransferOwner { target, common } => {
                (MutationKind::RejectTransferOwner, target, common)
            }
            Commands::RejectTransferHolder { target, common } => {
                (MutationKind::RejectTransferHolder, target, common)
            }
            Commands::RejectTransferOwnerHolder { target, common } => {
                (MutationKind::RejectTransferOwnerHolder, target, common)
            }
            Commands::DecryptRemark(args) => return Invocation::Decrypt(args),
        };
        let key = common.key.clone();
        Invocation::Mutation(common.into_request(kind, target), key)
    }
}

fn parse_token_id(value: &str) -> Result<U256, String> {
    value
        .trim()
        .parse::<U256>()
        .map_err(|e| format!("invalid token id '{}': {}", value, e))
}
