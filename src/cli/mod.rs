//! Command-line front end.
//!
//! # Data Flow
//! ```text
//! argv → args.rs (clap) → MutationRequest + KeySource
//!     → config (network lookup) → SigningIdentity → ChainClient
//!     → MutationPipeline (tracing + metrics observers)
//!     → JSON on stdout
//! ```

pub mod args;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::blockchain::{ChainClient, ChainError, SigningIdentity};
use crate::config::{AppConfig, ConfigError};
use crate::error::MutationError;
use crate::issuance::{
    CompositeObserver, MutationPipeline, MutationRequest, PipelineOutcome, TracingObserver,
};
use crate::observability::MetricsObserver;
use crate::remark::{self, RemarkError, RemarkPayload};

pub use args::{Cli, Commands, DecryptArgs, Invocation, KeyArgs, MutationArgs, TokenTarget};

/// Errors surfaced to the process exit path.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error("Remark error: {0}")]
    Remark(#[from] RemarkError),

    #[error("Invalid payload hex: {0}")]
    PayloadHex(#[from] hex::FromHexError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// JSON body printed on stderr when a command fails.
    pub fn report(&self) -> serde_json::Value {
        match self {
            CliError::Mutation(err) => serde_json::json!({
                "error": err.to_string(),
                "stage": err.stage(),
                "effect": err.effect(),
                "transaction_hash": err.tx_hash(),
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

#[derive(Debug, Serialize)]
struct DecryptedRemark {
    remark: String,
}

/// Run a parsed command and return the JSON document to print.
pub async fn run(command: Commands, config: &AppConfig) -> Result<serde_json::Value, CliError> {
    match command.into_invocation() {
        Invocation::Decrypt(args) => {
            let remark = decrypt(&args)?;
            Ok(serde_json::to_value(DecryptedRemark { remark })?)
        }
        Invocation::Mutation(request, key) => {
            let outcome = execute(request, &key, config).await?;
            Ok(serde_json::to_value(outcome)?)
        }
    }
}

/// Decode a hex payload and decrypt it.
pub fn decrypt(args: &DecryptArgs) -> Result<String, CliError> {
    let hex_payload = args.payload.trim();
    let bytes = hex::decode(hex_payload.strip_prefix("0x").unwrap_or(hex_payload))?;
    Ok(remark::decode(&RemarkPayload::from_bytes(bytes), &args.encryption_key)?)
}

/// Connect to the request's network and run it through the pipeline.
pub async fn execute(
    request: MutationRequest,
    key: &KeyArgs,
    config: &AppConfig,
) -> Result<PipelineOutcome, CliError> {
    let network = config
        .network(&request.network)
        .cloned()
        .ok_or_else(|| ConfigError::UnknownNetwork {
            name: request.network.clone(),
            known: config.network_names().join(", "),
        })?;

    // Input errors must surface before any RPC round trip.
    request.validate()?;

    tracing::debug!(network = %network.name, key_source = %key.describe(), "Resolving signer");
    let identity = SigningIdentity::resolve(&key.source(), &network)?;
    let client = ChainClient::connect(network, &identity).await?;
    tracing::debug!(sender = %client.sender(), "Signer ready");

    let observer = CompositeObserver::new()
        .with(Arc::new(TracingObserver))
        .with(Arc::new(MetricsObserver));

    let pipeline =
        MutationPipeline::new(client.network(), &client, &client, &client).with_observer(&observer);
    let outcome = pipeline.execute(&request).await?;

    if let Some(report) = outcome.dry_run_report() {
        tracing::info!(
            kind = report.kind,
            gas_units = report.estimated_gas_units,
            "Dry run complete, no transaction sent"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxHash;

    #[tokio::test]
    async fn test_decrypt_remark_roundtrip() {
        let key = "ab".repeat(32);
        let payload = remark::encode("shipment released", &key).unwrap();
        let command = Commands::DecryptRemark(DecryptArgs {
            payload: payload.to_string(),
            encryption_key: key,
        });

        let value = run(command, &AppConfig::default()).await.unwrap();
        assert_eq!(value["remark"], "shipment released");
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let payload = remark::encode("shipment released", &"ab".repeat(32)).unwrap();
        let err = decrypt(&DecryptArgs {
            payload: payload.to_string(),
            encryption_key: "cd".repeat(32),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Remark(RemarkError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_unknown_network() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "registry-ops",
            "accept-returned",
            "--address",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--token-id",
            "1",
            "--network",
            "atlantis",
        ])
        .unwrap();

        let err = run(cli.command, &AppConfig::default()).await.unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::UnknownNetwork { .. })));
        assert!(err.to_string().contains("sepolia"));
    }

    #[tokio::test]
    async fn test_invalid_input_fails_before_connecting() {
        let long_remark = "r".repeat(500);
        let cli = <Cli as clap::Parser>::try_parse_from([
            "registry-ops",
            "accept-returned",
            "--address",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--token-id",
            "1",
            "--network",
            "local",
            "--priority-fee-scale",
            "-1",
            "--remark",
            long_remark.as_str(),
            "--encryption-key",
            "zz",
            "--key",
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        ])
        .unwrap();

        let err = run(cli.command, &AppConfig::default()).await.unwrap_err();
        assert!(
            matches!(err, CliError::Mutation(MutationError::InvalidFeeMultiplier(m)) if m == -1.0),
            "unexpected error {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_invalid_remark_fails_before_connecting() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "registry-ops",
            "reject-transfer-owner",
            "--address",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "--token-id",
            "1",
            "--network",
            "local",
            "--remark",
            "hello",
            "--encryption-key",
            "0x1234",
            "--key",
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        ])
        .unwrap();

        let err = run(cli.command, &AppConfig::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Mutation(MutationError::InvalidEncryptionKey(_))
        ));
    }

    #[test]
    fn test_report_includes_stage_and_hash() {
        let err = CliError::Mutation(MutationError::ConfirmationTimeout {
            tx_hash: TxHash::repeat_byte(0x11),
            waited_secs: 300,
        });
        let report = err.report();
        assert_eq!(report["stage"], "confirmation");
        assert_eq!(report["effect"], "submitted_unconfirmed");
        assert!(report["transaction_hash"].is_string());
    }
}
