//! Document registry operations CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli (clap) ──▶ MutationRequest
//!                                │
//!                                ▼
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │                     MutationPipeline                         │
//!   │                                                              │
//!   │  remark codec ──▶ call resolution ──▶ dry run? ──▶ report    │
//!   │                        │ ownerOf                             │
//!   │                        ▼                                     │
//!   │                  fee selection ──▶ simulate ──▶ submit       │
//!   │                                                  │           │
//!   │                                                  ▼           │
//!   │                                               confirm        │
//!   └──────────────────────────────┬──────────────────────────────┘
//!                                  │
//!                                  ▼
//!                 ChainClient (alloy provider + signing wallet)
//! ```

use std::process::ExitCode;

use clap::Parser;

use registry_ops::cli::{self, Cli};
use registry_ops::config::load_or_default;
use registry_ops::observability::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        networks = config.networks.len(),
        "registry-ops starting"
    );

    match cli::run(cli.command, &config).await {
        Ok(output) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| output.to_string())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&e.report()).unwrap_or_else(|_| e.to_string())
            );
            ExitCode::FAILURE
        }
    }
}
