//! Sluice CLI
//!
//! Command-line interface for provisioning pipelines on the control plane.

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Provision stream-processing pipelines", long_about = None)]
struct Cli {
    /// Control plane URL
    #[arg(long, env = "SLUICE_URL", default_value = "http://localhost:8080")]
    url: String,

    /// API key for the control plane
    #[arg(long, env = "SLUICE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SLUICE_REQUEST_TIMEOUT", default_value = "30")]
    timeout_secs: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let config = Config {
        url: cli.url,
        api_key: cli.api_key,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    handle_command(cli.command, &config).await
}
