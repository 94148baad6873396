//! BDA CLI
//!
//! Command-line interface for submitting data automation jobs and waiting
//! for their results.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bda")]
#[command(about = "Data automation job CLI", long_about = None)]
struct Cli {
    /// Data automation endpoint URL
    #[arg(long, env = "BDA_ENDPOINT", default_value = "http://localhost:4566")]
    endpoint: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "BDA_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bda_cli=info,bda_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        endpoint: cli.endpoint,
        request_timeout: Duration::from_secs(cli.request_timeout),
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
