//! API Pulse CLI
//!
//! A command-line tool for inspecting the real-time metrics feed:
//! connection status, the latest snapshot, deltas, and window history.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{metrics, status};

/// API Pulse CLI
#[derive(Parser)]
#[command(name = "pulse")]
#[command(author, version, about = "CLI for the API Pulse metrics feed", long_about = None)]
pub struct Cli {
    /// Feed service URL (can also be set via PULSE_API_URL env var)
    #[arg(long, env = "PULSE_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show feed connection and window status
    Status,

    /// Inspect the metrics window
    #[command(subcommand)]
    Metrics(MetricsCommands),
}

#[derive(Subcommand)]
pub enum MetricsCommands {
    /// Show the most recent snapshot
    Latest,

    /// Show the change between the two most recent snapshots
    Delta,

    /// Show the retained snapshot history
    History {
        /// Show only the most recent N snapshots
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Status => {
            status::show_status(&client, cli.format).await?;
        }
        Commands::Metrics(metrics_cmd) => match metrics_cmd {
            MetricsCommands::Latest => {
                metrics::show_latest(&client, cli.format).await?;
            }
            MetricsCommands::Delta => {
                metrics::show_delta(&client, cli.format).await?;
            }
            MetricsCommands::History { limit } => {
                metrics::show_history(&client, limit, cli.format).await?;
            }
        },
    }

    Ok(())
}
