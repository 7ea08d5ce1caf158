//! NetPulse CLI - control and inspect a running monitor agent

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod client;
mod commands;
mod output;

use client::ApiClient;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "netpulse")]
#[command(about = "CLI for the NetPulse network monitor", version)]
struct Cli {
    /// Monitor API URL
    #[arg(
        long,
        global = true,
        env = "NETPULSE_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Print full snapshot payloads
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a monitoring session
    Start,
    /// Stop the active monitoring session
    Stop,
    /// Clear all session data and return to idle
    Reset,
    /// Show the current session snapshot
    Status,
    /// List recorded anomaly alerts
    Alerts,
    /// Export the metric window as CSV
    Export {
        /// Write the CSV to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = ApiClient::new(&cli.api_url)?;

    let result = match cli.command {
        Commands::Start => commands::session::start(&client, cli.format).await,
        Commands::Stop => commands::session::stop(&client, cli.format).await,
        Commands::Reset => commands::session::reset(&client, cli.format).await,
        Commands::Status => commands::session::status(&client, cli.format, cli.verbose).await,
        Commands::Alerts => commands::session::alerts(&client, cli.format).await,
        Commands::Export { output } => commands::export::export(&client, output).await,
    };

    if let Err(err) = result {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}
