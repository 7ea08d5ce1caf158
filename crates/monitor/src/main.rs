//! NetPulse monitor - real-time network metrics agent
//!
//! This binary backs the dashboard's real-time analysis view: it drives
//! the sampling/anomaly loop and exposes session control, snapshots and
//! CSV export over HTTP.

use anyhow::Result;
use monitor_lib::{MonitorController, RandomSource, StdRandom, StructuredLogger};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const MONITOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting netpulse-monitor");

    // Load configuration
    let config = config::AgentConfig::load()?;
    info!(instance = %config.instance, api_port = config.api_port, "Monitor configured");

    let logger = StructuredLogger::new(&config.instance);
    logger.log_startup(MONITOR_VERSION);

    // Seeded streams replay exactly, useful for demos and debugging
    let rng: Box<dyn RandomSource> = match config.seed {
        Some(seed) => {
            info!(seed = seed, "Using fixed seed for metric stream");
            Box::new(StdRandom::seeded(seed))
        }
        None => Box::new(StdRandom::from_entropy()),
    };

    let controller = Arc::new(MonitorController::new(config.monitor_config(), rng));
    let app_state = Arc::new(api::AppState::new(controller.clone()));

    // Start the session API server
    let api_port = config.api_port;
    tokio::spawn(api::serve(api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");

    // Guarantee no tick fires during teardown
    controller.stop().await;
    info!("Shutting down");

    Ok(())
}
