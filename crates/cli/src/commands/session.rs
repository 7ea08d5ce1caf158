//! Session control and inspection commands

use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, SessionResponse, Snapshot};
use crate::output::{
    format_anomaly, format_mbps, format_ms, format_pct, format_phase, print_info, print_success,
    print_warning, OutputFormat,
};

pub async fn start(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response: SessionResponse = client.post("/session/start").await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => {
            if response.message.contains("already") {
                print_warning(&format!("{} (phase: {})", response.message, response.phase));
            } else {
                print_success(&format!("{} (phase: {})", response.message, response.phase));
            }
        }
    }
    Ok(())
}

pub async fn stop(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response: SessionResponse = client.post("/session/stop").await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => {
            if response.message.contains("no active") {
                print_warning(&response.message);
            } else {
                print_success(&response.message);
            }
        }
    }
    Ok(())
}

pub async fn reset(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response: SessionResponse = client.post("/session/reset").await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => print_success(&response.message),
    }
    Ok(())
}

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Window Avg")]
    average: String,
}

pub async fn status(client: &ApiClient, format: OutputFormat, verbose: bool) -> Result<()> {
    let snapshot: Snapshot = client.get("/session/snapshot").await?;

    if format == OutputFormat::Json || verbose {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_info(&format!(
        "Session: {}  State: {}  Ticks: {} ({} skipped)",
        format_phase(&snapshot.phase),
        format_anomaly(snapshot.is_anomalous),
        snapshot.ticks,
        snapshot.skipped_ticks,
    ));

    let rows = vec![
        channel_row("Latency", &snapshot.latency_ms, format_ms),
        channel_row("Bandwidth", &snapshot.bandwidth_mbps, format_mbps),
        channel_row("Packet loss", &snapshot.packet_loss_pct, format_pct),
        channel_row("Connections", &snapshot.active_connections, |v| {
            format!("{}", v as u32)
        }),
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if !snapshot.alerts.is_empty() {
        print_warning(&format!("{} alert(s) in the log", snapshot.alerts.len()));
    }
    Ok(())
}

fn channel_row(name: &str, values: &[f64], fmt: impl Fn(f64) -> String) -> ChannelRow {
    let latest = values.last().copied().unwrap_or(0.0);
    let average = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    ChannelRow {
        metric: name.to_string(),
        latest: fmt(latest),
        average: fmt(average),
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Detected At")]
    detected_at: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub async fn alerts(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let snapshot: Snapshot = client.get("/session/snapshot").await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot.alerts)?),
        OutputFormat::Table => {
            if snapshot.alerts.is_empty() {
                print_info("No alerts recorded");
                return Ok(());
            }

            // Newest-first, as the log stores them
            let rows: Vec<AlertRow> = snapshot
                .alerts
                .iter()
                .map(|alert| AlertRow {
                    detected_at: alert.detected_at.format("%H:%M:%S").to_string(),
                    message: alert.message.clone(),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_row_uses_last_value() {
        let row = channel_row("Latency", &[0.0, 10.0, 50.0], format_ms);
        assert_eq!(row.latest, "50.00 ms");
        assert_eq!(row.average, "20.00 ms");
    }

    #[test]
    fn test_channel_row_handles_empty_window() {
        let row = channel_row("Latency", &[], format_ms);
        assert_eq!(row.latest, "0.00 ms");
        assert_eq!(row.average, "0.00 ms");
    }
}
