//! Output formatting helpers

use clap::ValueEnum;
use colored::Colorize;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table output
    Table,
    /// JSON output for scripting
    Json,
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "→".blue().bold(), message);
}

/// Colorize a session phase for table output
pub fn format_phase(phase: &str) -> String {
    match phase {
        "running" => phase.green().to_string(),
        "connecting" => phase.yellow().to_string(),
        "idle" => phase.dimmed().to_string(),
        other => other.to_string(),
    }
}

/// Colorize the anomaly flag
pub fn format_anomaly(is_anomalous: bool) -> String {
    if is_anomalous {
        "ANOMALOUS".red().bold().to_string()
    } else {
        "nominal".green().to_string()
    }
}

pub fn format_ms(value: f64) -> String {
    format!("{:.2} ms", value)
}

pub fn format_mbps(value: f64) -> String {
    format!("{:.2} Mbps", value)
}

pub fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_formatting() {
        assert_eq!(format_ms(52.137), "52.14 ms");
        assert_eq!(format_mbps(98.0), "98.00 Mbps");
        assert_eq!(format_pct(0.5), "0.50%");
    }

    #[test]
    fn test_unknown_phase_passes_through() {
        assert_eq!(format_phase("draining"), "draining");
    }
}
