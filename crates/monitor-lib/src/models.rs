//! Core data models for the network monitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::AlertEntry;

/// One synthetic network-metric sample, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Utc>,
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
    pub packet_loss_pct: f64,
    pub active_connections: u32,
}

/// Phase of the monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Not monitoring; session data may still hold earlier samples
    Idle,
    /// Link setup in progress, ticking has not begun
    Connecting,
    /// Ticking at the configured cadence
    Running,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Connecting => write!(f, "connecting"),
            SessionPhase::Running => write!(f, "running"),
        }
    }
}

/// Read-only view of the current session state
///
/// Channels are oldest-first and always hold exactly the window capacity,
/// zero-filled before the first sample so charts render flat at zero.
/// Alerts are newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub phase: SessionPhase,
    pub is_anomalous: bool,
    pub latency_ms: Vec<f64>,
    pub bandwidth_mbps: Vec<f64>,
    pub packet_loss_pct: Vec<f64>,
    pub active_connections: Vec<f64>,
    pub timestamps: Vec<Option<DateTime<Utc>>>,
    pub alerts: Vec<AlertEntry>,
    pub ticks: u64,
    pub skipped_ticks: u64,
}
