//! Observability infrastructure for the monitor
//!
//! Provides:
//! - Prometheus metrics (tick counters, tick duration, alert log depth,
//!   session state)
//! - Structured JSON logging with tracing for session lifecycle events

use prometheus::{
    register_histogram, register_int_counter, register_int_gauge, Histogram, IntCounter, IntGauge,
};
use std::sync::OnceLock;
use tracing::info;

/// Histogram buckets for tick duration (in seconds)
const TICK_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

struct MonitorMetricsInner {
    ticks_total: IntCounter,
    ticks_skipped_total: IntCounter,
    anomalies_total: IntCounter,
    alert_log_entries: IntGauge,
    session_running: IntGauge,
    tick_duration_seconds: Histogram,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            ticks_total: register_int_counter!(
                "netpulse_ticks_total",
                "Total number of completed sampling ticks"
            )
            .expect("Failed to register ticks_total"),

            ticks_skipped_total: register_int_counter!(
                "netpulse_ticks_skipped_total",
                "Total number of ticks skipped due to a failed random draw"
            )
            .expect("Failed to register ticks_skipped_total"),

            anomalies_total: register_int_counter!(
                "netpulse_anomalies_total",
                "Total number of anomaly episodes recorded"
            )
            .expect("Failed to register anomalies_total"),

            alert_log_entries: register_int_gauge!(
                "netpulse_alert_log_entries",
                "Number of entries currently in the alert log"
            )
            .expect("Failed to register alert_log_entries"),

            session_running: register_int_gauge!(
                "netpulse_session_running",
                "Whether a monitoring session is currently ticking (0/1)"
            )
            .expect("Failed to register session_running"),

            tick_duration_seconds: register_histogram!(
                "netpulse_tick_duration_seconds",
                "Time spent inside one sampling-and-evaluation tick",
                TICK_BUCKETS.to_vec()
            )
            .expect("Failed to register tick_duration_seconds"),
        }
    }
}

/// Monitor metrics for Prometheus exposition
///
/// Lightweight handle to the global instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a metrics handle (initializes the global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn inc_ticks(&self) {
        self.inner().ticks_total.inc();
    }

    pub fn inc_skipped_ticks(&self) {
        self.inner().ticks_skipped_total.inc();
    }

    pub fn inc_anomalies(&self) {
        self.inner().anomalies_total.inc();
    }

    pub fn set_alert_log_entries(&self, count: i64) {
        self.inner().alert_log_entries.set(count);
    }

    pub fn set_session_running(&self, running: bool) {
        self.inner().session_running.set(i64::from(running));
    }

    pub fn observe_tick_duration(&self, duration_secs: f64) {
        self.inner().tick_duration_seconds.observe(duration_secs);
    }
}

/// Structured logger for session lifecycle events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "monitor_started",
            instance = %self.instance,
            version = %version,
            "NetPulse monitor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "monitor_shutdown",
            instance = %self.instance,
            reason = %reason,
            "NetPulse monitor shutting down"
        );
    }

}
