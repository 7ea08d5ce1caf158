//! Core library for the NetPulse real-time network monitor
//!
//! This crate provides the monitoring loop behind the dashboard's
//! real-time analysis view:
//! - Synthetic metric sampling with injectable randomness
//! - A fixed-capacity sliding window per metric channel
//! - Rule-based anomaly evaluation with edge-triggered alerting
//! - Session control (start/stop/reset), snapshots and CSV export
//! - Prometheus metrics and structured logging

pub mod anomaly;
pub mod export;
pub mod models;
pub mod monitor;
pub mod observability;
pub mod rng;
pub mod sampler;
pub mod window;

pub use anomaly::{AlertEntry, AlertLog, RuleEvaluator, Verdict};
pub use export::{window_to_csv, CSV_HEADER};
pub use models::{MetricSample, MonitorSnapshot, SessionPhase};
pub use monitor::{MonitorConfig, MonitorController};
pub use observability::{MonitorMetrics, StructuredLogger};
pub use rng::{FixedSequence, RandomSource, RngError, StdRandom};
pub use sampler::MetricSampler;
pub use window::{Channel, SlidingWindow};
