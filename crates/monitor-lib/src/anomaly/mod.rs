//! Anomaly detection for the metric stream
//!
//! This module provides:
//! - The rule-based evaluator over the most recent window samples
//! - The edge-triggered, bounded alert log

mod alert_log;
mod evaluator;

pub use alert_log::{AlertEntry, AlertLog};
pub use evaluator::{RuleEvaluator, Verdict};
