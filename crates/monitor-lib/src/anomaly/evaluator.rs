//! Rule-based anomaly evaluation
//!
//! Stateless rules over the most recent window samples, plus a flat-rate
//! random trigger standing in for a real model. The random draw comes from
//! the injected source so every decision is reproducible under a fixed
//! seed.

use crate::rng::{RandomSource, RngError};
use crate::window::{Channel, SlidingWindow};

/// Outcome of one evaluation, with the individual rule results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub anomalous: bool,
    pub high_latency: bool,
    pub packet_loss_spike: bool,
    pub bandwidth_drop: bool,
    pub random_trigger: bool,
}

/// Evaluates the anomaly rules against the window's recent samples
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    /// Number of recent samples each rule inspects
    pub lookback: usize,
    /// Latency above this is considered high (ms)
    pub latency_threshold_ms: f64,
    /// Packet loss above this is considered a spike (%)
    pub packet_loss_threshold_pct: f64,
    /// A step to below this fraction of the previous value is a drop
    pub bandwidth_drop_ratio: f64,
    /// Probability per evaluation of the random trigger
    pub random_trigger_probability: f64,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self {
            lookback: 5,
            latency_threshold_ms: 200.0,
            packet_loss_threshold_pct: 5.0,
            bandwidth_drop_ratio: 0.7,
            random_trigger_probability: 0.05,
        }
    }
}

impl RuleEvaluator {
    /// Evaluate the window, drawing the random trigger from `rng`
    pub fn evaluate(
        &self,
        window: &SlidingWindow,
        rng: &mut dyn RandomSource,
    ) -> Result<Verdict, RngError> {
        let draw = rng.next_f64()?;
        Ok(self.decide(window, draw))
    }

    /// Evaluate the window against a pre-taken draw
    ///
    /// The controller pre-draws before mutating any state so a failed tick
    /// is discarded as a unit.
    pub fn decide(&self, window: &SlidingWindow, draw: f64) -> Verdict {
        let high_latency = self.has_high_latency(&window.last(Channel::Latency, self.lookback));
        let packet_loss_spike =
            self.has_packet_loss_spike(&window.last(Channel::PacketLoss, self.lookback));
        let bandwidth_drop =
            self.has_bandwidth_drop(&window.last(Channel::Bandwidth, self.lookback));
        let random_trigger = draw > 1.0 - self.random_trigger_probability;

        Verdict {
            anomalous: (high_latency && (packet_loss_spike || bandwidth_drop)) || random_trigger,
            high_latency,
            packet_loss_spike,
            bandwidth_drop,
            random_trigger,
        }
    }

    fn has_high_latency(&self, values: &[f64]) -> bool {
        values.iter().any(|v| *v > self.latency_threshold_ms)
    }

    fn has_packet_loss_spike(&self, values: &[f64]) -> bool {
        values.iter().any(|v| *v > self.packet_loss_threshold_pct)
    }

    fn has_bandwidth_drop(&self, values: &[f64]) -> bool {
        values
            .windows(2)
            .any(|pair| pair[1] < pair[0] * self.bandwidth_drop_ratio)
    }
}
