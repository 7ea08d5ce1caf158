//! Synthetic network-metric generation
//!
//! Produces one sample per call, simulating jitter around fixed baselines
//! with occasional bursty degradation. All randomness comes from the
//! injected [`RandomSource`], so a seeded source replays the exact same
//! stream.

use chrono::{DateTime, Utc};

use crate::models::MetricSample;
use crate::rng::{RandomSource, RngError};

/// Baseline latency in milliseconds
const BASE_LATENCY_MS: f64 = 50.0;
/// Baseline bandwidth in Mbps
const BASE_BANDWIDTH_MBPS: f64 = 100.0;
/// Baseline packet loss in percent
const BASE_PACKET_LOSS_PCT: f64 = 0.5;
/// Baseline active connection count
const BASE_CONNECTIONS: f64 = 35.0;

/// Generates synthetic samples with jitter and occasional spikes
#[derive(Debug, Clone)]
pub struct MetricSampler {
    /// Probability per call of a degradation spike
    pub spike_probability: f64,
}

impl Default for MetricSampler {
    fn default() -> Self {
        Self {
            spike_probability: 0.05,
        }
    }
}

impl MetricSampler {
    pub fn new(spike_probability: f64) -> Self {
        Self { spike_probability }
    }

    /// Generate one sample timestamped at `at`
    ///
    /// Draws five values from the source: one per metric channel plus the
    /// spike decision. A spike triples latency, halves bandwidth and
    /// multiplies packet loss by five; connections are unaffected. No
    /// clamping is applied, values track the raw perturbation.
    pub fn generate(
        &self,
        rng: &mut dyn RandomSource,
        at: DateTime<Utc>,
    ) -> Result<MetricSample, RngError> {
        let mut latency = BASE_LATENCY_MS + rng.next_f64()? * 30.0 - 15.0;
        let mut bandwidth = BASE_BANDWIDTH_MBPS + rng.next_f64()? * 20.0 - 10.0;
        let mut packet_loss = BASE_PACKET_LOSS_PCT + rng.next_f64()? * 1.0 - 0.5;
        let connections = (BASE_CONNECTIONS + (rng.next_f64()? * 10.0).floor() - 5.0) as u32;

        let spike = rng.next_f64()? > 1.0 - self.spike_probability;
        if spike {
            latency *= 3.0;
            bandwidth *= 0.5;
            packet_loss *= 5.0;
        }

        Ok(MetricSample {
            timestamp: at,
            latency_ms: latency,
            bandwidth_mbps: bandwidth,
            packet_loss_pct: packet_loss,
            active_connections: connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSequence, StdRandom};

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_sample_within_jitter_bounds_without_spike() {
        let sampler = MetricSampler::default();
        // Last draw 0.0 suppresses the spike
        let mut rng = FixedSequence::new([0.5, 0.5, 0.5, 0.5, 0.0]);

        let sample = sampler.generate(&mut rng, now()).unwrap();
        assert_eq!(sample.latency_ms, 50.0);
        assert_eq!(sample.bandwidth_mbps, 100.0);
        assert_eq!(sample.packet_loss_pct, 0.5);
        assert_eq!(sample.active_connections, 35);
    }

    #[test]
    fn test_spike_multiplies_channels() {
        let sampler = MetricSampler::default();
        // Spike draw 0.99 > 0.95 forces the burst
        let mut rng = FixedSequence::new([0.5, 0.5, 0.5, 0.5, 0.99]);

        let sample = sampler.generate(&mut rng, now()).unwrap();
        assert_eq!(sample.latency_ms, 150.0);
        assert_eq!(sample.bandwidth_mbps, 50.0);
        assert_eq!(sample.packet_loss_pct, 2.5);
        // Connections are not amplified by a spike
        assert_eq!(sample.active_connections, 35);
    }

    #[test]
    fn test_extreme_draws_stay_within_ranges() {
        let sampler = MetricSampler::default();

        let mut low = FixedSequence::new([0.0, 0.0, 0.0, 0.0, 0.0]);
        let s = sampler.generate(&mut low, now()).unwrap();
        assert_eq!(s.latency_ms, 35.0);
        assert_eq!(s.bandwidth_mbps, 90.0);
        assert_eq!(s.packet_loss_pct, 0.0);
        assert_eq!(s.active_connections, 30);

        let mut high = FixedSequence::new([0.9999, 0.9999, 0.9999, 0.9499, 0.0]);
        let s = sampler.generate(&mut high, now()).unwrap();
        assert!(s.latency_ms < 65.0 && s.latency_ms > 64.9);
        assert!(s.bandwidth_mbps < 110.0);
        assert!(s.packet_loss_pct < 1.0);
        assert_eq!(s.active_connections, 39);
    }

    #[test]
    fn test_deterministic_with_fixed_seed() {
        let sampler = MetricSampler::default();
        let mut a = StdRandom::seeded(1234);
        let mut b = StdRandom::seeded(1234);
        let at = now();

        for _ in 0..50 {
            let sa = sampler.generate(&mut a, at).unwrap();
            let sb = sampler.generate(&mut b, at).unwrap();
            assert_eq!(sa.latency_ms, sb.latency_ms);
            assert_eq!(sa.bandwidth_mbps, sb.bandwidth_mbps);
            assert_eq!(sa.packet_loss_pct, sb.packet_loss_pct);
            assert_eq!(sa.active_connections, sb.active_connections);
        }
    }

    #[test]
    fn test_exhausted_source_propagates_error() {
        let sampler = MetricSampler::default();
        let mut rng = FixedSequence::new([0.5, 0.5]);

        assert!(sampler.generate(&mut rng, now()).is_err());
    }
}
