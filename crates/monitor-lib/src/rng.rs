//! Injectable randomness for the sampler and evaluator
//!
//! All random draws in the monitoring loop go through the [`RandomSource`]
//! trait so that anomaly-triggering scenarios are reproducible in tests.
//! Nothing in the library reaches for an ambient global generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use thiserror::Error;

/// Error produced when a random source cannot yield a value
#[derive(Debug, Error)]
pub enum RngError {
    /// A scripted source ran out of draws
    #[error("random source exhausted")]
    Exhausted,
}

/// Source of uniform draws in `[0, 1)`
///
/// A failed draw is recoverable: the controller skips the tick and keeps
/// the session alive.
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> Result<f64, RngError>;
}

/// Seedable source backed by [`StdRng`]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Create a source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a source with a fixed seed for reproducible streams
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> Result<f64, RngError> {
        Ok(self.rng.gen::<f64>())
    }
}

/// Scripted source that replays a fixed sequence of draws
///
/// Used by tests to force or suppress spikes and random triggers. An
/// exhausting sequence errors once the script runs out, which exercises
/// the skipped-tick path; a cycling sequence wraps around forever.
pub struct FixedSequence {
    draws: VecDeque<f64>,
    cycle: Vec<f64>,
}

impl FixedSequence {
    /// Sequence that errors with [`RngError::Exhausted`] once consumed
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into().into(),
            cycle: Vec::new(),
        }
    }

    /// Sequence that wraps around instead of exhausting
    pub fn cycling(draws: impl Into<Vec<f64>>) -> Self {
        let cycle = draws.into();
        Self {
            draws: cycle.clone().into(),
            cycle,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> Result<f64, RngError> {
        if self.draws.is_empty() && !self.cycle.is_empty() {
            self.draws = self.cycle.clone().into();
        }
        self.draws.pop_front().ok_or(RngError::Exhausted)
    }
}
