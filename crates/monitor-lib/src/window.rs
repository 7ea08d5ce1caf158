//! Fixed-capacity sliding window over the metric channels
//!
//! Each channel keeps the last N values, oldest-first, backed by a ring
//! buffer. The window starts zero-filled so the presentation layer renders
//! flat-at-zero charts before the first tick; a fill counter tracks how
//! many genuine samples have been pushed so lookback rules never read the
//! zero padding.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::models::MetricSample;

/// One named metric stream tracked by the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Latency,
    Bandwidth,
    PacketLoss,
    Connections,
}

/// Last-N buffer per channel with FIFO eviction
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    latency: VecDeque<f64>,
    bandwidth: VecDeque<f64>,
    packet_loss: VecDeque<f64>,
    connections: VecDeque<f64>,
    timestamps: VecDeque<Option<DateTime<Utc>>>,
    /// Number of genuine samples pushed, saturating at capacity
    fill: usize,
}

impl SlidingWindow {
    /// Create a zero-filled window holding `capacity` slots per channel
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            latency: zeroed(capacity),
            bandwidth: zeroed(capacity),
            packet_loss: zeroed(capacity),
            connections: zeroed(capacity),
            timestamps: std::iter::repeat(None).take(capacity).collect(),
            fill: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of genuine samples currently held (≤ capacity)
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Append a sample to every channel, evicting the oldest slot
    pub fn push(&mut self, sample: &MetricSample) {
        push_evict(&mut self.latency, sample.latency_ms, self.capacity);
        push_evict(&mut self.bandwidth, sample.bandwidth_mbps, self.capacity);
        push_evict(&mut self.packet_loss, sample.packet_loss_pct, self.capacity);
        push_evict(
            &mut self.connections,
            f64::from(sample.active_connections),
            self.capacity,
        );

        self.timestamps.push_back(Some(sample.timestamp));
        if self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
        }

        self.fill = (self.fill + 1).min(self.capacity);
    }

    /// Last `k` genuinely-pushed values of a channel, oldest-first
    ///
    /// During warm-up fewer than `k` values are returned, without padding.
    pub fn last(&self, channel: Channel, k: usize) -> Vec<f64> {
        let series = self.series(channel);
        let take = k.min(self.fill);
        series.iter().skip(series.len() - take).copied().collect()
    }

    /// Full view of a channel, oldest-first, always `capacity` values
    pub fn channel(&self, channel: Channel) -> Vec<f64> {
        self.series(channel).iter().copied().collect()
    }

    /// Timestamp per slot, `None` for slots never populated
    pub fn timestamps(&self) -> Vec<Option<DateTime<Utc>>> {
        self.timestamps.iter().copied().collect()
    }

    /// Most recent genuine value of a channel, if any sample was pushed
    pub fn latest(&self, channel: Channel) -> Option<f64> {
        if self.fill == 0 {
            None
        } else {
            self.series(channel).back().copied()
        }
    }

    /// Restore the zero-filled initial state
    pub fn reset(&mut self) {
        *self = Self::new(self.capacity);
    }

    fn series(&self, channel: Channel) -> &VecDeque<f64> {
        match channel {
            Channel::Latency => &self.latency,
            Channel::Bandwidth => &self.bandwidth,
            Channel::PacketLoss => &self.packet_loss,
            Channel::Connections => &self.connections,
        }
    }
}

fn zeroed(capacity: usize) -> VecDeque<f64> {
    std::iter::repeat(0.0).take(capacity).collect()
}

fn push_evict(series: &mut VecDeque<f64>, value: f64, capacity: usize) {
    series.push_back(value);
    if series.len() > capacity {
        series.pop_front();
    }
}
