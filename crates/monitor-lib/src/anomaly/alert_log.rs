//! Bounded, edge-triggered alert log
//!
//! Turns the per-tick anomaly boolean into discrete entries: one line per
//! anomaly episode (the entry edge), not one per tick. The log owns the
//! session-wide anomaly flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default maximum number of retained alert entries
const DEFAULT_CAPACITY: usize = 10;

/// One recorded anomaly episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEntry {
    pub message: String,
    pub detected_at: DateTime<Utc>,
}

/// Newest-first log of anomaly episodes, bounded and deduplicated
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<AlertEntry>,
    capacity: usize,
    is_anomalous: bool,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            is_anomalous: false,
        }
    }

    /// Feed one tick's verdict into the log
    ///
    /// Records an entry only on the false→true transition, embedding the
    /// detection time and the latest latency and packet-loss readings.
    /// The true→false transition clears the flag without an entry.
    /// Returns the new entry when one was recorded.
    pub fn observe(
        &mut self,
        anomalous: bool,
        latency_ms: f64,
        packet_loss_pct: f64,
        at: DateTime<Utc>,
    ) -> Option<&AlertEntry> {
        if anomalous && !self.is_anomalous {
            self.is_anomalous = true;
            let message = format!(
                "Anomaly detected at {} - latency: {:.2} ms, packet loss: {:.2}%",
                at.format("%H:%M:%S"),
                latency_ms,
                packet_loss_pct
            );
            self.entries.push_front(AlertEntry {
                message,
                detected_at: at,
            });
            self.entries.truncate(self.capacity);
            self.entries.front()
        } else if !anomalous && self.is_anomalous {
            self.is_anomalous = false;
            None
        } else {
            None
        }
    }

    /// Whether the session is currently inside an anomaly episode
    pub fn is_anomalous(&self) -> bool {
        self.is_anomalous
    }

    /// Entries newest-first
    pub fn entries(&self) -> Vec<AlertEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear entries and the anomaly flag
    pub fn reset(&mut self) {
        self.entries.clear();
        self.is_anomalous = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_consecutive_anomalous_ticks_record_one_entry() {
        let mut log = AlertLog::new(10);

        assert!(log.observe(true, 250.0, 6.0, at(0)).is_some());
        for i in 1..8 {
            assert!(log.observe(true, 250.0, 6.0, at(i)).is_none());
        }

        assert_eq!(log.len(), 1);
        assert!(log.is_anomalous());
    }

    #[test]
    fn test_recovery_then_new_episode_records_second_entry() {
        let mut log = AlertLog::new(10);

        log.observe(true, 250.0, 6.0, at(0));
        // Exit edge clears the flag without an entry
        assert!(log.observe(false, 50.0, 0.5, at(1)).is_none());
        assert!(!log.is_anomalous());

        assert!(log.observe(true, 300.0, 7.0, at(2)).is_some());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_quiet_ticks_record_nothing() {
        let mut log = AlertLog::new(10);

        for i in 0..5 {
            assert!(log.observe(false, 50.0, 0.5, at(i)).is_none());
        }
        assert!(log.is_empty());
        assert!(!log.is_anomalous());
    }

    #[test]
    fn test_capacity_bound_evicts_oldest_newest_first() {
        let mut log = AlertLog::new(10);

        for i in 0..15 {
            log.observe(true, 250.0, 6.0, at(i * 2));
            log.observe(false, 50.0, 0.5, at(i * 2 + 1));
        }

        assert_eq!(log.len(), 10);
        let entries = log.entries();
        // Newest first: the 15th episode leads, the first five are evicted
        assert_eq!(entries[0].detected_at, at(28));
        assert_eq!(entries[9].detected_at, at(10));
    }

    #[test]
    fn test_message_embeds_time_and_latest_readings() {
        let mut log = AlertLog::new(10);
        let entry = log.observe(true, 217.384, 6.251, at(0)).unwrap();

        assert!(entry.message.contains("217.38 ms"));
        assert!(entry.message.contains("6.25%"));
        assert!(entry.message.starts_with("Anomaly detected at "));
    }

    #[test]
    fn test_reset_clears_entries_and_flag() {
        let mut log = AlertLog::new(10);
        log.observe(true, 250.0, 6.0, at(0));

        log.reset();

        assert!(log.is_empty());
        assert!(!log.is_anomalous());
        // A fresh episode records again after reset
        assert!(log.observe(true, 250.0, 6.0, at(1)).is_some());
    }
}
