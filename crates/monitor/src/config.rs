//! Monitor configuration

use anyhow::Result;
use monitor_lib::MonitorConfig;
use serde::Deserialize;
use std::time::Duration;

/// Agent configuration, loaded from `NETPULSE_`-prefixed environment
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Instance name used in structured log events
    #[serde(default = "default_instance")]
    pub instance: String,

    /// API server port for the session, health and metrics endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Window capacity per metric channel
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// Tick period in milliseconds
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// Simulated connect delay in milliseconds
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Maximum retained alert entries
    #[serde(default = "default_alert_capacity")]
    pub alert_capacity: usize,

    /// Samples each evaluation rule inspects
    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Probability per tick of a sampler degradation spike
    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,

    /// Probability per tick of the random anomaly trigger
    #[serde(default = "default_random_trigger_probability")]
    pub random_trigger_probability: f64,

    /// Fixed seed for a reproducible metric stream (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_instance() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "netpulse".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_window_capacity() -> usize {
    20
}

fn default_tick_period_ms() -> u64 {
    1000
}

fn default_connect_delay_ms() -> u64 {
    1500
}

fn default_alert_capacity() -> usize {
    10
}

fn default_lookback() -> usize {
    5
}

fn default_spike_probability() -> f64 {
    0.05
}

fn default_random_trigger_probability() -> f64 {
    0.05
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            instance: default_instance(),
            api_port: default_api_port(),
            window_capacity: default_window_capacity(),
            tick_period_ms: default_tick_period_ms(),
            connect_delay_ms: default_connect_delay_ms(),
            alert_capacity: default_alert_capacity(),
            lookback: default_lookback(),
            spike_probability: default_spike_probability(),
            random_trigger_probability: default_random_trigger_probability(),
            seed: None,
        }
    }
}

impl AgentConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("NETPULSE"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_default())
    }

    /// Translate into the library's session configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            window_capacity: self.window_capacity,
            tick_period: Duration::from_millis(self.tick_period_ms),
            connect_delay: Duration::from_millis(self.connect_delay_ms),
            lookback: self.lookback,
            alert_capacity: self.alert_capacity,
            spike_probability: self.spike_probability,
            random_trigger_probability: self.random_trigger_probability,
        }
    }
}
