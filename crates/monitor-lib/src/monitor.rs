//! Monitoring session controller
//!
//! Owns the sliding window and alert log and drives the tick loop:
//! sampler → window → evaluator → alert log, once per tick period after a
//! simulated connect delay. The window and log are mutated only by the
//! tick task; readers take short read locks through [`snapshot`] and
//! [`export`].
//!
//! [`snapshot`]: MonitorController::snapshot
//! [`export`]: MonitorController::export

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::anomaly::{AlertLog, RuleEvaluator};
use crate::export::window_to_csv;
use crate::models::{MonitorSnapshot, SessionPhase};
use crate::observability::MonitorMetrics;
use crate::rng::{RandomSource, RngError};
use crate::sampler::MetricSampler;
use crate::window::{Channel, SlidingWindow};

/// Configuration for a monitoring session
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Window capacity per channel (default: 20)
    pub window_capacity: usize,
    /// Target tick cadence (default: 1s)
    pub tick_period: Duration,
    /// Simulated link setup delay before the first tick (default: 1.5s)
    pub connect_delay: Duration,
    /// Samples each evaluation rule inspects (default: 5)
    pub lookback: usize,
    /// Maximum retained alert entries (default: 10)
    pub alert_capacity: usize,
    /// Probability per tick of a sampler degradation spike (default: 5%)
    pub spike_probability: f64,
    /// Probability per tick of the random anomaly trigger (default: 5%)
    pub random_trigger_probability: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_capacity: 20,
            tick_period: Duration::from_secs(1),
            connect_delay: Duration::from_millis(1500),
            lookback: 5,
            alert_capacity: 10,
            spike_probability: 0.05,
            random_trigger_probability: 0.05,
        }
    }
}

/// Session state owned by the controller, mutated only by the tick task
struct SessionState {
    window: SlidingWindow,
    alerts: AlertLog,
    phase: SessionPhase,
    ticks: u64,
    skipped_ticks: u64,
}

/// Everything one tick needs, shared with the spawned session task
#[derive(Clone)]
struct TickContext {
    state: Arc<RwLock<SessionState>>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    sampler: MetricSampler,
    evaluator: RuleEvaluator,
    metrics: MonitorMetrics,
}

struct SessionTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Orchestrates start/stop/reset and the periodic tick
pub struct MonitorController {
    config: MonitorConfig,
    ctx: TickContext,
    task: Mutex<Option<SessionTask>>,
}

impl MonitorController {
    /// Create a controller with an injected random source
    ///
    /// The same source feeds the sampler and the evaluator, so a seeded
    /// source replays the full sample and verdict sequence.
    pub fn new(config: MonitorConfig, rng: Box<dyn RandomSource>) -> Self {
        let state = SessionState {
            window: SlidingWindow::new(config.window_capacity),
            alerts: AlertLog::new(config.alert_capacity),
            phase: SessionPhase::Idle,
            ticks: 0,
            skipped_ticks: 0,
        };

        let ctx = TickContext {
            state: Arc::new(RwLock::new(state)),
            rng: Arc::new(Mutex::new(rng)),
            sampler: MetricSampler::new(config.spike_probability),
            evaluator: RuleEvaluator {
                lookback: config.lookback,
                random_trigger_probability: config.random_trigger_probability,
                ..RuleEvaluator::default()
            },
            metrics: MonitorMetrics::new(),
        };

        Self {
            config,
            ctx,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Begin a session: Idle → Connecting → Running
    ///
    /// Spawns the tick task; no-op when already Connecting or Running.
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.is_some() {
            debug!("start ignored, session already active");
            return;
        }

        self.ctx.state.write().unwrap().phase = SessionPhase::Connecting;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_session(
            self.ctx.clone(),
            self.config.connect_delay,
            self.config.tick_period,
            shutdown_rx,
        ));
        *task = Some(SessionTask {
            shutdown: shutdown_tx,
            handle,
        });

        info!(
            tick_period_ms = self.config.tick_period.as_millis() as u64,
            connect_delay_ms = self.config.connect_delay.as_millis() as u64,
            "Monitoring session starting"
        );
    }

    /// End the session: Running/Connecting → Idle
    ///
    /// Waits for the tick task to finish, so no tick fires after this
    /// returns. Session data is kept; only [`reset`](Self::reset) clears it.
    /// No-op when Idle.
    pub async fn stop(&self) {
        let task = self.task.lock().unwrap().take();
        let Some(task) = task else {
            debug!("stop ignored, no active session");
            return;
        };

        let _ = task.shutdown.send(true);
        let _ = task.handle.await;

        let ticks = {
            let mut state = self.ctx.state.write().unwrap();
            state.phase = SessionPhase::Idle;
            state.ticks
        };
        self.ctx.metrics.set_session_running(false);
        info!(ticks = ticks, "Monitoring session stopped");
    }

    /// Discard session data: zero-filled window, empty log, counters reset
    ///
    /// Callable in any phase; a running session keeps ticking against the
    /// cleared state.
    pub fn reset(&self) {
        let mut state = self.ctx.state.write().unwrap();
        state.window.reset();
        state.alerts.reset();
        state.ticks = 0;
        state.skipped_ticks = 0;
        drop(state);

        self.ctx.metrics.set_alert_log_entries(0);
        info!("Session state reset");
    }

    /// Read-only copy of the current session state; never blocks beyond
    /// the short lock hold
    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.ctx.state.read().unwrap();
        MonitorSnapshot {
            phase: state.phase,
            is_anomalous: state.alerts.is_anomalous(),
            latency_ms: state.window.channel(Channel::Latency),
            bandwidth_mbps: state.window.channel(Channel::Bandwidth),
            packet_loss_pct: state.window.channel(Channel::PacketLoss),
            active_connections: state.window.channel(Channel::Connections),
            timestamps: state.window.timestamps(),
            alerts: state.alerts.entries(),
            ticks: state.ticks,
            skipped_ticks: state.skipped_ticks,
        }
    }

    /// Render the current window as CSV; callable in any phase
    pub fn export(&self) -> String {
        let state = self.ctx.state.read().unwrap();
        window_to_csv(&state.window)
    }

    pub fn phase(&self) -> SessionPhase {
        self.ctx.state.read().unwrap().phase
    }
}

/// The spawned session task: connect delay, then the tick loop
async fn run_session(
    ctx: TickContext,
    connect_delay: Duration,
    tick_period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    // Simulated link setup; cancellable before the first tick
    tokio::select! {
        _ = tokio::time::sleep(connect_delay) => {}
        _ = shutdown.changed() => {
            debug!("session cancelled during connect");
            return;
        }
    }

    ctx.state.write().unwrap().phase = SessionPhase::Running;
    ctx.metrics.set_session_running(true);
    info!("Link established, sampling");

    let mut ticker = interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => run_tick(&ctx),
            _ = shutdown.changed() => break,
        }
    }
}

/// One sampling-and-evaluation cycle, run to completion without awaiting
///
/// All fallible draws happen before any state mutation, so a failed tick
/// leaves the window and log untouched.
fn run_tick(ctx: &TickContext) {
    let started = Instant::now();
    let now = Utc::now();

    let (sample, draw) = {
        let mut rng = ctx.rng.lock().unwrap();
        let sample = match ctx.sampler.generate(&mut **rng, now) {
            Ok(sample) => sample,
            Err(err) => return skip_tick(ctx, err),
        };
        let draw = match rng.next_f64() {
            Ok(draw) => draw,
            Err(err) => return skip_tick(ctx, err),
        };
        (sample, draw)
    };

    let mut state = ctx.state.write().unwrap();
    state.window.push(&sample);
    let verdict = ctx.evaluator.decide(&state.window, draw);

    if let Some(entry) = state.alerts.observe(
        verdict.anomalous,
        sample.latency_ms,
        sample.packet_loss_pct,
        now,
    ) {
        warn!(
            event = "anomaly_detected",
            message = %entry.message,
            high_latency = verdict.high_latency,
            packet_loss_spike = verdict.packet_loss_spike,
            bandwidth_drop = verdict.bandwidth_drop,
            random_trigger = verdict.random_trigger,
            "Anomaly episode recorded"
        );
        ctx.metrics.inc_anomalies();
    }

    state.ticks += 1;
    ctx.metrics.inc_ticks();
    ctx.metrics.set_alert_log_entries(state.alerts.len() as i64);
    drop(state);

    ctx.metrics.observe_tick_duration(started.elapsed().as_secs_f64());
}

/// Recoverable no-op: the random source failed, the session continues
fn skip_tick(ctx: &TickContext, err: RngError) {
    warn!(error = %err, "Random source failed, skipping tick");
    ctx.state.write().unwrap().skipped_ticks += 1;
    ctx.metrics.inc_skipped_ticks();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSequence, StdRandom};

    fn test_config() -> MonitorConfig {
        MonitorConfig::default()
    }

    fn seeded_controller() -> MonitorController {
        MonitorController::new(test_config(), Box::new(StdRandom::seeded(7)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_connect_delay_yields_zero_ticks() {
        let controller = seeded_controller();

        controller.start();
        assert_eq!(controller.phase(), SessionPhase::Connecting);
        controller.stop().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert_eq!(snapshot.ticks, 0);
        assert!(snapshot.latency_ms.iter().all(|v| *v == 0.0));
        assert!(snapshot.alerts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_cadence_under_virtual_clock() {
        let controller = seeded_controller();

        controller.start();
        // First tick fires right after the 1.5s connect delay, then every 1s
        tokio::time::sleep(Duration::from_millis(1500 + 2000 + 50)).await;
        controller.stop().await;

        assert_eq!(controller.snapshot().ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent_while_active() {
        let controller = seeded_controller();

        controller.start();
        controller.start();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        // Still one session: start while running is also a no-op
        controller.start();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        controller.stop().await;

        // A second task would have doubled the tick count
        assert_eq!(controller.snapshot().ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_fires_after_stop_returns() {
        let controller = seeded_controller();

        controller.start();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        controller.stop().await;

        let ticks = controller.snapshot().ticks;
        assert!(ticks > 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(controller.snapshot().ticks, ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_data_survives_stop_start_cycle() {
        let controller = seeded_controller();

        controller.start();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        controller.stop().await;

        let after_first = controller.snapshot();
        assert_eq!(after_first.ticks, 1);

        controller.start();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        controller.stop().await;

        // Window and counters carried over, not cleared by stop
        assert_eq!(controller.snapshot().ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_trigger_fires_anomaly_on_first_tick() {
        // Five sampler draws keep metrics quiet, the evaluator draw 0.99
        // trips the random trigger regardless of metric values.
        let rng = FixedSequence::new([0.5, 0.5, 0.5, 0.5, 0.0, 0.99]);
        let controller = MonitorController::new(test_config(), Box::new(rng));

        controller.start();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        controller.stop().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 1);
        assert!(snapshot.is_anomalous);
        assert_eq!(snapshot.alerts.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_source_skips_ticks_without_corruption() {
        // Draws for exactly one tick; every later tick is skipped
        let rng = FixedSequence::new([0.5, 0.5, 0.5, 0.5, 0.0, 0.0]);
        let controller = MonitorController::new(test_config(), Box::new(rng));

        controller.start();
        tokio::time::sleep(Duration::from_millis(1500 + 3000 + 50)).await;

        // Session is still alive and ticking despite the failures
        assert_eq!(controller.phase(), SessionPhase::Running);
        controller.stop().await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 1);
        assert_eq!(snapshot.skipped_ticks, 3);
        // Exactly one genuine sample made it into the window
        let nonzero = snapshot
            .timestamps
            .iter()
            .filter(|ts| ts.is_some())
            .count();
        assert_eq!(nonzero, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_window_log_and_counters() {
        let controller = seeded_controller();

        controller.start();
        tokio::time::sleep(Duration::from_millis(1500 + 5000)).await;
        controller.stop().await;
        assert!(controller.snapshot().ticks > 0);

        controller.reset();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.ticks, 0);
        assert_eq!(snapshot.skipped_ticks, 0);
        assert!(!snapshot.is_anomalous);
        assert!(snapshot.alerts.is_empty());
        assert!(snapshot.latency_ms.iter().all(|v| *v == 0.0));
        assert!(snapshot.timestamps.iter().all(Option::is_none));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_sessions_replay_identically() {
        let run = |seed: u64| async move {
            let controller =
                MonitorController::new(test_config(), Box::new(StdRandom::seeded(seed)));
            controller.start();
            tokio::time::sleep(Duration::from_millis(1500 + 10_000)).await;
            controller.stop().await;
            controller.snapshot()
        };

        let a = run(42).await;
        let b = run(42).await;

        assert_eq!(a.ticks, b.ticks);
        assert_eq!(a.latency_ms, b.latency_ms);
        assert_eq!(a.bandwidth_mbps, b.bandwidth_mbps);
        assert_eq!(a.packet_loss_pct, b.packet_loss_pct);
        assert_eq!(a.is_anomalous, b.is_anomalous);
        assert_eq!(a.alerts.len(), b.alerts.len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_reflects_current_window_any_phase() {
        let controller = seeded_controller();

        let before = controller.export();
        assert_eq!(before.lines().count(), 21);

        controller.start();
        tokio::time::sleep(Duration::from_millis(1600)).await;
        let during = controller.export();
        controller.stop().await;

        assert_eq!(during.lines().count(), 21);
        assert_ne!(before, during);
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_a_noop() {
        let controller = seeded_controller();
        controller.stop().await;
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }
}
