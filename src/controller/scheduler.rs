use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use crate::error::{Result, SimulationError};

/// Default real-time interval between steps at 1.0× speed
pub const BASE_TICK_INTERVAL_MS: u64 = 2000;

/// Interval between steps for a speed multiplier: `round(base / multiplier)` ms
///
/// Never shorter than 1 ms.
pub fn tick_interval(base_interval_ms: u64, multiplier: f64) -> Result<Duration> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(SimulationError::InvalidSpeed(multiplier));
    }
    let ms = (base_interval_ms as f64 / multiplier).round();
    // saturating float->int cast keeps absurdly slow speeds representable
    Ok(Duration::from_millis((ms as u64).max(1)))
}

/// Speed multiplier and the tick interval it implies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControl {
    base_interval_ms: u64,
    multiplier: f64,
    interval: Duration,
}

impl SpeedControl {
    pub fn new(base_interval_ms: u64, multiplier: f64) -> Result<Self> {
        Ok(Self {
            base_interval_ms,
            multiplier,
            interval: tick_interval(base_interval_ms, multiplier)?,
        })
    }

    /// Change the multiplier; an invalid value leaves the current speed in place
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<Duration> {
        self.interval = tick_interval(self.base_interval_ms, multiplier)?;
        self.multiplier = multiplier;
        Ok(self.interval)
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SpeedControl {
    fn default() -> Self {
        Self {
            base_interval_ms: BASE_TICK_INTERVAL_MS,
            multiplier: 1.0,
            interval: Duration::from_millis(BASE_TICK_INTERVAL_MS),
        }
    }
}

pub type TickFn = Arc<dyn Fn() + Send + Sync>;

/// A recurring tick on the tokio timer
///
/// At most one schedule is active at a time. The first tick fires one full
/// period after `start`. Ticks run to completion; a tick that overruns its
/// period delays the next one instead of bursting.
pub struct RecurringTask {
    on_tick: TickFn,
    handle: Option<JoinHandle<()>>,
}

impl RecurringTask {
    pub fn new(on_tick: TickFn) -> Self {
        Self {
            on_tick,
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Schedule the tick every `period`. No-op when already active.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, period: Duration) -> bool {
        if self.handle.is_some() {
            return false;
        }
        let on_tick = Arc::clone(&self.on_tick);
        let first = Instant::now() + period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        }));
        debug!(period_ms = period.as_millis() as u64, "recurring task scheduled");
        true
    }

    /// Cancel the schedule. No-op when idle.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!("recurring task cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel and reschedule with a new period, only if currently active
    pub fn reschedule(&mut self, period: Duration) -> bool {
        if self.stop() {
            self.start(period)
        } else {
            false
        }
    }
}

impl Drop for RecurringTask {
    fn drop(&mut self) {
        self.stop();
    }
}
