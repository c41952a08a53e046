pub mod scheduler;

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SimulationError;
use crate::render::{Clock, DashboardView, Frame, SystemClock};
use crate::simulation::{
    AutomationEvaluator, EnvironmentSimulator, NoiseSource, Scenario, SeededNoise,
    SimulatorConfig, Thresholds,
};

pub use scheduler::{tick_interval, RecurringTask, SpeedControl, BASE_TICK_INTERVAL_MS};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let dashboard = Arc::new(Dashboard::from_config(&cfg)?);
        Ok(Self { cfg, dashboard })
    }
}

/// Log every rendered frame until the dashboard is dropped
pub fn spawn_render_logger(dashboard: &Dashboard) {
    let mut frames = dashboard.subscribe();
    tokio::spawn(async move {
        while frames.changed().await.is_ok() {
            let frame = *frames.borrow_and_update();
            let view = DashboardView::from_frame(&frame);
            info!(
                solar = %view.solar,
                temperature = %view.temperature,
                humidity = %view.humidity,
                heater = %view.heater,
                fan = %view.fan,
                last_updated = %view.last_updated,
                "dashboard"
            );
        }
        warn!("render channel closed");
    });
}

/// Simulator plus everything a tick needs to publish a frame
struct Core {
    simulator: EnvironmentSimulator,
    evaluator: AutomationEvaluator,
    clock: Arc<dyn Clock>,
    frames: watch::Sender<Frame>,
    steps: u64,
}

impl Core {
    fn tick(&mut self) -> Frame {
        let state = self.simulator.step();
        self.steps += 1;
        debug!(
            step = self.steps,
            phase = state.phase,
            solar_w = state.solar_w,
            temperature_c = state.temperature_c,
            humidity_pct = state.humidity_pct,
            "simulation step"
        );
        self.render()
    }

    fn render(&self) -> Frame {
        let frame = Frame::capture(self.simulator.state(), &self.evaluator, self.clock.as_ref());
        self.frames.send_replace(frame);
        frame
    }
}

struct Schedule {
    speed: SpeedControl,
    task: RecurringTask,
}

/// One independent simulated dashboard
///
/// Owns the environment state, the recurring tick and the render channel.
/// Ticks and control calls serialize on the same lock, so a step and its
/// render always complete before anything else touches the state.
/// Dropping the dashboard cancels the schedule.
pub struct Dashboard {
    core: Arc<Mutex<Core>>,
    schedule: Mutex<Schedule>,
    frames: watch::Receiver<Frame>,
}

impl Dashboard {
    /// Create an idle dashboard and render its initial frame
    pub fn new(
        config: SimulatorConfig,
        speed: SpeedControl,
        noise: Box<dyn NoiseSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let evaluator = AutomationEvaluator::new(config.thresholds);
        let simulator = EnvironmentSimulator::new(config, noise);
        let initial = Frame::capture(simulator.state(), &evaluator, clock.as_ref());
        let (tx, rx) = watch::channel(initial);

        let core = Arc::new(Mutex::new(Core {
            simulator,
            evaluator,
            clock,
            frames: tx,
            steps: 0,
        }));

        let tick_core = Arc::clone(&core);
        let task = RecurringTask::new(Arc::new(move || {
            tick_core.lock().tick();
        }));

        Self {
            core,
            schedule: Mutex::new(Schedule { speed, task }),
            frames: rx,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let sim = &cfg.simulation;
        let speed = SpeedControl::new(sim.base_interval_ms, sim.speed_multiplier)?;
        let config = SimulatorConfig {
            phase_increment: sim.phase_increment,
            initial_temperature_c: sim.initial_temperature_c,
            initial_humidity_pct: sim.initial_humidity_pct,
            thresholds: cfg.thresholds,
        };
        Ok(Self::new(
            config,
            speed,
            Box::new(SeededNoise::new(sim.random_seed)),
            Arc::new(SystemClock),
        ))
    }

    /// Begin stepping on the current interval. No-op when already running.
    pub fn start(&self) -> bool {
        let mut schedule = self.schedule.lock();
        let interval = schedule.speed.interval();
        let started = schedule.task.start(interval);
        if started {
            info!(interval_ms = interval.as_millis() as u64, "simulation started");
        }
        started
    }

    /// Stop stepping. No-op when already idle.
    pub fn stop(&self) -> bool {
        let stopped = self.schedule.lock().task.stop();
        if stopped {
            info!("simulation stopped");
        }
        stopped
    }

    /// Release the schedule; the dashboard stays readable but idle
    pub fn shutdown(&self) {
        self.stop();
    }

    pub fn is_running(&self) -> bool {
        self.schedule.lock().task.is_active()
    }

    /// Change the speed multiplier
    ///
    /// A running schedule is cancelled and restarted on the new interval; the
    /// next tick lands one new interval from now.
    pub fn set_speed(&self, multiplier: f64) -> Result<Duration, SimulationError> {
        let mut schedule = self.schedule.lock();
        let interval = schedule.speed.set_multiplier(multiplier)?;
        let rescheduled = schedule.task.reschedule(interval);
        info!(
            multiplier,
            interval_ms = interval.as_millis() as u64,
            rescheduled,
            "simulation speed changed"
        );
        Ok(interval)
    }

    pub fn speed(&self) -> f64 {
        self.schedule.lock().speed.multiplier()
    }

    pub fn tick_interval(&self) -> Duration {
        self.schedule.lock().speed.interval()
    }

    /// Step once immediately, independent of the schedule
    pub fn step_now(&self) -> Frame {
        self.core.lock().tick()
    }

    /// Apply a scenario preset and render straight away
    ///
    /// The rendered solar reading is the one from the last step; it catches up
    /// with the new phase on the next tick.
    pub fn apply_scenario(&self, scenario: Scenario) -> Frame {
        let mut core = self.core.lock();
        let state = core.simulator.apply_scenario(scenario);
        info!(
            %scenario,
            phase = state.phase,
            temperature_c = state.temperature_c,
            humidity_pct = state.humidity_pct,
            "scenario applied"
        );
        core.render()
    }

    pub fn latest_frame(&self) -> Frame {
        *self.frames.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.core.lock().evaluator.thresholds()
    }

    /// Number of steps taken since creation
    pub fn steps(&self) -> u64 {
        self.core.lock().steps
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::FixedClock;
    use crate::simulation::FixedNoise;
    use chrono::{Local, TimeZone};
    use tokio::time::sleep;

    fn dashboard(multiplier: f64) -> Dashboard {
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        Dashboard::new(
            SimulatorConfig::default(),
            SpeedControl::new(BASE_TICK_INTERVAL_MS, multiplier).unwrap(),
            Box::new(FixedNoise::centered()),
            Arc::new(clock),
        )
    }

    #[test]
    fn test_initial_frame_rendered_on_creation() {
        let dash = dashboard(1.0);
        let frame = dash.latest_frame();

        assert_eq!(frame.environment.temperature_c, 28.0);
        assert_eq!(frame.environment.humidity_pct, 55.0);
        assert_eq!(frame.environment.solar_w, 0);
        assert!(!frame.automation.heater_on);
        assert!(!frame.automation.fan_on);
        assert!(!dash.is_running());
        assert_eq!(dash.steps(), 0);
    }

    #[test]
    fn test_scenario_renders_immediately() {
        let dash = dashboard(1.0);
        let mut frames = dash.subscribe();

        let frame = dash.apply_scenario(Scenario::ColdNight);
        assert_eq!(frame.environment.temperature_c, 25.0);
        assert_eq!(frame.environment.humidity_pct, 59.0);
        assert!(frames.has_changed().unwrap());
        assert_eq!(*frames.borrow_and_update(), frame);

        let frame = dash.apply_scenario(Scenario::ColdNight);
        assert_eq!(frame.environment.temperature_c, 22.0);
        assert!(frame.automation.heater_on);
        assert!(frame.automation.fan_on);
    }

    #[test]
    fn test_set_speed_while_idle() {
        let dash = dashboard(1.0);
        assert_eq!(dash.set_speed(2.0).unwrap(), Duration::from_millis(1000));
        assert_eq!(dash.set_speed(0.5).unwrap(), Duration::from_millis(4000));
        assert_eq!(
            dash.set_speed(-1.0),
            Err(SimulationError::InvalidSpeed(-1.0))
        );
        assert_eq!(dash.speed(), 0.5);
        assert_eq!(dash.tick_interval(), Duration::from_millis(4000));
        assert!(!dash.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_interval() {
        let dash = dashboard(1.0);
        assert!(dash.start());
        assert!(!dash.start());

        sleep(Duration::from_millis(2001)).await;
        assert_eq!(dash.steps(), 1);
        assert!((dash.latest_frame().environment.phase - 0.06).abs() < 1e-12);

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(dash.steps(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticks() {
        let dash = dashboard(1.0);
        assert!(!dash.stop());

        dash.start();
        sleep(Duration::from_millis(2001)).await;
        assert!(dash.stop());
        assert!(!dash.is_running());

        sleep(Duration::from_millis(10_000)).await;
        assert_eq!(dash.steps(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_reschedules_running_timer() {
        let dash = dashboard(1.0);
        dash.start();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(dash.steps(), 0);

        dash.set_speed(2.0).unwrap();
        assert!(dash.is_running());

        sleep(Duration::from_millis(999)).await;
        assert_eq!(dash.steps(), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(dash.steps(), 1);
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(dash.steps(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_now_and_shutdown() {
        let dash = dashboard(1.0);
        let frame = dash.step_now();
        assert_eq!(dash.steps(), 1);
        assert_eq!(dash.latest_frame(), frame);

        dash.start();
        dash.shutdown();
        sleep(Duration::from_millis(5000)).await;
        assert_eq!(dash.steps(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_dashboards() {
        let a = dashboard(1.0);
        let b = dashboard(2.0);
        a.start();
        b.start();

        sleep(Duration::from_millis(2001)).await;
        assert_eq!(a.steps(), 1);
        assert_eq!(b.steps(), 2);
    }
}
