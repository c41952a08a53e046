//! # Environment Simulator
//!
//! Owns the single environment state (solar phase, temperature, humidity,
//! solar output) and advances it one discrete step at a time. Solar output
//! follows a half-wave sine "day" curve; temperature and humidity random-walk
//! inside fixed bounds.

use super::{
    automation::Thresholds,
    noise::NoiseSource,
    scenario::Scenario,
};
use serde::{Deserialize, Serialize};

/// Closed interval a reading is clamped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[cfg(test)]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const TEMPERATURE_BOUNDS_C: Bounds = Bounds::new(18.0, 40.0);
pub const HUMIDITY_BOUNDS_PCT: Bounds = Bounds::new(30.0, 90.0);
pub const SOLAR_BOUNDS_W: Bounds = Bounds::new(0.0, 1000.0);

/// Peak clear-sky solar output (W)
const SOLAR_PEAK_W: f64 = 800.0;
/// Solar noise amplitude (±W)
const SOLAR_NOISE_W: f64 = 30.0;
/// Temperature drift per step (±°C)
const TEMPERATURE_DRIFT_C: f64 = 0.6;
/// Warming per step at full sun (°C)
const SOLAR_WARMING_C: f64 = 0.1;
/// Humidity drift per step (±%)
const HUMIDITY_DRIFT_PCT: f64 = 0.8;
/// Minimum fan drying per step while over the humidity threshold (%)
const FAN_DRYING_BASE_PCT: f64 = 0.4;
/// Additional random fan drying, drawn from [0, this) (%)
const FAN_DRYING_SPREAD_PCT: f64 = 0.3;

/// Snapshot of the simulated environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Simulation-time accumulator driving the solar curve (unbounded)
    pub phase: f64,
    /// Air temperature in °C, always within [18, 40]
    pub temperature_c: f64,
    /// Relative humidity in %, always within [30, 90]
    pub humidity_pct: f64,
    /// Solar output in W, always within [0, 1000]
    pub solar_w: u32,
}

impl EnvironmentState {
    /// Day/night solar intensity in [0, 1] for the current phase
    pub fn solar_intensity(&self) -> f64 {
        self.phase.sin().max(0.0)
    }
}

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Phase advance per step, independent of simulation speed
    pub phase_increment: f64,
    pub initial_temperature_c: f64,
    pub initial_humidity_pct: f64,
    /// Humidity threshold doubles as the fan-drying trigger
    pub thresholds: Thresholds,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            phase_increment: 0.06,
            initial_temperature_c: 28.0,
            initial_humidity_pct: 55.0,
            thresholds: Thresholds::default(),
        }
    }
}

/// Advances the environment state one step at a time
pub struct EnvironmentSimulator {
    state: EnvironmentState,
    phase_increment: f64,
    thresholds: Thresholds,
    noise: Box<dyn NoiseSource>,
}

impl EnvironmentSimulator {
    /// Create a simulator at phase 0 with no solar output yet
    pub fn new(config: SimulatorConfig, noise: Box<dyn NoiseSource>) -> Self {
        let state = EnvironmentState {
            phase: 0.0,
            temperature_c: TEMPERATURE_BOUNDS_C.clamp(config.initial_temperature_c),
            humidity_pct: HUMIDITY_BOUNDS_PCT.clamp(config.initial_humidity_pct),
            solar_w: 0,
        };
        Self::from_state(state, config, noise)
    }

    /// Create a simulator resuming from an explicit state
    ///
    /// The initial temperature/humidity in `config` are ignored; readings in
    /// `state` are clamped into bounds.
    pub fn from_state(
        state: EnvironmentState,
        config: SimulatorConfig,
        noise: Box<dyn NoiseSource>,
    ) -> Self {
        Self {
            state: EnvironmentState {
                phase: state.phase,
                temperature_c: TEMPERATURE_BOUNDS_C.clamp(state.temperature_c),
                humidity_pct: HUMIDITY_BOUNDS_PCT.clamp(state.humidity_pct),
                solar_w: state.solar_w.min(SOLAR_BOUNDS_W.max as u32),
            },
            phase_increment: config.phase_increment,
            thresholds: config.thresholds,
            noise,
        }
    }

    pub fn state(&self) -> EnvironmentState {
        self.state
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Advance the environment by one step and return the new snapshot
    ///
    /// 1. phase advances by the fixed increment
    /// 2. solar output = 800 W × max(0, sin(phase)) ± 30 W, clamped and rounded
    /// 3. temperature drifts ±0.6 °C plus up to 0.1 °C of solar warming
    /// 4. humidity drifts ±0.8 %, and the fan dries it by 0.4–0.7 % when the
    ///    drifted value is over the humidity threshold
    pub fn step(&mut self) -> EnvironmentState {
        self.state.phase += self.phase_increment;
        let base = self.state.solar_intensity();

        let solar = SOLAR_PEAK_W * base + self.noise.uniform(-SOLAR_NOISE_W, SOLAR_NOISE_W);
        self.state.solar_w = SOLAR_BOUNDS_W.clamp(solar).round() as u32;

        let temperature = self.state.temperature_c
            + self.noise.uniform(-TEMPERATURE_DRIFT_C, TEMPERATURE_DRIFT_C)
            + base * SOLAR_WARMING_C;
        self.state.temperature_c = TEMPERATURE_BOUNDS_C.clamp(temperature);

        let mut humidity = self.state.humidity_pct
            + self.noise.uniform(-HUMIDITY_DRIFT_PCT, HUMIDITY_DRIFT_PCT);
        if humidity > self.thresholds.humidity_max_pct {
            humidity -= FAN_DRYING_BASE_PCT + self.noise.uniform(0.0, FAN_DRYING_SPREAD_PCT);
        }
        self.state.humidity_pct = HUMIDITY_BOUNDS_PCT.clamp(humidity);

        self.state
    }

    /// Shift the environment to a named weather condition
    ///
    /// Overrides the phase and nudges temperature/humidity by fixed, clamped
    /// deltas. `solar_w` is deliberately left untouched: it keeps the value
    /// from the previous step until the next [`step`](Self::step), so a frame
    /// rendered immediately afterwards shows a solar reading that does not yet
    /// match the new phase.
    pub fn apply_scenario(&mut self, scenario: Scenario) -> EnvironmentState {
        let shift = scenario.shift();
        self.state.phase = shift.phase;
        self.state.temperature_c =
            TEMPERATURE_BOUNDS_C.clamp(self.state.temperature_c + shift.temperature_delta_c);
        self.state.humidity_pct =
            HUMIDITY_BOUNDS_PCT.clamp(self.state.humidity_pct + shift.humidity_delta_pct);
        self.state
    }
}
