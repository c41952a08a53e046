//! # Environment Simulation Module
//!
//! Synthetic sensor readings and the automation decisions derived from them.
//!
//! ## Components
//!
//! - **Environment**: advances solar phase, temperature and humidity one step at a time
//! - **Automation**: heater/fan decisions from fixed thresholds
//! - **Scenario**: named weather presets that shift the environment instantly
//! - **Noise**: randomness seam, seeded in production and fixed in tests
//!
//! ## Usage
//!
//! ```rust
//! use environment_dashboard::simulation::{
//!     AutomationEvaluator, EnvironmentSimulator, Scenario, SeededNoise, SimulatorConfig,
//! };
//!
//! let config = SimulatorConfig::default();
//! let evaluator = AutomationEvaluator::new(config.thresholds);
//! let mut sim = EnvironmentSimulator::new(config, Box::new(SeededNoise::new(Some(7))));
//!
//! let state = sim.step();
//! let automation = evaluator.evaluate(state.temperature_c, state.humidity_pct);
//! assert!(state.solar_w <= 1000);
//! # let _ = automation;
//!
//! sim.apply_scenario(Scenario::Sunny);
//! ```

pub mod automation;
pub mod environment;
pub mod noise;
pub mod scenario;

pub use automation::{
    AutomationEvaluator, AutomationState, Thresholds, HUMIDITY_MAX_THRESHOLD, TEMP_MIN_THRESHOLD,
};
pub use environment::{
    Bounds, EnvironmentSimulator, EnvironmentState, SimulatorConfig, HUMIDITY_BOUNDS_PCT,
    SOLAR_BOUNDS_W, TEMPERATURE_BOUNDS_C,
};
pub use noise::{FixedNoise, NoiseSource, SeededNoise};
pub use scenario::{Scenario, ScenarioShift};
