//! # Dashboard Rendering
//!
//! A [`Frame`] is what the presentation layer consumes after every tick or
//! scenario trigger: the latest environment snapshot, the automation state
//! derived from it and the wall-clock time it was produced.
//! [`DashboardView`] turns a frame into display strings.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::simulation::{AutomationEvaluator, AutomationState, EnvironmentState, Thresholds};

/// Source of the "last updated" timestamp
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// One rendered snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub environment: EnvironmentState,
    pub automation: AutomationState,
    pub updated_at: DateTime<Local>,
}

impl Frame {
    /// Build a frame, deriving automation from `environment`
    pub fn capture(
        environment: EnvironmentState,
        evaluator: &AutomationEvaluator,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            environment,
            automation: evaluator.evaluate(environment.temperature_c, environment.humidity_pct),
            updated_at: clock.now(),
        }
    }
}

/// Display strings for a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub solar: String,
    pub temperature: String,
    pub humidity: String,
    pub heater: String,
    pub fan: String,
    pub last_updated: String,
}

impl DashboardView {
    pub fn from_frame(frame: &Frame) -> Self {
        let env = &frame.environment;
        Self {
            solar: format!("{} W", env.solar_w),
            temperature: format!("{:.1} °C", env.temperature_c),
            humidity: format!("{:.1} %", env.humidity_pct),
            heater: on_off(frame.automation.heater_on).to_string(),
            fan: on_off(frame.automation.fan_on).to_string(),
            last_updated: frame.updated_at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Threshold labels shown once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdView {
    pub temp_min: String,
    pub humidity_max: String,
}

impl From<Thresholds> for ThresholdView {
    fn from(t: Thresholds) -> Self {
        Self {
            temp_min: format_number(t.temp_min_c),
            humidity_max: format_number(t.humidity_max_pct),
        }
    }
}

pub fn speed_label(multiplier: f64) -> String {
    format!("{multiplier:.1}×")
}

fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

// 24.0 -> "24", 24.5 -> "24.5"
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
