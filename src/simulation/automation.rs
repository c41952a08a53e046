//! # Automation Evaluation
//!
//! Maps the current temperature and humidity onto heater/fan on-off decisions
//! using fixed thresholds. Strict inequality on both sides: a reading exactly
//! at a threshold leaves the corresponding actuator off.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Heater switches on below this temperature (°C)
pub const TEMP_MIN_THRESHOLD: f64 = 24.0;
/// Fan switches on above this relative humidity (%)
pub const HUMIDITY_MAX_THRESHOLD: f64 = 60.0;

/// Automation thresholds
///
/// Each threshold must sit inside the range its reading is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Thresholds {
    /// Heater ON when temperature < this value
    #[validate(range(min = 18.0, max = 40.0))]
    pub temp_min_c: f64,
    /// Fan ON when humidity > this value
    #[validate(range(min = 30.0, max = 90.0))]
    pub humidity_max_pct: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min_c: TEMP_MIN_THRESHOLD,
            humidity_max_pct: HUMIDITY_MAX_THRESHOLD,
        }
    }
}

/// Derived actuator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutomationState {
    pub heater_on: bool,
    pub fan_on: bool,
}

/// Stateless threshold evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct AutomationEvaluator {
    thresholds: Thresholds,
}

impl AutomationEvaluator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Evaluate heater/fan state for the given readings
    ///
    /// Total over all inputs, including readings outside the simulator's
    /// nominal bounds. NaN readings switch nothing on.
    pub fn evaluate(&self, temperature_c: f64, humidity_pct: f64) -> AutomationState {
        AutomationState {
            heater_on: temperature_c < self.thresholds.temp_min_c,
            fan_on: humidity_pct > self.thresholds.humidity_max_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(23.9, 50.0, true, false)]
    #[case(24.0, 50.0, false, false)]
    #[case(25.0, 60.1, false, true)]
    #[case(25.0, 60.0, false, false)]
    #[case(18.0, 90.0, true, true)]
    fn test_threshold_boundaries(
        #[case] temperature_c: f64,
        #[case] humidity_pct: f64,
        #[case] heater_on: bool,
        #[case] fan_on: bool,
    ) {
        let evaluator = AutomationEvaluator::default();
        assert_eq!(
            evaluator.evaluate(temperature_c, humidity_pct),
            AutomationState { heater_on, fan_on }
        );
    }

    #[test]
    fn test_out_of_range_inputs() {
        let evaluator = AutomationEvaluator::default();
        let state = evaluator.evaluate(-273.0, 1000.0);
        assert!(state.heater_on);
        assert!(state.fan_on);

        let state = evaluator.evaluate(f64::NAN, f64::NAN);
        assert!(!state.heater_on);
        assert!(!state.fan_on);
    }

    #[test]
    fn test_threshold_ranges() {
        assert!(Thresholds::default().validate().is_ok());
        let dry = Thresholds {
            humidity_max_pct: 20.0,
            ..Default::default()
        };
        assert!(dry.validate().is_err());
        let hot = Thresholds {
            temp_min_c: 45.0,
            ..Default::default()
        };
        assert!(hot.validate().is_err());
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator = AutomationEvaluator::new(Thresholds {
            temp_min_c: 20.0,
            humidity_max_pct: 80.0,
        });
        assert_eq!(evaluator.evaluate(21.0, 70.0), AutomationState::default());
        assert_eq!(evaluator.thresholds().temp_min_c, 20.0);
    }
}
