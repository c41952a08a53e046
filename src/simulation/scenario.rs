//! # Scenario Presets
//!
//! Named weather conditions that shift the environment instantaneously.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use strum::{Display, EnumIter, EnumString};

/// Instantaneous, deterministic environment override
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Scenario {
    /// Bright noon: solar peak, warmer, drier
    Sunny,
    /// Low sun, humidity spike, slight temperature dip
    Rainy,
    /// No sun, temperature drop, humidity rises modestly
    ColdNight,
}

/// What a scenario does to the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioShift {
    /// Absolute phase to jump to
    pub phase: f64,
    /// Temperature delta (°C), clamped after application
    pub temperature_delta_c: f64,
    /// Humidity delta (%), clamped after application
    pub humidity_delta_pct: f64,
}

impl Scenario {
    pub fn shift(self) -> ScenarioShift {
        match self {
            Scenario::Sunny => ScenarioShift {
                phase: FRAC_PI_2,
                temperature_delta_c: 2.0,
                humidity_delta_pct: -8.0,
            },
            Scenario::Rainy => ScenarioShift {
                phase: 0.2,
                temperature_delta_c: -1.5,
                humidity_delta_pct: 10.0,
            },
            Scenario::ColdNight => ScenarioShift {
                phase: 0.0,
                temperature_delta_c: -3.0,
                humidity_delta_pct: 4.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_scenario_names_round_trip() {
        for scenario in Scenario::iter() {
            assert_eq!(Scenario::from_str(&scenario.to_string()).unwrap(), scenario);
        }
        assert_eq!(Scenario::from_str("cold-night").unwrap(), Scenario::ColdNight);
        assert!(Scenario::from_str("blizzard").is_err());
    }

    #[test]
    fn test_night_has_no_sun() {
        assert_eq!(Scenario::ColdNight.shift().phase.sin(), 0.0);
        assert_eq!(Scenario::Sunny.shift().phase.sin(), 1.0);
    }
}
