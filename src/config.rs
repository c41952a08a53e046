use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;
use validator::Validate;

use crate::simulation::Thresholds;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    #[validate(nested)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}
impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, request_timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SimulationConfig {
    /// Real-time interval between steps at 1.0× speed
    #[validate(range(min = 1))]
    pub base_interval_ms: u64,
    #[validate(range(exclusive_min = 0.0))]
    pub phase_increment: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub speed_multiplier: f64,
    #[validate(range(min = 18.0, max = 40.0))]
    pub initial_temperature_c: f64,
    #[validate(range(min = 30.0, max = 90.0))]
    pub initial_humidity_pct: f64,
    pub random_seed: Option<u64>,
    /// Start stepping as soon as the service is up
    pub autostart: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: 2000,
            phase_increment: 0.06,
            speed_multiplier: 1.0,
            initial_temperature_c: 28.0,
            initial_humidity_pct: 55.0,
            random_seed: None,
            autostart: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ENVDASH__").split("__"));
        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Self = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.port, 8080);
            assert_eq!(cfg.simulation.base_interval_ms, 2000);
            assert_eq!(cfg.simulation.speed_multiplier, 1.0);
            assert_eq!(cfg.thresholds, Thresholds::default());
            assert!(cfg.simulation.autostart);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/default.toml",
                r#"
                [server]
                host = "0.0.0.0"
                port = 9000
                request_timeout_secs = 5

                [simulation]
                speed_multiplier = 1.5
                random_seed = 7

                [thresholds]
                temp_min_c = 22.0
                humidity_max_pct = 65.0
                "#,
            )?;
            jail.set_env("ENVDASH__SIMULATION__SPEED_MULTIPLIER", "2.0");

            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.port, 9000);
            assert_eq!(cfg.simulation.speed_multiplier, 2.0);
            assert_eq!(cfg.simulation.random_seed, Some(7));
            assert_eq!(cfg.simulation.initial_temperature_c, 28.0);
            assert_eq!(cfg.thresholds.temp_min_c, 22.0);
            assert_eq!(cfg.thresholds.humidity_max_pct, 65.0);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_speed_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ENVDASH__SIMULATION__SPEED_MULTIPLIER", "0");
            assert!(Config::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_out_of_bounds_initial_reading_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ENVDASH__SIMULATION__INITIAL_HUMIDITY_PCT", "95");
            assert!(Config::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("ENVDASH__THRESHOLDS__HUMIDITY_MAX_PCT", "20");
            assert!(Config::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_single_threshold_override_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("ENVDASH__THRESHOLDS__TEMP_MIN_C", "22");

            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.thresholds.temp_min_c, 22.0);
            assert_eq!(cfg.thresholds.humidity_max_pct, 60.0);
            Ok(())
        });
    }

    #[test]
    fn test_single_server_override_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("ENVDASH__SERVER__PORT", "9000");

            let cfg = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.port, 9000);
            assert_eq!(cfg.server.host, "127.0.0.1");
            assert_eq!(cfg.server.request_timeout_secs, 10);
            Ok(())
        });
    }
}
