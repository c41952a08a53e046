use thiserror::Error;

/// Errors raised by the simulation control surface
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("speed multiplier must be a finite number greater than zero, got {0}")]
    InvalidSpeed(f64),

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
