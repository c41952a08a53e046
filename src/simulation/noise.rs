//! # Noise Sources
//!
//! Randomness used by the environment simulator. Production code draws from a
//! seeded or entropy-backed `StdRng`; tests substitute a fixed draw so a step
//! becomes fully deterministic.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`
pub trait NoiseSource: Send {
    /// Next uniform draw in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Uniform draw in `[low, high)`
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }
}

/// `StdRng`-backed noise, reproducible when seeded
pub struct SeededNoise {
    rng: StdRng,
}

impl SeededNoise {
    /// Create a noise source; `None` seeds from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl NoiseSource for SeededNoise {
    fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Noise source that always returns the same draw
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    /// Largest representable draw below 1.0
    const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

    pub fn new(unit: f64) -> Self {
        Self(unit.clamp(0.0, Self::MAX_UNIT))
    }

    /// Midpoint draw: every symmetric perturbation evaluates to zero
    pub fn centered() -> Self {
        Self(0.5)
    }

    pub fn lowest() -> Self {
        Self(0.0)
    }

    pub fn highest() -> Self {
        Self(Self::MAX_UNIT)
    }
}

impl NoiseSource for FixedNoise {
    fn unit(&mut self) -> f64 {
        self.0
    }
}
