//! Simulated environmental dashboard.
//!
//! Synthetic solar, temperature and humidity readings advance on a recurring
//! tick; heater and fan states are derived from fixed thresholds and every
//! step is published as a renderable [`render::Frame`].

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod simulation;
pub mod telemetry;
