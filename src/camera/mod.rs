//! Perspective camera and the orbit controller driving it.

/// Camera state and GPU uniform.
pub mod core;
/// Orbit controller: rotate, pan, zoom, fit.
pub mod controller;

pub use controller::CameraController;
pub use core::{Camera, CameraUniform};
