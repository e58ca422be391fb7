//! Geometry renderers: segment sticks and feature-point markers.

/// Instanced icosphere markers.
pub mod marker;
/// Cylinder sticks for segment bodies.
pub mod stick;

pub use marker::MarkerRenderer;
pub use stick::StickRenderer;
