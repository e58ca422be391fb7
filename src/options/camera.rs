use serde::{Deserialize, Serialize};

/// Camera projection and control parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Orbit rotation speed in radians per pixel of drag.
    pub rotate_speed: f32,
    /// Pan speed in world units per pixel of drag.
    pub pan_speed: f32,
    /// Zoom speed as a fraction of distance per scroll unit.
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 1000.0,
            rotate_speed: 0.01,
            pan_speed: 0.02,
            zoom_speed: 0.05,
        }
    }
}
