use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::MarkerPalette;

/// Scene color options (RGB, 0..1 per channel).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorOptions {
    /// Window clear color.
    pub background: [f32; 3],
    /// Segment stick color.
    pub segment: [f32; 3],
    /// Marker color when not highlighted.
    pub marker_neutral: [f32; 3],
    /// Highlight color for the start/end markers.
    pub marker_endpoint_highlight: [f32; 3],
    /// Highlight color for the center marker.
    pub marker_center_highlight: [f32; 3],
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            background: [0.2, 0.2, 0.4],
            segment: [1.0, 1.0, 1.0],
            marker_neutral: [1.0, 1.0, 1.0],
            marker_endpoint_highlight: [1.0, 0.0, 0.0],
            marker_center_highlight: [1.0, 1.0, 0.0],
        }
    }
}

impl ColorOptions {
    /// Derive the marker palette used by segment entities.
    #[must_use]
    pub fn marker_palette(&self) -> MarkerPalette {
        MarkerPalette {
            neutral: Vec3::from_array(self.marker_neutral),
            endpoint_highlight: Vec3::from_array(
                self.marker_endpoint_highlight,
            ),
            center_highlight: Vec3::from_array(self.marker_center_highlight),
        }
    }
}
