//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation — whether triggered by a key press, mouse
//! gesture, or programmatic call — is represented as a `LinemarkCommand`.
//! Consumers construct commands and pass them to
//! [`SegmentRenderEngine::execute`](super::SegmentRenderEngine::execute).

use glam::Vec2;

/// A discrete or parameterized operation the engine can perform.
///
/// The engine never cares *how* a command was triggered; keyboard, mouse,
/// and API calls all look identical:
///
/// ```ignore
/// engine.execute(LinemarkCommand::ToggleMarkers);
/// engine.execute(LinemarkCommand::Zoom { delta: 1.0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinemarkCommand {
    /// Run a pick at the given screen position and highlight the matched
    /// feature point, if any.
    Pick {
        /// Horizontal click position in physical pixels.
        x: f32,
        /// Vertical click position in physical pixels.
        y: f32,
    },

    /// Flip visibility of all feature-point markers as a group.
    ToggleMarkers,

    /// Clear the active feature-point highlight.
    ClearHighlight,

    /// Rotate the camera by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
}
