//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! button and modifier state) and the key-binding map. It is the only
//! thing that sits between raw window events and the engine's
//! [`execute`](crate::engine::SegmentRenderEngine::execute) method.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use crate::engine::LinemarkCommand;

/// Maps physical key strings to [`LinemarkCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyX"`, `"Escape"`, etc. Physical key codes are layout-independent
/// and carry no case, so a binding fires for both lower- and upper-case
/// presses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`LinemarkCommand`] that can be
/// key-bound (discrete, parameterless actions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Flip visibility of all feature-point markers.
    ToggleMarkers,
    /// Clear the active highlight.
    ClearHighlight,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`LinemarkCommand`].
    fn to_command(self) -> LinemarkCommand {
        match self {
            Self::ToggleMarkers => LinemarkCommand::ToggleMarkers,
            Self::ClearHighlight => LinemarkCommand::ClearHighlight,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings =
            HashMap::from([("KeyX".into(), KeyCommandTag::ToggleMarkers)]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<LinemarkCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind a key string to a command tag, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`LinemarkCommand`]s.
///
/// Owns all transient input state (cursor position, button and modifier
/// state) and the keyboard binding map.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyX") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Current cursor position in physical pixels.
    mouse_pos: (f32, f32),
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse_pos: (0.0, 0.0),
            mouse_pressed: false,
            shift_pressed: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        self.mouse_pos
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<LinemarkCommand> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
    ) -> Option<LinemarkCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => {
                Some(LinemarkCommand::Zoom { delta })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    /// Cursor moved — compute delta, possibly produce a camera command.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<LinemarkCommand> {
        let delta =
            Vec2::new(x - self.mouse_pos.0, y - self.mouse_pos.1);
        self.mouse_pos = (x, y);

        if self.mouse_pressed && delta.length_squared() > 0.0 {
            if self.shift_pressed {
                return Some(LinemarkCommand::PanCamera { delta });
            }
            return Some(LinemarkCommand::RotateCamera { delta });
        }

        None
    }

    /// Mouse button press/release. A left press triggers a pick at the
    /// current cursor position; release only updates state.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<LinemarkCommand> {
        if button != MouseButton::Left {
            return None;
        }

        if pressed {
            self.mouse_pressed = true;
            let (x, y) = self.mouse_pos;
            return Some(LinemarkCommand::Pick { x, y });
        }

        self.mouse_pressed = false;
        None
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_press_picks_at_cursor() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 120.0, y: 80.0 });

        let cmd = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(cmd, Some(LinemarkCommand::Pick { x: 120.0, y: 80.0 }));

        let release = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert_eq!(release, None);
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut input = InputProcessor::new();
        let cmd = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert_eq!(cmd, None);
    }

    #[test]
    fn drag_rotates_and_shift_drag_pans() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });

        let cmd = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 5.0 });
        assert_eq!(
            cmd,
            Some(LinemarkCommand::RotateCamera {
                delta: Vec2::new(10.0, 5.0)
            })
        );

        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        let cmd = input.handle_event(InputEvent::CursorMoved { x: 12.0, y: 5.0 });
        assert_eq!(
            cmd,
            Some(LinemarkCommand::PanCamera {
                delta: Vec2::new(2.0, 0.0)
            })
        );
    }

    #[test]
    fn cursor_move_without_button_produces_nothing() {
        let mut input = InputProcessor::new();
        let cmd = input.handle_event(InputEvent::CursorMoved { x: 50.0, y: 50.0 });
        assert_eq!(cmd, None);
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        let cmd = input.handle_event(InputEvent::Scroll { delta: 1.5 });
        assert_eq!(cmd, Some(LinemarkCommand::Zoom { delta: 1.5 }));
    }

    #[test]
    fn default_binding_toggles_markers() {
        let input = InputProcessor::new();
        assert_eq!(
            input.handle_key_press("KeyX"),
            Some(LinemarkCommand::ToggleMarkers)
        );
        assert_eq!(input.handle_key_press("KeyZ"), None);
    }

    #[test]
    fn bindings_can_be_reconfigured() {
        let mut bindings = KeyBindings::default();
        bindings.bind("Escape", KeyCommandTag::ClearHighlight);
        let input = InputProcessor::with_key_bindings(bindings);

        assert_eq!(
            input.handle_key_press("Escape"),
            Some(LinemarkCommand::ClearHighlight)
        );
    }
}
