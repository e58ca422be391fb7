//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (camera, colors, keybindings) are consolidated
//! here. Options serialize to/from TOML so a preset file can override any
//! subset of fields.

mod camera;
mod colors;

use std::path::Path;

pub use camera::CameraOptions;
pub use colors::ColorOptions;
use serde::{Deserialize, Serialize};

use crate::error::LinemarkError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[colors]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Color palette options.
    pub colors: ColorOptions,
    /// Keyboard binding options.
    pub keybindings: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LinemarkError::Io`] if the file cannot be read and
    /// [`LinemarkError::OptionsParse`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, LinemarkError> {
        let content = std::fs::read_to_string(path).map_err(LinemarkError::Io)?;
        toml::from_str(&content)
            .map_err(|e| LinemarkError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`LinemarkError::OptionsParse`] if serialization fails and
    /// [`LinemarkError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LinemarkError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LinemarkError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LinemarkError::Io)?;
        }
        std::fs::write(path, content).map_err(LinemarkError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let parsed: Options =
            toml::from_str("[camera]\nfovy = 60.0\n").unwrap();
        assert_eq!(parsed.camera.fovy, 60.0);
        assert_eq!(parsed.colors, ColorOptions::default());
    }
}
