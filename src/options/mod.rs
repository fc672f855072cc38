//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (playback defaults, lighting factor, model color,
//! camera tuning, asset paths, keybindings) are consolidated here. Options
//! serialize to/from TOML for presets stored in `assets/presets/`.

mod assets;
mod camera;
mod display;
mod keybindings;
mod lighting;
mod playback;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use playback::PlaybackOptions;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Root of every tunable setting. Each section carries `#[serde(default)]`,
/// so a preset file may name only the tables it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Animation playback defaults.
    pub playback: PlaybackOptions,
    /// Lighting rig parameters.
    pub lighting: LightingOptions,
    /// Model appearance defaults.
    pub display: DisplayOptions,
    /// Camera projection and orbit tuning.
    pub camera: CameraOptions,
    /// Asset locations.
    pub assets: AssetOptions,
    /// Keyboard shortcut table.
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Read options from a TOML preset. Absent fields fall back to
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read and
    /// [`ViewerError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let text = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let mut opts: Self = toml::from_str(&text)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        // The reverse keybinding map is serde(skip), rebuild after parse.
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Write the options out as pretty-printed TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] on serialization failure and
    /// [`ViewerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, text).map_err(ViewerError::Io)
    }

    /// Preset names found in a directory, sorted. A preset is any
    /// `.toml` file; its stem is the name.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| {
                path.file_stem().map(|s| s.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive_toml_round_trip() {
        let opts = Options::default();
        let rendered = toml::to_string_pretty(&opts).unwrap();
        let reparsed: Options = toml::from_str(&rendered).unwrap();
        assert_eq!(opts, reparsed);
    }

    #[test]
    fn partial_preset_keeps_other_defaults() {
        let toml_str = r"
[lighting]
factor = 0.25
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.lighting.factor, 0.25);
        // Untouched sections keep their defaults.
        assert_eq!(opts.playback.speed, 1.0);
        assert_eq!(opts.camera.fovy, 45.0);
        assert_eq!(opts.assets.character, "assets/character.glb");
    }

    #[test]
    fn default_bindings_resolve() {
        use crate::input::KeyAction;
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::TogglePlayback)
        );
        assert_eq!(
            opts.keybindings.lookup("KeyA"),
            Some(KeyAction::ToggleAutoRotate)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn default_color_matches_picker_initial() {
        let display = DisplayOptions::default();
        for (channel, expected) in
            display.model_color.iter().zip([126.0, 154.0, 200.0]) {
            assert!((channel - expected / 255.0).abs() < 1e-3);
        }
    }
}
