use serde::{Deserialize, Serialize};

/// Actions a key press can trigger in the engine.
///
/// Presets spell these as `snake_case` strings:
/// ```toml
/// [keybindings.bindings]
/// toggle_playback = "Space"
/// reset_animation = "KeyR"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Flip animation play/pause.
    TogglePlayback,
    /// Rewind the animation to its start and resume playing.
    ResetAnimation,
    /// Toggle continuous camera auto-rotation.
    ToggleAutoRotate,
}
