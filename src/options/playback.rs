use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Animation playback defaults. Applied once at startup, the same way the
/// speed slider applies its value when dragged.
pub struct PlaybackOptions {
    /// Initial playback speed multiplier (the speed slider's default).
    pub speed: f32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}
