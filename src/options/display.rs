use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Model appearance defaults.
pub struct DisplayOptions {
    /// Initial character material color (the color picker's default),
    /// sRGB components in [0, 1].
    pub model_color: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            // #7e9ac8
            model_color: [126.0 / 255.0, 154.0 / 255.0, 200.0 / 255.0],
        }
    }
}
