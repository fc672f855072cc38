use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Lighting rig parameters. The rig's per-light base coefficients are fixed;
/// only the shared factor is tunable.
pub struct LightingOptions {
    /// Shared intensity factor (the light slider's default). Every light's
    /// intensity is its base coefficient times this value.
    pub factor: f32,
    /// Shadow map resolution (square, texels per side).
    pub shadow_resolution: u32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            factor: 1.0,
            shadow_resolution: 2048,
        }
    }
}
