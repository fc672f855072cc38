use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Asset locations, relative to the working directory unless absolute.
pub struct AssetOptions {
    /// Skinned character asset (glTF/GLB).
    pub character: String,
    /// Backdrop image placed behind the subject.
    pub backdrop: String,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            character: "assets/character.glb".to_owned(),
            backdrop: "assets/backdrop.jpg".to_owned(),
        }
    }
}
