//! CPU-side character asset data.
//!
//! The loader parses a glTF/GLB file into [`CharacterData`]: a flat list of
//! skinned mesh primitives, the combined joint set they index into, the node
//! hierarchy driving those joints, and the embedded animation clips. Source
//! materials are discarded; the viewer assigns its own recolorable material
//! to every primitive.

mod gltf_loader;

use std::path::Path;

use glam::{Mat4, Quat, Vec3};

pub use gltf_loader::load_character;

use crate::animation::AnimClip;
use crate::error::ViewerError;

/// Normalized character height in world units.
pub const TARGET_HEIGHT: f32 = 1.7;

/// Floor for the bounding-box height when computing the normalizing scale,
/// so degenerate assets cannot divide by zero.
pub const HEIGHT_EPSILON: f32 = 1e-4;

/// One skinned vertex. Rigid primitives are baked into model space at load
/// time and pinned to a synthetic joint, so every vertex goes through the
/// same palette path.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinVertex {
    /// Bind-pose position in model space.
    pub position: [f32; 3],
    /// Bind-pose normal.
    pub normal: [f32; 3],
    /// Indices into the combined joint palette.
    pub joints: [u16; 4],
    /// Blend weights matching `joints`.
    pub weights: [f32; 4],
}

/// One renderable primitive of the character.
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    /// Node/mesh name for diagnostics.
    pub name: String,
    /// Vertex data.
    pub vertices: Vec<SkinVertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

/// The combined joint set all primitives index into. Skins are concatenated
/// and rigid primitives append single synthetic joints, so one palette
/// drives the whole asset.
#[derive(Debug, Clone, Default)]
pub struct JointSet {
    /// Scene-node index backing each palette slot.
    pub nodes: Vec<usize>,
    /// Inverse bind matrix for each palette slot.
    pub inverse_bind: Vec<Mat4>,
}

impl JointSet {
    /// Number of palette slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the set has no joints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Parsed character asset: geometry, skeleton, and animation clips.
#[derive(Debug, Clone, Default)]
pub struct CharacterData {
    /// All renderable primitives, in traversal order.
    pub primitives: Vec<MeshPrimitive>,
    /// Combined joint palette source.
    pub joints: JointSet,
    /// Parent node index for each scene node.
    pub parent: Vec<Option<usize>>,
    /// Rest-pose translation per node.
    pub base_t: Vec<Vec3>,
    /// Rest-pose rotation per node.
    pub base_r: Vec<Quat>,
    /// Rest-pose scale per node.
    pub base_s: Vec<Vec3>,
    /// Embedded animation clips in file order. Only index 0 is played.
    pub clips: Vec<AnimClip>,
    /// Node names for diagnostics.
    pub node_names: Vec<String>,
}

impl CharacterData {
    /// Axis-aligned bounding box of the bind-pose geometry, or `None` for an
    /// asset with no vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Vec3, Vec3)> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut any = false;
        for prim in &self.primitives {
            for v in &prim.vertices {
                let p = Vec3::from(v.position);
                min = min.min(p);
                max = max.max(p);
                any = true;
            }
        }
        any.then_some((min, max))
    }

    /// The transform that centers the bounding box at the world origin and
    /// scales the asset so its height is [`TARGET_HEIGHT`]: scale about the
    /// origin composed after the centering translation.
    #[must_use]
    pub fn normalizing_transform(&self) -> Mat4 {
        let Some((min, max)) = self.bounding_box() else {
            return Mat4::IDENTITY;
        };
        let center = (min + max) * 0.5;
        let height = (max.y - min.y).max(HEIGHT_EPSILON);
        let scale = TARGET_HEIGHT / height;
        Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-center)
    }

    /// Total triangle count across all primitives.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.primitives.iter().map(|p| p.indices.len() / 3).sum()
    }
}

/// A decoded RGBA8 image ready for GPU upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 rows, top to bottom.
    pub pixels: Vec<u8>,
}

/// Decode the backdrop image file into RGBA8 pixels.
///
/// # Errors
///
/// Returns [`ViewerError::ImageDecode`] when the file is missing or not a
/// supported image format.
pub fn load_backdrop_image(path: &Path) -> Result<DecodedImage, ViewerError> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3]) -> SkinVertex {
        SkinVertex {
            position,
            normal: [0.0, 1.0, 0.0],
            joints: [0; 4],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    fn boxy_character() -> CharacterData {
        // Two primitives spanning x 1..3, y 2..6, z -1..1 together.
        CharacterData {
            primitives: vec![
                MeshPrimitive {
                    name: "torso".to_owned(),
                    vertices: vec![vertex([1.0, 2.0, -1.0]), vertex([3.0, 5.0, 1.0])],
                    indices: vec![0, 1, 0],
                },
                MeshPrimitive {
                    name: "head".to_owned(),
                    vertices: vec![vertex([2.0, 6.0, 0.0])],
                    indices: vec![0, 0, 0],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn bounding_box_spans_all_primitives() {
        let data = boxy_character();
        let (min, max) = data.bounding_box().unwrap();
        assert_eq!(min, Vec3::new(1.0, 2.0, -1.0));
        assert_eq!(max, Vec3::new(3.0, 6.0, 1.0));
    }

    #[test]
    fn normalizing_transform_hits_target_height_and_centers() {
        let data = boxy_character();
        let m = data.normalizing_transform();
        let (min, max) = data.bounding_box().unwrap();

        let lo = m.transform_point3(min);
        let hi = m.transform_point3(max);
        assert!((hi.y - lo.y - TARGET_HEIGHT).abs() < 1e-5);

        let center = (lo + hi) * 0.5;
        assert!(center.length() < 1e-5);
    }

    #[test]
    fn degenerate_height_uses_epsilon_floor() {
        // Flat asset: zero height must not divide by zero.
        let data = CharacterData {
            primitives: vec![MeshPrimitive {
                name: "flat".to_owned(),
                vertices: vec![vertex([-1.0, 0.0, 0.0]), vertex([1.0, 0.0, 0.0])],
                indices: vec![0, 1, 0],
            }],
            ..Default::default()
        };
        let m = data.normalizing_transform();
        assert!(m.is_finite());
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.is_finite());
    }

    #[test]
    fn empty_asset_normalizes_to_identity() {
        let data = CharacterData::default();
        assert_eq!(data.normalizing_transform(), Mat4::IDENTITY);
        assert!(data.bounding_box().is_none());
    }
}
