//! GPU-resident character: uploaded primitives, the shared model uniform,
//! and the joint palette driven by the animation player.

use glam::Mat4;
use wgpu::util::DeviceExt;

use super::ModelUniform;
use crate::animation::{bind_pose_palette, sample_palette, ClipPlayer};
use crate::assets::{CharacterData, SkinVertex};
use crate::gpu::RenderContext;

/// Roughness applied to every character primitive.
pub const CHARACTER_ROUGHNESS: f32 = 0.6;
/// Metalness applied to every character primitive.
pub const CHARACTER_METALNESS: f32 = 0.05;

const SKIN_ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Uint16x4,
    3 => Float32x4,
];

/// Vertex buffer layout for the skinned pipelines.
#[must_use]
pub fn skin_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<SkinVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SKIN_ATTRIBS,
    }
}

/// One uploaded primitive of the character.
pub struct GpuPrimitive {
    /// Source node/mesh name.
    pub name: String,
    /// Skinned vertex data.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle list indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
}

/// The character as the renderer sees it.
///
/// Keeps the CPU-side [`CharacterData`] alive for picking and palette
/// sampling. All primitives share one model uniform (the normalizing
/// transform plus the recolorable material) and one joint palette.
pub struct CharacterInstance {
    /// CPU-side asset data, kept for sampling and picking.
    pub data: CharacterData,
    /// Clock for clip 0; `None` when the asset has no animations.
    pub player: Option<ClipPlayer>,
    /// Normalizing transform applied to the whole character.
    pub transform: Mat4,
    /// Uploaded primitives.
    pub primitives: Vec<GpuPrimitive>,
    /// Current CPU palette, also used by picking.
    pub palette: Vec<Mat4>,
    /// Group 2 of the skinned lit pipeline.
    pub model_bind_group: wgpu::BindGroup,
    /// Group 3 of the skinned pipelines.
    pub palette_bind_group: wgpu::BindGroup,
    model: ModelUniform,
    model_buffer: wgpu::Buffer,
    palette_buffer: wgpu::Buffer,
}

impl CharacterInstance {
    /// Upload a loaded character, starting clip 0 at time zero.
    pub fn new(
        context: &RenderContext,
        model_layout: &wgpu::BindGroupLayout,
        palette_layout: &wgpu::BindGroupLayout,
        data: CharacterData,
        color_srgb: [f32; 3],
    ) -> Self {
        let device = &context.device;
        let transform = data.normalizing_transform();
        let player = clip_player_for(&data);
        let palette = initial_palette(&data);

        let primitives = data
            .primitives
            .iter()
            .map(|prim| {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Character {} Vertex Buffer", prim.name)),
                    contents: bytemuck::cast_slice(&prim.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Character {} Index Buffer", prim.name)),
                    contents: bytemuck::cast_slice(&prim.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                GpuPrimitive {
                    name: prim.name.clone(),
                    vertex_buffer,
                    index_buffer,
                    index_count: prim.indices.len() as u32,
                }
            })
            .collect();

        let model = ModelUniform::new(
            transform,
            color_srgb,
            CHARACTER_ROUGHNESS,
            CHARACTER_METALNESS,
        );
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Character Model Buffer"),
            contents: bytemuck::cast_slice(&[model]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
            label: Some("Character Model Bind Group"),
        });

        let palette_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Character Palette Buffer"),
            contents: bytemuck::cast_slice(&palette_raw(&palette)),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        let palette_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: palette_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: palette_buffer.as_entire_binding(),
            }],
            label: Some("Character Palette Bind Group"),
        });

        Self {
            data,
            player,
            transform,
            primitives,
            palette,
            model_bind_group,
            palette_bind_group,
            model,
            model_buffer,
            palette_buffer,
        }
    }

    /// Whether the asset carried at least one animation clip.
    #[must_use]
    pub fn has_animation(&self) -> bool {
        self.player.is_some()
    }

    /// Advance the animation clock and resample the palette.
    pub fn advance(&mut self, dt: f32) {
        if let Some(player) = self.player.as_mut() {
            player.advance(dt);
        }
        self.refresh_palette();
    }

    /// Rewind the animation to its first frame.
    pub fn rewind(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.reset();
        }
        self.refresh_palette();
    }

    /// Set the playback speed multiplier.
    pub fn set_time_scale(&mut self, scale: f32) {
        if let Some(player) = self.player.as_mut() {
            player.set_time_scale(scale);
        }
    }

    /// Recolor every primitive, keeping roughness and metalness.
    pub fn set_color(&mut self, srgb: [f32; 3], queue: &wgpu::Queue) {
        self.model = ModelUniform::new(
            self.transform,
            srgb,
            CHARACTER_ROUGHNESS,
            CHARACTER_METALNESS,
        );
        queue.write_buffer(&self.model_buffer, 0, bytemuck::cast_slice(&[self.model]));
    }

    /// Push the current palette to the GPU.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.palette_buffer,
            0,
            bytemuck::cast_slice(&palette_raw(&self.palette)),
        );
    }

    fn refresh_palette(&mut self) {
        if let Some((player, clip)) = self.player.as_ref().zip(self.data.clips.first()) {
            self.palette = sample_palette(&self.data, clip, player.time());
        }
    }
}

/// Clip 0's player, if the asset has any clips.
fn clip_player_for(data: &CharacterData) -> Option<ClipPlayer> {
    data.clips.first().map(|clip| ClipPlayer::new(clip.duration))
}

/// Palette for the first rendered frame. Falls back to a single identity
/// matrix so the storage binding is never empty.
fn initial_palette(data: &CharacterData) -> Vec<Mat4> {
    let palette = match data.clips.first() {
        Some(clip) => sample_palette(data, clip, 0.0),
        None => bind_pose_palette(data),
    };
    if palette.is_empty() {
        vec![Mat4::IDENTITY]
    } else {
        palette
    }
}

fn palette_raw(palette: &[Mat4]) -> Vec<[[f32; 4]; 4]> {
    palette.iter().map(Mat4::to_cols_array_2d).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimClip;
    use crate::assets::JointSet;

    #[test]
    fn player_exists_only_with_clips() {
        let silent = CharacterData::default();
        assert!(clip_player_for(&silent).is_none());

        let mut animated = CharacterData::default();
        animated.clips.push(AnimClip {
            duration: 1.5,
            ..AnimClip::default()
        });
        let player = clip_player_for(&animated).unwrap();
        assert!((player.duration() - 1.5).abs() < 1e-6);
        assert!(player.time().abs() < f32::EPSILON);
    }

    #[test]
    fn empty_asset_palette_falls_back_to_identity() {
        let data = CharacterData::default();
        let palette = initial_palette(&data);
        assert_eq!(palette, vec![Mat4::IDENTITY]);
    }

    #[test]
    fn jointed_asset_palette_matches_bind_pose() {
        let data = CharacterData {
            joints: JointSet {
                nodes: vec![0],
                inverse_bind: vec![Mat4::IDENTITY],
            },
            parent: vec![None],
            base_t: vec![glam::Vec3::new(0.0, 2.0, 0.0)],
            base_r: vec![glam::Quat::IDENTITY],
            base_s: vec![glam::Vec3::ONE],
            ..CharacterData::default()
        };
        let palette = initial_palette(&data);
        assert_eq!(palette.len(), 1);
        let t = palette[0].to_scale_rotation_translation().2;
        assert!((t.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn skin_vertex_layout_matches_struct_size() {
        let layout = skin_vertex_layout();
        assert_eq!(layout.array_stride, 48);
        assert_eq!(layout.attributes.len(), 4);
    }
}
