//! Scene objects: the light rig, ground disc, backdrop plane, and the
//! skinned character.
//!
//! Objects own their GPU buffers and bind groups; the renderer owns the
//! pipelines and bind group layouts they are created against.

pub mod background;
pub mod character;
pub mod ground;
pub mod lights;

pub use background::Backdrop;
pub use character::CharacterInstance;
pub use ground::build_ground;
pub use lights::{EnvironmentUniform, LightRig};

use wgpu::util::DeviceExt;

use crate::gpu::RenderContext;
use crate::util::color;

/// Vertex for unskinned lit geometry (the ground disc).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StaticVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Surface normal.
    pub normal: [f32; 3],
}

impl StaticVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout for the static lit pipeline.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-object state for the lit shaders.
/// NOTE: Must match the WGSL `Model` struct layout exactly (96 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Object-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Base color in linear RGB.
    pub color: [f32; 3],
    /// Material roughness.
    pub roughness: f32,
    /// Material metalness.
    pub metalness: f32,
    /// Std140 padding.
    pub _pad: [f32; 3],
}

impl ModelUniform {
    /// Model uniform from an sRGB color and material parameters.
    #[must_use]
    pub fn new(model: glam::Mat4, srgb: [f32; 3], roughness: f32, metalness: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color::rgb_to_linear(srgb),
            roughness,
            metalness,
            _pad: [0.0; 3],
        }
    }
}

/// A static lit mesh with its own model uniform: vertex/index buffers plus
/// the group 2 bind group.
pub struct StaticObject {
    /// Vertex data.
    pub vertex_buffer: wgpu::Buffer,
    /// Triangle list indices.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices to draw.
    pub index_count: u32,
    /// GPU buffer backing the model uniform.
    pub model_buffer: wgpu::Buffer,
    /// Group 2 of the static lit pipeline.
    pub bind_group: wgpu::BindGroup,
}

impl StaticObject {
    /// Upload a mesh and its model uniform.
    pub fn new(
        context: &RenderContext,
        model_layout: &wgpu::BindGroupLayout,
        label: &str,
        vertices: &[StaticVertex],
        indices: &[u32],
        uniform: ModelUniform,
    ) -> Self {
        let device = &context.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let model_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Model Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: model_buffer.as_entire_binding(),
            }],
            label: Some(&format!("{label} Model Bind Group")),
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            model_buffer,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_uniform_layout_is_wgsl_compatible() {
        assert_eq!(size_of::<ModelUniform>(), 96);
    }

    #[test]
    fn model_uniform_converts_color_to_linear() {
        let uniform = ModelUniform::new(glam::Mat4::IDENTITY, [0.5, 0.5, 0.5], 0.9, 0.0);
        // Mid-gray sRGB decodes to roughly 21% linear.
        for c in uniform.color {
            assert!((c - 0.214).abs() < 0.01);
        }
    }
}
