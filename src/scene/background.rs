//! The textured backdrop plane behind the character.
//!
//! The backdrop is unlit: it shows the image as-is, dimmed only by distance
//! fog. It arrives asynchronously; until then the scene renders against the
//! plain clear color and fog stays off.

use wgpu::util::DeviceExt;

use crate::assets::DecodedImage;
use crate::gpu::{pipeline_helpers, texture, RenderContext};

const WIDTH: f32 = 30.0;
const HEIGHT: f32 = 18.0;
/// Plane center, behind and above the character.
const CENTER: [f32; 3] = [0.0, 5.0, -12.0];

/// Vertex of the backdrop plane.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackdropVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Texture coordinate, v = 0 at the top.
    pub uv: [f32; 2],
}

impl BackdropVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Vertex buffer layout for the backdrop pipeline.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Camera-facing quad centered on [`CENTER`].
#[must_use]
pub fn backdrop_geometry() -> ([BackdropVertex; 4], [u32; 6]) {
    let [cx, cy, cz] = CENTER;
    let hw = WIDTH * 0.5;
    let hh = HEIGHT * 0.5;
    let vertices = [
        BackdropVertex {
            position: [cx - hw, cy + hh, cz],
            uv: [0.0, 0.0],
        },
        BackdropVertex {
            position: [cx + hw, cy + hh, cz],
            uv: [1.0, 0.0],
        },
        BackdropVertex {
            position: [cx - hw, cy - hh, cz],
            uv: [0.0, 1.0],
        },
        BackdropVertex {
            position: [cx + hw, cy - hh, cz],
            uv: [1.0, 1.0],
        },
    ];
    // Two triangles winding counter-clockwise toward the camera (+z).
    let indices = [0, 2, 1, 1, 2, 3];
    (vertices, indices)
}

/// GPU-resident backdrop: quad geometry plus the sampled image.
pub struct Backdrop {
    /// Quad vertices.
    pub vertex_buffer: wgpu::Buffer,
    /// Quad indices.
    pub index_buffer: wgpu::Buffer,
    /// Always 6.
    pub index_count: u32,
    /// The uploaded backdrop image.
    pub texture: wgpu::Texture,
    /// Group 2 of the backdrop pipeline (texture + sampler).
    pub bind_group: wgpu::BindGroup,
}

impl Backdrop {
    /// Upload the decoded image and build the quad.
    pub fn new(
        context: &RenderContext,
        texture_layout: &wgpu::BindGroupLayout,
        image: &DecodedImage,
    ) -> Self {
        let device = &context.device;
        let (vertices, indices) = backdrop_geometry();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let (texture, view) = texture::upload_srgb_image(
            device,
            &context.queue,
            "Backdrop Texture",
            image.width,
            image.height,
            &image.pixels,
        );
        let sampler = pipeline_helpers::linear_sampler(device, "Backdrop Sampler");

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("Backdrop Bind Group"),
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            texture,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn quad_spans_the_plane_dimensions() {
        let (vertices, _) = backdrop_geometry();
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        let span_x = xs.iter().fold(f32::MIN, |a, &b| a.max(b))
            - xs.iter().fold(f32::MAX, |a, &b| a.min(b));
        let span_y = ys.iter().fold(f32::MIN, |a, &b| a.max(b))
            - ys.iter().fold(f32::MAX, |a, &b| a.min(b));
        assert!((span_x - WIDTH).abs() < 1e-5);
        assert!((span_y - HEIGHT).abs() < 1e-5);
        for v in &vertices {
            assert!((v.position[2] - CENTER[2]).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn quad_faces_the_camera() {
        let (vertices, indices) = backdrop_geometry();
        for tri in indices.chunks_exact(3) {
            let a = Vec3::from(vertices[tri[0] as usize].position);
            let b = Vec3::from(vertices[tri[1] as usize].position);
            let c = Vec3::from(vertices[tri[2] as usize].position);
            let n = (b - a).cross(c - a);
            assert!(n.z > 0.0, "triangle {tri:?} faces away");
        }
    }

    #[test]
    fn uv_origin_is_top_left() {
        let (vertices, _) = backdrop_geometry();
        let top_left = vertices
            .iter()
            .find(|v| v.uv == [0.0, 0.0])
            .copied()
            .unwrap();
        // Highest y and lowest x carry uv (0, 0).
        assert!(top_left.position[0] < CENTER[0]);
        assert!(top_left.position[1] > CENTER[1]);
    }
}
