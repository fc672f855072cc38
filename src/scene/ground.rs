//! The ground disc the character stands on.

use glam::Mat4;

use super::{ModelUniform, StaticObject, StaticVertex};
use crate::gpu::RenderContext;
use crate::util::color;

const RADIUS: f32 = 6.0;
const SEGMENTS: u32 = 64;
const COLOR: u32 = 0x2a2f45;
const ROUGHNESS: f32 = 0.9;
const METALNESS: f32 = 0.0;

/// Triangle-fan disc in the XZ plane at y = 0, facing up.
#[must_use]
pub fn ground_geometry() -> (Vec<StaticVertex>, Vec<u32>) {
    let up = [0.0, 1.0, 0.0];
    let mut vertices = Vec::with_capacity(SEGMENTS as usize + 1);
    vertices.push(StaticVertex {
        position: [0.0, 0.0, 0.0],
        normal: up,
    });
    for i in 0..SEGMENTS {
        let angle = (i as f32 / SEGMENTS as f32) * std::f32::consts::TAU;
        vertices.push(StaticVertex {
            position: [RADIUS * angle.cos(), 0.0, -RADIUS * angle.sin()],
            normal: up,
        });
    }

    let mut indices = Vec::with_capacity(SEGMENTS as usize * 3);
    for i in 0..SEGMENTS {
        let a = 1 + i;
        let b = 1 + (i + 1) % SEGMENTS;
        indices.extend_from_slice(&[0, a, b]);
    }
    (vertices, indices)
}

/// Build the ground disc as a GPU object.
pub fn build_ground(context: &RenderContext, model_layout: &wgpu::BindGroupLayout) -> StaticObject {
    let (vertices, indices) = ground_geometry();
    let uniform = ModelUniform::new(
        Mat4::IDENTITY,
        color::hex_to_rgb(COLOR),
        ROUGHNESS,
        METALNESS,
    );
    StaticObject::new(context, model_layout, "Ground", &vertices, &indices, uniform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn disc_has_center_plus_one_ring_vertex_per_segment() {
        let (vertices, indices) = ground_geometry();
        assert_eq!(vertices.len(), SEGMENTS as usize + 1);
        assert_eq!(indices.len(), SEGMENTS as usize * 3);
    }

    #[test]
    fn ring_vertices_lie_on_the_radius_at_ground_level() {
        let (vertices, _) = ground_geometry();
        for v in &vertices[1..] {
            let p = Vec3::from(v.position);
            assert!(p.y.abs() < f32::EPSILON);
            assert!((p.length() - RADIUS).abs() < 1e-4);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_seen_from_above() {
        let (vertices, indices) = ground_geometry();
        for tri in indices.chunks_exact(3) {
            let a = Vec3::from(vertices[tri[0] as usize].position);
            let b = Vec3::from(vertices[tri[1] as usize].position);
            let c = Vec3::from(vertices[tri[2] as usize].position);
            let n = (b - a).cross(c - a);
            assert!(n.y > 0.0, "triangle {tri:?} faces down");
        }
    }

    #[test]
    fn all_indices_are_in_range() {
        let (vertices, indices) = ground_geometry();
        for &i in &indices {
            assert!((i as usize) < vertices.len());
        }
    }
}
