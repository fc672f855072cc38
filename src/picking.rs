//! Click picking against the posed character.
//!
//! A click unprojects to a world-space ray, the character's vertices are
//! skinned on the CPU with the current palette, and the closest triangle
//! hit wins. Runs per click, not per frame, so brute force over the
//! triangle list is fine.

use glam::{Mat4, Vec3, Vec4};

use crate::assets::{CharacterData, SkinVertex};

/// A world-space ray.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index of the hit primitive in the character's mesh list.
    pub primitive: usize,
    /// Distance along the ray.
    pub distance: f32,
}

/// Convert screen coordinates to a world-space ray.
#[must_use]
pub fn screen_to_ray(
    screen_x: f32,
    screen_y: f32,
    screen_width: f32,
    screen_height: f32,
    view_proj: Mat4,
) -> Ray {
    // NDC (-1 to 1), y flipped for screen coordinates.
    let ndc_x = (screen_x / screen_width) * 2.0 - 1.0;
    let ndc_y = 1.0 - (screen_y / screen_height) * 2.0;

    let inv_view_proj = view_proj.inverse();

    // Unproject near and far points (wgpu uses 0-1 depth range).
    let world_near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let world_far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

    let origin = world_near.truncate() / world_near.w;
    let far = world_far.truncate() / world_far.w;

    Ray {
        origin,
        dir: (far - origin).normalize(),
    }
}

/// Moller-Trumbore ray/triangle intersection without backface culling.
/// Returns the distance along the ray, or `None` on a miss.
#[must_use]
pub fn ray_triangle_intersect(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.dir.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(h) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Skin one vertex with the palette, without the model transform.
fn skinned_position(v: &SkinVertex, palette: &[Mat4]) -> Vec3 {
    let p = Vec3::from(v.position);
    let mut out = Vec3::ZERO;
    for k in 0..4 {
        let w = v.weights[k];
        if w == 0.0 {
            continue;
        }
        let m = palette
            .get(v.joints[k] as usize)
            .copied()
            .unwrap_or(Mat4::IDENTITY);
        out += m.transform_point3(p) * w;
    }
    out
}

/// Intersect a ray with the character in its current pose. Vertices are
/// skinned with `palette` and placed in the world with `transform`; the
/// nearest triangle hit across all primitives wins.
#[must_use]
pub fn pick_character(
    ray: &Ray,
    data: &CharacterData,
    palette: &[Mat4],
    transform: Mat4,
) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    let mut posed = Vec::new();

    for (pi, prim) in data.primitives.iter().enumerate() {
        posed.clear();
        posed.extend(
            prim.vertices
                .iter()
                .map(|v| transform.transform_point3(skinned_position(v, palette))),
        );

        for tri in prim.indices.chunks_exact(3) {
            let (Some(&a), Some(&b), Some(&c)) = (
                posed.get(tri[0] as usize),
                posed.get(tri[1] as usize),
                posed.get(tri[2] as usize),
            ) else {
                continue;
            };
            if let Some(t) = ray_triangle_intersect(ray, a, b, c) {
                if best.is_none_or(|hit| t < hit.distance) {
                    best = Some(PickHit {
                        primitive: pi,
                        distance: t,
                    });
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{JointSet, MeshPrimitive};
    use glam::Quat;

    fn vertex(position: [f32; 3]) -> SkinVertex {
        SkinVertex {
            position,
            normal: [0.0, 0.0, 1.0],
            joints: [0; 4],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// One triangle in the z = 0 plane around the origin, identity skeleton.
    fn triangle_character() -> CharacterData {
        CharacterData {
            primitives: vec![MeshPrimitive {
                name: "tri".to_owned(),
                vertices: vec![
                    vertex([-1.0, -1.0, 0.0]),
                    vertex([1.0, -1.0, 0.0]),
                    vertex([0.0, 1.0, 0.0]),
                ],
                indices: vec![0, 1, 2],
            }],
            joints: JointSet {
                nodes: vec![0],
                inverse_bind: vec![Mat4::IDENTITY],
            },
            parent: vec![None],
            base_t: vec![Vec3::ZERO],
            base_r: vec![Quat::IDENTITY],
            base_s: vec![Vec3::ONE],
            ..CharacterData::default()
        }
    }

    #[test]
    fn center_ray_points_down_the_view_axis() {
        let eye = Vec3::new(0.0, 1.6, 4.0);
        let target = Vec3::new(0.0, 1.2, 0.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.01, 500.0);
        let ray = screen_to_ray(640.0, 360.0, 1280.0, 720.0, proj * view);

        let expected = (target - eye).normalize();
        assert!((ray.dir - expected).length() < 1e-3);
        assert!((ray.origin - eye).length() < 0.1);
    }

    #[test]
    fn triangle_hit_reports_distance() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let t = ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn backfacing_triangles_still_hit() {
        // Same triangle, approached from behind.
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, -5.0),
            dir: Vec3::new(0.0, 0.0, 1.0),
        };
        assert!(ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_some());
    }

    #[test]
    fn ray_beside_triangle_misses() {
        let ray = Ray {
            origin: Vec3::new(5.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(ray_triangle_intersect(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn pick_hits_the_posed_character() {
        let data = triangle_character();
        let palette = vec![Mat4::IDENTITY];
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let hit = pick_character(&ray, &data, &palette, Mat4::IDENTITY).unwrap();
        assert_eq!(hit.primitive, 0);
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn pick_misses_beside_the_character() {
        let data = triangle_character();
        let palette = vec![Mat4::IDENTITY];
        let ray = Ray {
            origin: Vec3::new(10.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(pick_character(&ray, &data, &palette, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn pick_respects_the_joint_palette() {
        // Palette shifts the triangle two units right; the old spot misses
        // and the shifted spot hits.
        let data = triangle_character();
        let palette = vec![Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0))];
        let centered = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(pick_character(&centered, &data, &palette, Mat4::IDENTITY).is_none());

        let shifted = Ray {
            origin: Vec3::new(2.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(pick_character(&shifted, &data, &palette, Mat4::IDENTITY).is_some());
    }

    #[test]
    fn pick_returns_the_nearest_primitive() {
        let mut data = triangle_character();
        // Second primitive sits closer to the ray origin.
        let mut near = data.primitives[0].clone();
        near.name = "near".to_owned();
        for v in &mut near.vertices {
            v.position[2] = 2.0;
        }
        data.primitives.push(near);

        let palette = vec![Mat4::IDENTITY];
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let hit = pick_character(&ray, &data, &palette, Mat4::IDENTITY).unwrap();
        assert_eq!(hit.primitive, 1);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }
}
