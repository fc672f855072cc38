use glam::{Mat4, Vec3};

/// Right-handed perspective camera.
///
/// Holds the look-at pose and projection parameters. The orbit controller
/// mutates `eye` and `target`; the rest is set from options and resize.
pub struct Camera {
    /// World-space eye position.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up used by the look-at basis.
    pub up: Vec3,
    /// Width over height of the surface.
    pub aspect: f32,
    /// Vertical field of view, degrees.
    pub fovy: f32,
    /// Near clip distance.
    pub znear: f32,
    /// Far clip distance.
    pub zfar: f32,
}

impl Camera {
    /// Combined view-projection matrix for the current pose.
    pub fn build_matrix(&self) -> Mat4 {
        // glam's perspective_rh already targets wgpu's [0,1] depth range.
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

/// Camera state as the shaders see it. Matches the WGSL `Camera` struct
/// layout (80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix, column major.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position, read by the fog distance term.
    pub position: [f32; 3],
    /// Rounds the struct out to a 16-byte multiple.
    pub(crate) _pad: f32,
}

impl CameraUniform {
    /// Identity matrix with the eye at the origin.
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Refresh both fields from the camera's current pose.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_proj_maps_target_to_screen_center() {
        let camera = Camera {
            eye: Vec3::new(0.0, 1.6, 4.0),
            target: Vec3::new(0.0, 1.2, 0.0),
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: 45.0,
            znear: 0.01,
            zfar: 500.0,
        };
        let clip = camera.build_matrix() * camera.target.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
