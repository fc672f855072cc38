use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Fixed orbit target the rig looks at.
pub const ORBIT_TARGET: Vec3 = Vec3::new(0.0, 1.2, 0.0);

/// Initial eye position.
pub const INITIAL_EYE: Vec3 = Vec3::new(0.0, 1.6, 4.0);

/// Yaw increment applied once per frame while auto-rotation is on.
pub const AUTO_ROTATE_STEP: f32 = 0.006;

/// Pitch clamp, just short of the poles so the up vector never flips.
const MAX_PITCH: f32 = 1.54;

/// Damped spherical orbit state: user input moves the goal angles, and the
/// actual angles chase them with exponential smoothing each frame.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
    auto_rotate: bool,
    rotate_speed: f32,
    zoom_speed: f32,
    damping_rate: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitRig {
    /// Create a rig looking from [`INITIAL_EYE`] at [`ORBIT_TARGET`].
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let offset = INITIAL_EYE - ORBIT_TARGET;
        let distance = offset.length();
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).asin();

        Self {
            yaw,
            pitch,
            distance,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_distance: distance,
            auto_rotate: false,
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            damping_rate: options.damping_rate,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
        }
    }

    /// Apply a drag delta in pixels to the goal angles.
    pub fn rotate(&mut self, delta: Vec2) {
        self.goal_yaw -= delta.x * self.rotate_speed;
        self.goal_pitch = (self.goal_pitch + delta.y * self.rotate_speed)
            .clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Apply a scroll delta to the goal distance.
    pub fn zoom(&mut self, delta: f32) {
        self.goal_distance = (self.goal_distance * (1.0 - delta * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Flip auto-rotation and return the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Whether continuous auto-rotation is on.
    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Per-frame update: advance auto-rotation (a fixed per-frame step,
    /// composed with any drag in progress) and move the actual angles a
    /// damping fraction toward the goals. The damping blend is derived from
    /// `dt` so convergence does not depend on frame rate.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.goal_yaw += AUTO_ROTATE_STEP;
        }

        let blend = 1.0 - (-self.damping_rate * dt.max(0.0)).exp();
        self.yaw += (self.goal_yaw - self.yaw) * blend;
        self.pitch += (self.goal_pitch - self.pitch) * blend;
        self.distance += (self.goal_distance - self.distance) * blend;
    }

    /// Current eye position in world space.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        ORBIT_TARGET + dir * self.distance
    }

    /// Current damped yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current damped distance from the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Orbital camera controller owning the rig, the camera, and its GPU
/// resources (uniform buffer + bind group at group 0).
pub struct OrbitController {
    /// Damped orbit state.
    pub rig: OrbitRig,
    /// The camera derived from the rig each frame.
    pub camera: Camera,
    /// CPU copy of the camera uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (group 0 in every pipeline).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for the camera uniform.
    pub bind_group: wgpu::BindGroup,
    /// Whether the orbit drag button is currently held.
    pub mouse_pressed: bool,
}

impl OrbitController {
    /// Create the controller and its GPU resources.
    #[must_use]
    pub fn new(context: &RenderContext, options: &CameraOptions) -> Self {
        let rig = OrbitRig::new(options);

        let camera = Camera {
            eye: rig.eye(),
            target: ORBIT_TARGET,
            up: Vec3::Y,
            aspect: context.width() as f32 / context.height() as f32,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[crate::gpu::pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            rig,
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
            mouse_pressed: false,
        }
    }

    /// Per-frame tick: damp toward the goals and refresh the camera eye.
    pub fn update(&mut self, dt: f32) {
        self.rig.update(dt);
        self.camera.eye = self.rig.eye();
    }

    /// Upload the current camera state to the GPU.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Track a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> OrbitRig {
        OrbitRig::new(&CameraOptions::default())
    }

    #[test]
    fn initial_eye_matches_constant() {
        let rig = rig();
        let eye = rig.eye();
        assert!((eye - INITIAL_EYE).length() < 1e-4);
    }

    #[test]
    fn pitch_clamps_at_poles() {
        let mut rig = rig();
        for _ in 0..10_000 {
            rig.rotate(Vec2::new(0.0, 100.0));
        }
        rig.update(10.0);
        assert!(rig.eye().is_finite());
        // Even fully damped, the eye never crosses the vertical axis.
        let offset = rig.eye() - ORBIT_TARGET;
        assert!(offset.y < rig.distance());
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let mut coarse = rig();
        let mut fine = rig();
        coarse.rotate(Vec2::new(120.0, 0.0));
        fine.rotate(Vec2::new(120.0, 0.0));

        coarse.update(0.2);
        for _ in 0..2 {
            fine.update(0.1);
        }

        // Exponential blending composes: one 0.2s step equals two 0.1s steps.
        assert!((coarse.yaw() - fine.yaw()).abs() < 1e-4);
    }

    #[test]
    fn auto_rotate_advances_goal_only_when_enabled() {
        let mut rig = rig();
        let initial = rig.yaw();
        rig.update(10.0);
        assert!((rig.yaw() - initial).abs() < 1e-6);

        assert!(rig.toggle_auto_rotate());
        for _ in 0..100 {
            rig.update(0.016);
        }
        assert!(rig.yaw() > initial);

        assert!(!rig.toggle_auto_rotate());
    }

    #[test]
    fn zoom_respects_distance_clamp() {
        let mut rig = rig();
        for _ in 0..1_000 {
            rig.zoom(10.0);
        }
        rig.update(100.0);
        assert!(rig.distance() >= CameraOptions::default().min_distance - 1e-5);

        for _ in 0..1_000 {
            rig.zoom(-10.0);
        }
        rig.update(100.0);
        assert!(rig.distance() <= CameraOptions::default().max_distance + 1e-5);
    }
}
