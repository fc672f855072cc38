//! The four-light rig, fog, and the shadow-casting key light.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::{pipeline_helpers, RenderContext, ShadowMap};
use crate::options::LightingOptions;
use crate::util::color;

/// Key light position; also the direction the shadow map looks along.
const KEY_POSITION: Vec3 = Vec3::new(4.0, 6.0, 4.0);
const FILL_POSITION: Vec3 = Vec3::new(-5.0, 3.0, 2.0);
const BACK_POSITION: Vec3 = Vec3::new(0.0, 3.0, -4.0);
/// Distance at which the back point light fades to nothing.
const BACK_RANGE: f32 = 30.0;

/// Base intensities multiplied by the light factor slider.
const BASE_AMBIENT: f32 = 0.5;
const BASE_KEY: f32 = 1.6;
const BASE_FILL: f32 = 1.0;
const BASE_BACK: f32 = 1.2;

const FOG_COLOR: u32 = 0x0507_0f;
const FOG_NEAR: f32 = 10.0;
const FOG_FAR: f32 = 30.0;

/// Half-extent of the shadow map's orthographic volume in world units.
const SHADOW_EXTENT: f32 = 8.0;

/// Environment state shared by all lit shaders.
/// NOTE: Must match the WGSL `Environment` struct layout exactly (144 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EnvironmentUniform {
    /// View-projection matrix of the shadow-casting key light.
    pub light_view_proj: [[f32; 4]; 4],
    /// Unit vector pointing from surfaces toward the key light.
    pub key_dir: [f32; 3],
    /// Key light intensity.
    pub key_intensity: f32,
    /// Unit vector pointing from surfaces toward the fill light.
    pub fill_dir: [f32; 3],
    /// Fill light intensity.
    pub fill_intensity: f32,
    /// World position of the back point light.
    pub back_pos: [f32; 3],
    /// Back light intensity.
    pub back_intensity: f32,
    /// Fog color in linear RGB.
    pub fog_color: [f32; 3],
    /// Distance at which fog starts.
    pub fog_near: f32,
    /// Ambient intensity.
    pub ambient_intensity: f32,
    /// Falloff range of the back point light.
    pub back_range: f32,
    /// Distance at which fog fully swallows the scene.
    pub fog_far: f32,
    /// 1.0 once the backdrop is in place, 0.0 before.
    pub fog_enabled: f32,
}

impl EnvironmentUniform {
    /// Scale all four light intensities from their base values.
    pub fn apply_factor(&mut self, factor: f32) {
        self.ambient_intensity = BASE_AMBIENT * factor;
        self.key_intensity = BASE_KEY * factor;
        self.fill_intensity = BASE_FILL * factor;
        self.back_intensity = BASE_BACK * factor;
    }
}

impl Default for EnvironmentUniform {
    fn default() -> Self {
        let mut uniform = Self {
            light_view_proj: light_view_proj().to_cols_array_2d(),
            key_dir: KEY_POSITION.normalize().to_array(),
            key_intensity: 0.0,
            fill_dir: FILL_POSITION.normalize().to_array(),
            fill_intensity: 0.0,
            back_pos: BACK_POSITION.to_array(),
            back_intensity: 0.0,
            fog_color: color::hex_to_linear(FOG_COLOR),
            fog_near: FOG_NEAR,
            ambient_intensity: 0.0,
            back_range: BACK_RANGE,
            fog_far: FOG_FAR,
            fog_enabled: 0.0,
        };
        uniform.apply_factor(1.0);
        uniform
    }
}

/// Orthographic view-projection from the key light, sized to cover the
/// character and the ground disc.
fn light_view_proj() -> Mat4 {
    let eye = KEY_POSITION * 2.0;
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        0.1,
        40.0,
    );
    proj * view
}

/// GPU-resident light rig: environment uniform, shadow map, and the bind
/// group lit shaders consume.
pub struct LightRig {
    /// CPU copy of the environment uniform.
    pub uniform: EnvironmentUniform,
    /// Depth map rendered from the key light each frame.
    pub shadow: ShadowMap,
    /// GPU buffer backing `uniform`.
    pub buffer: wgpu::Buffer,
    /// Layout for `bind_group`.
    pub layout: wgpu::BindGroupLayout,
    /// Group 1 of every lit pipeline.
    pub bind_group: wgpu::BindGroup,
    factor: f32,
}

impl LightRig {
    /// Build the rig with intensities scaled by the configured light factor.
    pub fn new(context: &RenderContext, options: &LightingOptions) -> Self {
        let mut uniform = EnvironmentUniform::default();
        uniform.apply_factor(options.factor);

        let shadow = ShadowMap::new(&context.device, options.shadow_resolution);

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Environment Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Environment Bind Group Layout"),
                entries: &[
                    pipeline_helpers::uniform_buffer(
                        0,
                        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ),
                    pipeline_helpers::depth_texture_2d(1),
                    pipeline_helpers::comparison_sampler(2),
                ],
            });

        let bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&shadow.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                    },
                ],
                label: Some("Environment Bind Group"),
            });

        Self {
            uniform,
            shadow,
            buffer,
            layout,
            bind_group,
            factor: options.factor,
        }
    }

    /// Scale all light intensities by the slider factor.
    pub fn set_factor(&mut self, factor: f32) {
        self.factor = factor;
        self.uniform.apply_factor(factor);
    }

    /// Current light factor.
    #[inline]
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Turn distance fog on or off. Fog only appears once the backdrop
    /// image is in place, matching the staged scene build-up.
    pub fn set_fog_enabled(&mut self, enabled: bool) {
        self.uniform.fog_enabled = if enabled { 1.0 } else { 0.0 };
    }

    /// Push the CPU uniform to the GPU.
    pub fn update_gpu(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_wgsl_compatible() {
        assert_eq!(size_of::<EnvironmentUniform>(), 144);
    }

    #[test]
    fn factor_scales_every_base_intensity() {
        let mut uniform = EnvironmentUniform::default();
        uniform.apply_factor(0.5);
        assert!((uniform.ambient_intensity - 0.25).abs() < 1e-6);
        assert!((uniform.key_intensity - 0.8).abs() < 1e-6);
        assert!((uniform.fill_intensity - 0.5).abs() < 1e-6);
        assert!((uniform.back_intensity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn factor_zero_darkens_all_lights() {
        let mut uniform = EnvironmentUniform::default();
        uniform.apply_factor(0.0);
        assert_eq!(uniform.ambient_intensity, 0.0);
        assert_eq!(uniform.key_intensity, 0.0);
        assert_eq!(uniform.fill_intensity, 0.0);
        assert_eq!(uniform.back_intensity, 0.0);
    }

    #[test]
    fn default_matches_unit_factor() {
        let uniform = EnvironmentUniform::default();
        assert!((uniform.ambient_intensity - BASE_AMBIENT).abs() < 1e-6);
        assert!((uniform.key_intensity - BASE_KEY).abs() < 1e-6);
        assert!((uniform.fill_intensity - BASE_FILL).abs() < 1e-6);
        assert!((uniform.back_intensity - BASE_BACK).abs() < 1e-6);
    }

    #[test]
    fn light_directions_are_unit_length() {
        let uniform = EnvironmentUniform::default();
        let key = Vec3::from(uniform.key_dir);
        let fill = Vec3::from(uniform.fill_dir);
        assert!((key.length() - 1.0).abs() < 1e-5);
        assert!((fill.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fog_starts_disabled() {
        let uniform = EnvironmentUniform::default();
        assert_eq!(uniform.fog_enabled, 0.0);
        assert!((uniform.fog_near - 10.0).abs() < f32::EPSILON);
        assert!((uniform.fog_far - 30.0).abs() < f32::EPSILON);
    }
}
