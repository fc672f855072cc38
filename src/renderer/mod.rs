//! Forward renderer: shadow pass plus one lit pass per frame.
//!
//! Owns every render pipeline and the bind group layouts scene objects are
//! created against. Frame order is fixed: key-light shadow map, then clear,
//! backdrop, ground, character.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::{pipeline_helpers, DepthTarget, RenderContext};
use crate::scene::background::BackdropVertex;
use crate::scene::character::skin_vertex_layout;
use crate::scene::{Backdrop, CharacterInstance, LightRig, StaticObject, StaticVertex};

/// Everything drawn in one frame, borrowed from the engine.
pub struct FrameScene<'a> {
    /// Camera uniform bind group (group 0).
    pub camera: &'a wgpu::BindGroup,
    /// Light rig with the environment bind group (group 1).
    pub lights: &'a LightRig,
    /// The ground disc.
    pub ground: &'a StaticObject,
    /// The backdrop plane, once its image has arrived.
    pub backdrop: Option<&'a Backdrop>,
    /// The character, once its asset has arrived.
    pub character: Option<&'a CharacterInstance>,
}

/// Forward renderer for the whole scene.
pub struct ForwardRenderer {
    depth: DepthTarget,
    model_layout: wgpu::BindGroupLayout,
    palette_layout: wgpu::BindGroupLayout,
    backdrop_texture_layout: wgpu::BindGroupLayout,
    static_pipeline: wgpu::RenderPipeline,
    skinned_pipeline: wgpu::RenderPipeline,
    backdrop_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    light_bind_group: wgpu::BindGroup,
}

impl ForwardRenderer {
    /// Build all pipelines against the camera and environment layouts.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        environment_layout: &wgpu::BindGroupLayout,
        light_view_proj: Mat4,
    ) -> Self {
        let device = &context.device;

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[pipeline_helpers::uniform_buffer(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let palette_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Palette Bind Group Layout"),
            entries: &[pipeline_helpers::storage_buffer_readonly(0)],
        });
        let backdrop_texture_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Backdrop Texture Bind Group Layout"),
                entries: &[
                    pipeline_helpers::texture_2d(0),
                    pipeline_helpers::filtering_sampler(1),
                ],
            });
        let light_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Light Bind Group Layout"),
            entries: &[pipeline_helpers::uniform_buffer(
                0,
                wgpu::ShaderStages::VERTEX,
            )],
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shadow Light Buffer"),
            contents: bytemuck::cast_slice(&light_view_proj.to_cols_array()),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &light_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
            label: Some("Shadow Light Bind Group"),
        });

        let lit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lit Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/lit.wgsl").into(),
            ),
        });
        let backdrop_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/backdrop.wgsl").into(),
            ),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/shadow.wgsl").into(),
            ),
        });

        let static_pipeline = {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Static Lit Pipeline Layout"),
                bind_group_layouts: &[camera_layout, environment_layout, &model_layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Static Lit Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &lit_shader,
                    entry_point: Some("vs_static"),
                    buffers: &[StaticVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &lit_shader,
                    entry_point: Some("fs_lit"),
                    targets: &surface_target(context),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let skinned_pipeline = {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Skinned Lit Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    environment_layout,
                    &model_layout,
                    &palette_layout,
                ],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Skinned Lit Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &lit_shader,
                    entry_point: Some("vs_skinned"),
                    buffers: &[skin_vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &lit_shader,
                    entry_point: Some("fs_lit"),
                    targets: &surface_target(context),
                    compilation_options: Default::default(),
                }),
                // Character meshes are drawn double-sided.
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let backdrop_pipeline = {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Backdrop Pipeline Layout"),
                bind_group_layouts: &[camera_layout, environment_layout, &backdrop_texture_layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Backdrop Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &backdrop_shader,
                    entry_point: Some("vs_backdrop"),
                    buffers: &[BackdropVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &backdrop_shader,
                    entry_point: Some("fs_backdrop"),
                    targets: &surface_target(context),
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let shadow_pipeline = {
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Shadow Pipeline Layout"),
                bind_group_layouts: &[&light_layout, &model_layout, &palette_layout],
                push_constant_ranges: &[],
            });
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Shadow Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shadow_shader,
                    entry_point: Some("vs_shadow"),
                    buffers: &[skin_vertex_layout()],
                    compilation_options: Default::default(),
                },
                fragment: None,
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTarget::FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    // Slope-scaled bias keeps the character from shadowing
                    // itself in stripes.
                    bias: wgpu::DepthBiasState {
                        constant: 2,
                        slope_scale: 2.0,
                        clamp: 0.0,
                    },
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Self {
            depth: DepthTarget::new(device, context.width(), context.height()),
            model_layout,
            palette_layout,
            backdrop_texture_layout,
            static_pipeline,
            skinned_pipeline,
            backdrop_pipeline,
            shadow_pipeline,
            light_bind_group,
        }
    }

    /// Layout for per-object model uniforms (group 2).
    #[must_use]
    pub fn model_layout(&self) -> &wgpu::BindGroupLayout {
        &self.model_layout
    }

    /// Layout for joint palettes (group 3).
    #[must_use]
    pub fn palette_layout(&self) -> &wgpu::BindGroupLayout {
        &self.palette_layout
    }

    /// Layout for the backdrop's texture/sampler pair.
    #[must_use]
    pub fn backdrop_texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.backdrop_texture_layout
    }

    /// Recreate the depth target after a surface resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth = DepthTarget::new(&context.device, context.width(), context.height());
    }

    /// Encode the shadow pass and the lit pass for one frame.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &FrameScene<'_>,
    ) {
        self.shadow_pass(encoder, scene);
        self.lit_pass(encoder, target, scene);
    }

    /// Render the character's depth from the key light. Runs even with no
    /// character so the map clears to "no occluder".
    fn shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, scene: &FrameScene<'_>) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &scene.lights.shadow.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        let Some(character) = scene.character else {
            return;
        };
        pass.set_pipeline(&self.shadow_pipeline);
        pass.set_bind_group(0, &self.light_bind_group, &[]);
        pass.set_bind_group(1, &character.model_bind_group, &[]);
        pass.set_bind_group(2, &character.palette_bind_group, &[]);
        for prim in &character.primitives {
            pass.set_vertex_buffer(0, prim.vertex_buffer.slice(..));
            pass.set_index_buffer(prim.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..prim.index_count, 0, 0..1);
        }
    }

    fn lit_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &FrameScene<'_>,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Lit Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_bind_group(0, scene.camera, &[]);
        pass.set_bind_group(1, &scene.lights.bind_group, &[]);

        if let Some(backdrop) = scene.backdrop {
            pass.set_pipeline(&self.backdrop_pipeline);
            pass.set_bind_group(2, &backdrop.bind_group, &[]);
            pass.set_vertex_buffer(0, backdrop.vertex_buffer.slice(..));
            pass.set_index_buffer(backdrop.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..backdrop.index_count, 0, 0..1);
        }

        pass.set_pipeline(&self.static_pipeline);
        pass.set_bind_group(2, &scene.ground.bind_group, &[]);
        pass.set_vertex_buffer(0, scene.ground.vertex_buffer.slice(..));
        pass.set_index_buffer(scene.ground.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..scene.ground.index_count, 0, 0..1);

        if let Some(character) = scene.character {
            pass.set_pipeline(&self.skinned_pipeline);
            pass.set_bind_group(2, &character.model_bind_group, &[]);
            pass.set_bind_group(3, &character.palette_bind_group, &[]);
            for prim in &character.primitives {
                pass.set_vertex_buffer(0, prim.vertex_buffer.slice(..));
                pass.set_index_buffer(prim.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..prim.index_count, 0, 0..1);
            }
        }
    }
}

fn surface_target(context: &RenderContext) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format: context.format(),
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DepthTarget::FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
