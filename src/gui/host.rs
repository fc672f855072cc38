//! egui host: context, winit event bridge, and the wgpu paint pass.
//!
//! Pairs an [`egui::Context`] with [`egui_winit::State`] for input and an
//! [`egui_wgpu::Renderer`] for output. The viewer runs the panel closure
//! once per frame and paints the result over the finished scene in a
//! load-preserving pass.

use egui_wgpu::{Renderer as EguiRenderer, RendererOptions, ScreenDescriptor};
use winit::event::WindowEvent;
use winit::window::Window;

use crate::gpu::RenderContext;

/// Tessellated egui output for one frame, ready to paint.
pub struct UiFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen: ScreenDescriptor,
}

/// Owns the egui context and its winit/wgpu bridges.
pub struct EguiHost {
    context: egui::Context,
    winit_state: egui_winit::State,
    renderer: EguiRenderer,
}

impl EguiHost {
    /// Create the host for a window and the surface format it paints to.
    #[must_use]
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();
        let winit_state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            None,
        );
        let renderer = EguiRenderer::new(device, format, RendererOptions::default());
        Self {
            context,
            winit_state,
            renderer,
        }
    }

    /// Forward a window event to egui.
    ///
    /// Returns `true` when egui consumed the event and the engine should
    /// not see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Run the UI closure for this frame and tessellate its output.
    pub fn run(&mut self, window: &Window, run_ui: impl FnMut(&egui::Context)) -> UiFrame {
        let raw_input = self.winit_state.take_egui_input(window);
        let output = self.context.run(raw_input, run_ui);
        self.winit_state
            .handle_platform_output(window, output.platform_output);

        let pixels_per_point = self.context.pixels_per_point();
        let primitives = self.context.tessellate(output.shapes, pixels_per_point);
        let size = window.inner_size();
        UiFrame {
            primitives,
            textures_delta: output.textures_delta,
            screen: ScreenDescriptor {
                size_in_pixels: [size.width.max(1), size.height.max(1)],
                pixels_per_point,
            },
        }
    }

    /// Paint a frame's UI over the already-rendered scene.
    pub fn paint(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &UiFrame,
    ) {
        for (id, delta) in &frame.textures_delta.set {
            self.renderer
                .update_texture(&context.device, &context.queue, *id, delta);
        }
        // The panel registers no paint callbacks, so no user command
        // buffers come back.
        let _ = self.renderer.update_buffers(
            &context.device,
            &context.queue,
            encoder,
            &frame.primitives,
            &frame.screen,
        );

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        self.renderer
            .render(&mut pass, &frame.primitives, &frame.screen);
        drop(pass);

        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
