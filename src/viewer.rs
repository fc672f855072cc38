//! Standalone viewer window backed by winit.
//!
//! When the `gui` feature is enabled, an egui control panel is drawn over
//! the scene each frame and its actions are applied to the engine before
//! the scene is encoded.
//!
//! ```no_run
//! # use vitrine::Viewer;
//! Viewer::builder()
//!     .with_path("assets/character.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    error::ViewerError, options::Options, InputEvent, MouseButton,
    ViewerEngine,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Configures a [`Viewer`] before it opens.
pub struct ViewerBuilder {
    path: Option<String>,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            path: None,
            options: None,
            title: "Vitrine".into(),
        }
    }

    /// View this character model (`.glb` or `.gltf`) instead of the
    /// configured default.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Start from the given options instead of the defaults.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Finish the builder.
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            path: self.path,
            options: self.options,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays a skinned character.
///
/// Obtain one through [`Viewer::builder`]; [`run`](Self::run) then owns
/// the calling thread until the window closes.
pub struct Viewer {
    path: Option<String>,
    options: Option<Options>,
    title: String,
}

impl Viewer {
    /// Begin configuring a viewer.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and block on the event loop until it closes.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Viewer`] if the event loop cannot be created
    /// or exits abnormally.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()
            .map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            path: self.path,
            options: self.options,
            title: self.title,
            #[cfg(feature = "gui")]
            gui: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Winit side of the viewer: window lifecycle, event translation, redraw.
struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ViewerEngine>,
    path: Option<String>,
    options: Option<Options>,
    title: String,
    #[cfg(feature = "gui")]
    gui: Option<crate::gui::EguiHost>,
}

/// Startup window attributes: titled, sized to three quarters of the
/// primary monitor when one is reported.
fn initial_attributes(
    event_loop: &ActiveEventLoop,
    title: &str,
) -> WindowAttributes {
    let attrs = Window::default_attributes().with_title(title);
    let monitor = event_loop
        .primary_monitor()
        .or_else(|| event_loop.available_monitors().next());
    match monitor {
        Some(mon) => {
            let size = mon.size();
            let scale = mon.scale_factor();
            let w = (size.width as f64 / scale * 0.75) as u32;
            let h = (size.height as f64 / scale * 0.75) as u32;
            attrs.with_inner_size(winit::dpi::LogicalSize::new(w, h))
        }
        None => attrs,
    }
}

/// wgpu rejects zero-sized surfaces; clamp each axis to a pixel.
fn surface_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    /// Resize the engine to the window's current inner size.
    fn resize_to_window(&mut self) {
        let inner = self.window.as_ref().map(|w| w.inner_size());
        if let (Some(engine), Some(inner)) = (&mut self.engine, inner) {
            let (w, h) = surface_size(inner);
            engine.resize(w, h);
        }
    }

    /// Render one frame, recovering from swapchain loss by resizing.
    ///
    /// With the `gui` feature the panel runs first and its actions are
    /// applied before the scene is encoded, so a click lands on the frame
    /// that shows its effect.
    fn redraw(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        #[cfg(feature = "gui")]
        let result = if let (Some(gui), Some(window)) =
            (self.gui.as_mut(), self.window.as_ref())
        {
            let state = crate::gui::panel::PanelState::of(engine);
            let mut actions = Vec::new();
            let frame = gui.run(window, |ctx| {
                actions = crate::gui::panel::show(ctx, &state);
            });
            for action in actions {
                action.apply(engine);
            }
            engine.render_with_overlay(|context, encoder, view| {
                gui.paint(context, encoder, view, &frame);
            })
        } else {
            engine.render()
        };
        #[cfg(not(feature = "gui"))]
        let result = engine.render();

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                if let Some(w) = &self.window {
                    let (vp_w, vp_h) = surface_size(w.inner_size());
                    engine.resize(vp_w, vp_h);
                }
            }
            Err(e) => {
                log::error!("render error: {e:?}");
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = initial_attributes(event_loop, &self.title);
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // CLI path and preset overrides land in the options before the
        // engine sees them.
        let mut options = self.options.take().unwrap_or_default();
        if let Some(path) = self.path.take() {
            options.assets.character = path;
        }

        let size = surface_size(window.inner_size());
        let engine = match pollster::block_on(ViewerEngine::with_options(
            window.clone(),
            size,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(feature = "gui")]
        {
            self.gui = Some(crate::gui::EguiHost::new(
                &window,
                &engine.context.device,
                engine.context.format(),
            ));
        }

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        #[cfg(feature = "gui")]
        let ui_consumed = match (&mut self.gui, &self.window) {
            (Some(gui), Some(window)) => gui.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "gui"))]
        let ui_consumed = false;

        match event {
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.resize_to_window();
            }

            WindowEvent::CursorMoved { position, .. } => {
                if ui_consumed {
                    return;
                }
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    });
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                // Releases always reach the engine so a drag cannot stick
                // when the panel takes the pointer mid-gesture.
                if ui_consumed && pressed {
                    return;
                }
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::MouseButton {
                        button: MouseButton::from(button),
                        pressed,
                    });
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if ui_consumed {
                    return;
                }
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(engine) = &mut self.engine {
                    engine.handle_input(InputEvent::Scroll { delta: scroll });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if ui_consumed || event.state != ElementState::Pressed {
                    return;
                }
                use winit::keyboard::PhysicalKey;
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };

                let key = format!("{code:?}");
                if let Some(engine) = &mut self.engine {
                    let bound = engine.options().keybindings.lookup(&key);
                    if let Some(action) = bound {
                        action.execute(engine);
                    }
                }
            }

            _ => (),
        }
    }
}
