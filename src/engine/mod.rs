//! The viewer engine: application state and the per-frame pipeline.
//!
//! [`ViewerEngine`] ties the subsystems together: GPU context, orbit
//! camera, light rig, scene objects, background asset loading, and
//! playback state. The winit layer (or an embedding application) forwards
//! input events and calls [`ViewerEngine::render`] once per frame.

mod input;
mod loader;
mod playback;

use glam::Mat4;

use self::loader::AssetLoader;
use self::playback::PlaybackState;
use crate::assets::CharacterData;
use crate::camera::OrbitController;
use crate::error::ViewerError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::{ForwardRenderer, FrameScene};
use crate::scene::{
    build_ground, Backdrop, CharacterInstance, LightRig, StaticObject,
};
use crate::util::frame_timing::FrameTiming;

/// The core engine for the character viewer.
///
/// Owns the GPU context, the fixed scene members (light rig, ground disc,
/// backdrop slot), the character slot, and the playback state, and drives
/// one forward-rendered frame per redraw.
///
/// # Construction
///
/// Use [`ViewerEngine::new`] for default options or
/// [`ViewerEngine::with_options`] to apply a loaded preset. Construction
/// kicks off the character and backdrop loads on worker threads; both slots
/// stay empty until their parses land.
///
/// # Frame loop
///
/// Each frame, call [`render`](Self::render) to update and present. Call
/// [`resize`](Self::resize) when the window size changes. Input is forwarded
/// via [`handle_input`](Self::handle_input).
///
/// # Controls
///
/// Playback and appearance mutations ([`toggle_playback`](Self::toggle_playback),
/// [`reset_animation`](Self::reset_animation), [`set_speed`](Self::set_speed),
/// [`set_light_factor`](Self::set_light_factor), [`set_color`](Self::set_color),
/// [`toggle_auto_rotate`](Self::toggle_auto_rotate),
/// [`open_model`](Self::open_model)) are one state change each, applied
/// immediately; the frame loop only reads the resulting state.
pub struct ViewerEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    /// Orbital camera controller (bind group 0 of every scene pipeline).
    pub camera_controller: OrbitController,
    /// Light rig: environment uniform and key-light shadow map (group 1).
    pub lights: LightRig,
    /// Shadow-receiving ground disc.
    pub(crate) ground: StaticObject,
    /// Textured quad behind the subject; installed once its image decodes.
    pub(crate) backdrop: Option<Backdrop>,
    /// The skinned character; `None` until its load completes.
    pub character: Option<CharacterInstance>,
    /// Shadow, lit, and backdrop pipelines.
    pub(crate) renderer: ForwardRenderer,
    /// Worker threads parsing assets off the render thread.
    loader: AssetLoader,
    /// Play/pause flag, speed multiplier, and status line.
    playback: PlaybackState,
    /// Character material color (sRGB), mirrored from the color picker.
    color: [f32; 3],
    /// Last cursor position in physical pixels.
    pub(crate) last_cursor_pos: Option<(f32, f32)>,
    /// Per-frame timing and FPS tracking.
    pub(crate) frame_timing: FrameTiming,
    /// Runtime options the engine was built with.
    options: Options,
}

// =============================================================================
// Core
// =============================================================================

impl ViewerEngine {
    /// Engine with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if GPU initialization fails.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, ViewerError> {
        Self::with_options(window, size, Options::default()).await
    }

    /// Engine with explicit options (for example a loaded TOML preset).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if GPU initialization fails.
    pub async fn with_options(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, ViewerError> {
        let context = RenderContext::new(window, size).await?;
        Ok(Self::init_with_context(context, options))
    }

    /// Engine from a pre-built [`RenderContext`] (headless rendering or an
    /// externally-owned device).
    #[must_use]
    pub fn from_context(context: RenderContext, options: Options) -> Self {
        Self::init_with_context(context, options)
    }

    /// Shared construction logic for windowed and headless modes.
    fn init_with_context(context: RenderContext, options: Options) -> Self {
        let camera_controller = OrbitController::new(&context, &options.camera);
        // Option values land here once, before the first frame, so nothing
        // ever renders from unscaled defaults.
        let lights = LightRig::new(&context, &options.lighting);
        let renderer = ForwardRenderer::new(
            &context,
            &camera_controller.layout,
            &lights.layout,
            Mat4::from_cols_array_2d(&lights.uniform.light_view_proj),
        );
        let ground = build_ground(&context, renderer.model_layout());

        let loader = AssetLoader::new();
        loader.load_character(options.assets.character.clone().into());
        loader.load_backdrop(options.assets.backdrop.clone().into());

        Self {
            context,
            camera_controller,
            lights,
            ground,
            backdrop: None,
            character: None,
            renderer,
            loader,
            playback: PlaybackState::new(options.playback.speed),
            color: options.display.model_color,
            last_cursor_pos: None,
            frame_timing: FrameTiming::new(),
            options,
        }
    }
}

// =============================================================================
// Frame loop
// =============================================================================

impl ViewerEngine {
    /// Per-frame update: install finished loads, advance the animation
    /// clock, damp the camera, and push dirty uniforms.
    fn pre_render(&mut self) {
        self.install_finished_loads();

        let dt = self.frame_timing.tick().as_secs_f32();

        if self.playback.is_playing {
            if let Some(character) = self
                .character
                .as_mut()
                .filter(|c| c.has_animation())
            {
                character.advance(dt);
                character.update_gpu(&self.context.queue);
            }
        }

        self.camera_controller.update(dt);
        self.camera_controller.update_gpu(&self.context.queue);
        self.lights.update_gpu(&self.context.queue);
    }

    /// Drain the loader channels and install finished assets. Runs between
    /// frames only, so a partially-built model is never visible or pickable.
    fn install_finished_loads(&mut self) {
        match self.loader.try_recv_character() {
            Some(Ok(data)) => self.install_character(data),
            Some(Err(e)) => {
                log::error!("character load failed: {e}");
                self.playback.mark_failed();
            }
            None => {}
        }

        match self.loader.try_recv_backdrop() {
            Some(Ok(image)) => {
                self.backdrop = Some(Backdrop::new(
                    &self.context,
                    self.renderer.backdrop_texture_layout(),
                    &image,
                ));
                // Fog arrives with the backdrop, matching the staged
                // scene build-up.
                self.lights.set_fog_enabled(true);
                log::info!(
                    "backdrop installed ({}x{})",
                    image.width,
                    image.height
                );
            }
            Some(Err(e)) => log::warn!("backdrop load failed: {e}"),
            None => {}
        }
    }

    /// Upload a parsed character into the scene and start its first clip.
    fn install_character(&mut self, data: CharacterData) {
        let mut instance = CharacterInstance::new(
            &self.context,
            self.renderer.model_layout(),
            self.renderer.palette_layout(),
            data,
            self.color,
        );
        instance.set_time_scale(self.playback.speed);
        self.playback.mark_loaded(instance.has_animation());
        self.character = Some(instance);
    }

    /// Execute one frame: update state, encode the scene passes, present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.render_with_overlay(|_, _, _| {})
    }

    /// Like [`render`](Self::render), with a caller-supplied pass encoded
    /// after the scene passes. The egui panel draws through this hook.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render_with_overlay<F>(
        &mut self,
        overlay: F,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&RenderContext, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.pre_render();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        let scene = FrameScene {
            camera: &self.camera_controller.bind_group,
            lights: &self.lights,
            ground: &self.ground,
            backdrop: self.backdrop.as_ref(),
            character: self.character.as_ref(),
        };
        self.renderer.render(&mut encoder, &view, &scene);
        overlay(&self.context, &mut encoder, &view);

        self.context.submit(encoder);
        frame.present();

        Ok(())
    }

    /// Resize the surface, depth target, and camera projection to the new
    /// window size. Idempotent; ignores zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera_controller.resize(width, height);
            self.renderer.resize(&self.context);
        }
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl ViewerEngine {
    /// Whether the animation clock is advancing.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing
    }

    /// Whether continuous camera auto-rotation is on.
    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.camera_controller.rig.auto_rotate()
    }

    /// Most recent status line ("Playing", "Paused", ...).
    #[must_use]
    pub fn status(&self) -> &str {
        &self.playback.status
    }

    /// Current playback speed multiplier.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.playback.speed
    }

    /// Current shared light intensity factor.
    #[must_use]
    pub fn light_factor(&self) -> f32 {
        self.lights.factor()
    }

    /// Current character material color (sRGB).
    #[must_use]
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// The options the engine was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}
