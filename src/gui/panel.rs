//! Control panel: playback, lighting, and model widgets.
//!
//! The panel keeps no state of its own. Each frame the viewer snapshots the
//! engine into a [`PanelState`], draws from the snapshot, and applies the
//! emitted [`UiAction`]s back to the engine before the scene is encoded, so
//! a click lands on the same frame that shows its effect.

use std::path::PathBuf;

use crate::engine::ViewerEngine;

/// Default width of the control panel in logical pixels.
const PANEL_WIDTH: f32 = 240.0;

/// Actions emitted by panel widgets, applied to the engine once per frame.
#[derive(Debug)]
pub enum UiAction {
    /// Toggle between playing and paused.
    TogglePlayback,
    /// Rewind the animation to its start and resume playback.
    Reset,
    /// Toggle the camera's idle auto-rotation.
    ToggleAutoRotate,
    /// Set the animation speed multiplier.
    SetSpeed(f32),
    /// Set the global light intensity factor.
    SetLightFactor(f32),
    /// Set the character tint as sRGB components in `0..=1`.
    SetColor([f32; 3]),
    /// Load a different character model from disk.
    OpenModel(PathBuf),
}

impl UiAction {
    /// Apply this action to the engine.
    pub fn apply(self, engine: &mut ViewerEngine) {
        match self {
            Self::TogglePlayback => engine.toggle_playback(),
            Self::Reset => engine.reset_animation(),
            Self::ToggleAutoRotate => {
                let _ = engine.toggle_auto_rotate();
            }
            Self::SetSpeed(speed) => engine.set_speed(speed),
            Self::SetLightFactor(factor) => engine.set_light_factor(factor),
            Self::SetColor(color) => engine.set_color(color),
            Self::OpenModel(path) => engine.open_model(path),
        }
    }
}

/// Snapshot of the engine state the panel reflects.
#[derive(Debug, Clone)]
pub struct PanelState {
    /// Whether the animation is advancing.
    pub is_playing: bool,
    /// Whether the camera auto-rotates.
    pub auto_rotate: bool,
    /// Animation speed multiplier.
    pub speed: f32,
    /// Global light intensity factor.
    pub light_factor: f32,
    /// Character tint as sRGB components in `0..=1`.
    pub color: [f32; 3],
    /// Status line text.
    pub status: String,
    /// Smoothed frames per second.
    pub fps: f32,
}

impl PanelState {
    /// Snapshot the panel-relevant engine state.
    #[must_use]
    pub fn of(engine: &ViewerEngine) -> Self {
        Self {
            is_playing: engine.is_playing(),
            auto_rotate: engine.auto_rotate(),
            speed: engine.speed(),
            light_factor: engine.light_factor(),
            color: engine.color(),
            status: engine.status().to_owned(),
            fps: engine.fps(),
        }
    }
}

/// Draw the control panel and collect the actions the user triggered.
#[must_use]
pub fn show(ctx: &egui::Context, state: &PanelState) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let _ = egui::Window::new("Controls")
        .default_pos([12.0, 12.0])
        .default_width(PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            playback_row(ui, state, &mut actions);
            let _ = ui.separator();
            speed_slider(ui, state, &mut actions);
            light_slider(ui, state, &mut actions);
            color_row(ui, state, &mut actions);
            let _ = ui.separator();
            open_button(ui, &mut actions);
            let _ = ui.label(&state.status);
            let _ = ui.weak(format!("{:.0} fps", state.fps));
        });
    actions
}

fn playback_row(ui: &mut egui::Ui, state: &PanelState, actions: &mut Vec<UiAction>) {
    let _ = ui.horizontal(|ui| {
        let play_label = if state.is_playing { "Pause" } else { "Resume" };
        if ui.button(play_label).clicked() {
            actions.push(UiAction::TogglePlayback);
        }
        if ui.button("Restart").clicked() {
            actions.push(UiAction::Reset);
        }
        let rotate_label = if state.auto_rotate {
            "Auto-rotate: ON"
        } else {
            "Auto-rotate: OFF"
        };
        if ui.button(rotate_label).clicked() {
            actions.push(UiAction::ToggleAutoRotate);
        }
    });
}

fn speed_slider(ui: &mut egui::Ui, state: &PanelState, actions: &mut Vec<UiAction>) {
    let mut speed = state.speed;
    let changed = ui
        .add(
            egui::Slider::new(&mut speed, 0.0..=2.0)
                .step_by(0.05)
                .fixed_decimals(2)
                .suffix("x")
                .text("Speed"),
        )
        .changed();
    if changed {
        actions.push(UiAction::SetSpeed(speed));
    }
}

fn light_slider(ui: &mut egui::Ui, state: &PanelState, actions: &mut Vec<UiAction>) {
    let mut factor = state.light_factor;
    let changed = ui
        .add(
            egui::Slider::new(&mut factor, 0.0..=1.5)
                .step_by(0.05)
                .fixed_decimals(2)
                .text("Light"),
        )
        .changed();
    if changed {
        actions.push(UiAction::SetLightFactor(factor));
    }
}

fn color_row(ui: &mut egui::Ui, state: &PanelState, actions: &mut Vec<UiAction>) {
    let _ = ui.horizontal(|ui| {
        let _ = ui.label("Color");
        let mut rgb = state.color.map(|c| (c * 255.0).round() as u8);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            actions.push(UiAction::SetColor(rgb.map(|c| f32::from(c) / 255.0)));
        }
    });
}

fn open_button(ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
    if ui.button("Open model...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("glTF", &["gltf", "glb"])
            .pick_file()
        {
            actions.push(UiAction::OpenModel(path));
        }
    }
}
