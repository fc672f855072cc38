//! Playback and appearance controls.
//!
//! Each public method is one state mutation, fired synchronously by a UI
//! event, a keybinding, or the pointer picker. The frame loop only reads
//! the resulting state.

use std::path::PathBuf;

use super::ViewerEngine;

const STATUS_LOADING: &str = "Loading...";
const STATUS_PLAYING: &str = "Playing";
const STATUS_PAUSED: &str = "Paused";
const STATUS_RESTARTED: &str = "Restarted";
const STATUS_NO_ANIMATION: &str = "Loaded (no animation)";
const STATUS_LOAD_FAILED: &str = "Failed to load model";

/// Play/pause flag, speed multiplier, and status line, kept apart from the
/// GPU objects so the transition rules stay testable.
///
/// The flag flips even with no clip to drive; the install/failure markers
/// come from the loader path.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlaybackState {
    /// Whether the animation clock advances each frame.
    pub(crate) is_playing: bool,
    /// Speed multiplier mirrored from the slider, applied to the clip
    /// player on install and on every slider change.
    pub(crate) speed: f32,
    /// Most recent status line shown by the UI.
    pub(crate) status: String,
}

impl PlaybackState {
    /// Initial state: playing, waiting for the first load.
    pub(crate) fn new(speed: f32) -> Self {
        Self {
            is_playing: true,
            speed,
            status: STATUS_LOADING.to_owned(),
        }
    }

    /// Flip play/pause. Always flips the flag and rewrites the status,
    /// whether or not a clip exists.
    pub(crate) fn toggle(&mut self) {
        self.is_playing = !self.is_playing;
        self.status = if self.is_playing {
            STATUS_PLAYING
        } else {
            STATUS_PAUSED
        }
        .to_owned();
    }

    /// Record a rewind-and-resume: forces playing.
    pub(crate) fn mark_restarted(&mut self) {
        self.is_playing = true;
        self.status = STATUS_RESTARTED.to_owned();
    }

    /// Record a finished character install.
    pub(crate) fn mark_loaded(&mut self, has_animation: bool) {
        self.status = if has_animation {
            STATUS_PLAYING
        } else {
            STATUS_NO_ANIMATION
        }
        .to_owned();
    }

    /// Record a failed character load.
    pub(crate) fn mark_failed(&mut self) {
        self.status = STATUS_LOAD_FAILED.to_owned();
    }

    /// Record the start of a (re)load.
    pub(crate) fn mark_loading(&mut self) {
        self.status = STATUS_LOADING.to_owned();
    }
}

impl ViewerEngine {
    /// Flip animation play/pause and update the status line. Works before
    /// the model arrives and for models without clips; the flag and labels
    /// change, nothing else does.
    pub fn toggle_playback(&mut self) {
        self.playback.toggle();
    }

    /// Rewind the animation to its start and resume playing. Does nothing
    /// until an animated character is installed.
    pub fn reset_animation(&mut self) {
        let Some(character) = self
            .character
            .as_mut()
            .filter(|c| c.has_animation())
        else {
            return;
        };
        character.rewind();
        self.playback.mark_restarted();
    }

    /// Flip continuous camera auto-rotation and return the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.camera_controller.rig.toggle_auto_rotate()
    }

    /// Set the playback speed multiplier from the slider value. The value
    /// is kept on the engine so a model that finishes loading later starts
    /// at the slider's speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.playback.speed = speed;
        if let Some(character) = self.character.as_mut() {
            character.set_time_scale(speed);
        }
    }

    /// Set the shared light intensity factor. The environment uniform is
    /// pushed on the next frame.
    pub fn set_light_factor(&mut self, factor: f32) {
        self.lights.set_factor(factor);
    }

    /// Recolor every character mesh immediately. The color is kept for
    /// models that finish loading later.
    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
        if let Some(character) = self.character.as_mut() {
            character.set_color(color, &self.context.queue);
        }
    }

    /// Start loading a replacement character asset. The current character
    /// keeps rendering until the new parse lands; a failed parse leaves it
    /// in place.
    pub fn open_model(&mut self, path: PathBuf) {
        log::info!("loading model from {}", path.display());
        self.playback.mark_loading();
        self.loader.load_character(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_round_trips() {
        let mut state = PlaybackState::new(1.0);
        state.mark_loaded(true);
        let initial_flag = state.is_playing;
        let initial_status = state.status.clone();

        state.toggle();
        assert!(!state.is_playing);
        assert_eq!(state.status, "Paused");

        state.toggle();
        assert_eq!(state.is_playing, initial_flag);
        assert_eq!(state.status, initial_status);
    }

    #[test]
    fn toggle_works_without_a_loaded_model() {
        let mut state = PlaybackState::new(1.0);
        assert_eq!(state.status, "Loading...");

        state.toggle();
        assert!(!state.is_playing);
        assert_eq!(state.status, "Paused");
    }

    #[test]
    fn restart_forces_playing() {
        let mut state = PlaybackState::new(1.0);
        state.mark_loaded(true);
        state.toggle();
        assert!(!state.is_playing);

        state.mark_restarted();
        assert!(state.is_playing);
        assert_eq!(state.status, "Restarted");
    }

    #[test]
    fn load_outcomes_set_expected_statuses() {
        let mut state = PlaybackState::new(1.0);

        state.mark_loaded(false);
        assert_eq!(state.status, "Loaded (no animation)");
        // A clipless install never touches the play flag.
        assert!(state.is_playing);

        state.mark_failed();
        assert_eq!(state.status, "Failed to load model");

        state.mark_loading();
        assert_eq!(state.status, "Loading...");
    }

    #[test]
    fn initial_speed_comes_from_options() {
        let state = PlaybackState::new(1.25);
        assert_eq!(state.speed, 1.25);
        assert!(state.is_playing);
    }
}
