//! Pointer input and key action dispatch for the engine.

use glam::Vec2;

use super::ViewerEngine;
use crate::input::{InputEvent, KeyAction, MouseButton};
use crate::picking;

impl ViewerEngine {
    /// Process a platform-agnostic input event.
    ///
    /// This is the primary input entry point. Consumers forward raw window
    /// events as [`InputEvent`] variants; the engine internally dispatches
    /// to camera orbit/zoom and character picking.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.dispatch_cursor_moved(x, y);
            }
            InputEvent::MouseButton { button, pressed } => {
                self.dispatch_mouse_button(button, pressed);
            }
            InputEvent::Scroll { delta } => {
                self.camera_controller.rig.zoom(delta);
            }
        }
    }

    /// Cursor moved: compute the delta, orbit while the button is held.
    fn dispatch_cursor_moved(&mut self, x: f32, y: f32) {
        let delta = match self.last_cursor_pos {
            Some((lx, ly)) => Vec2::new(x - lx, y - ly),
            None => Vec2::ZERO,
        };
        self.last_cursor_pos = Some((x, y));

        if self.camera_controller.mouse_pressed {
            self.camera_controller.rig.rotate(delta);
        }
    }

    /// Any press tries a character pick. Only the left button drives the
    /// orbit drag, so its press doubles as the drag start.
    fn dispatch_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button == MouseButton::Left {
            self.camera_controller.mouse_pressed = pressed;
        }
        if pressed {
            self.pick_at_cursor();
        }
    }

    /// Raycast the cursor against the posed character; any hit toggles
    /// play/pause. Does nothing with no model installed or on a miss.
    fn pick_at_cursor(&mut self) {
        let Some((x, y)) = self.last_cursor_pos else {
            return;
        };
        let Some(character) = self.character.as_ref() else {
            return;
        };

        let ray = picking::screen_to_ray(
            x,
            y,
            self.context.width() as f32,
            self.context.height() as f32,
            self.camera_controller.camera.build_matrix(),
        );
        if let Some(hit) = picking::pick_character(
            &ray,
            &character.data,
            &character.palette,
            character.transform,
        ) {
            log::debug!(
                "picked primitive {} at distance {:.2}",
                hit.primitive,
                hit.distance
            );
            self.toggle_playback();
        }
    }
}

// ── KeyAction execution ──

impl KeyAction {
    /// Execute this action on the given engine.
    pub fn execute(self, engine: &mut ViewerEngine) {
        match self {
            Self::TogglePlayback => engine.toggle_playback(),
            Self::ResetAnimation => engine.reset_animation(),
            Self::ToggleAutoRotate => {
                let _ = engine.toggle_auto_rotate();
            }
        }
    }
}
