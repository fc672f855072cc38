/// Input events decoupled from the windowing backend.
///
/// The windowing layer translates raw window events into these and feeds
/// them to [`handle_input`](crate::ViewerEngine::handle_input); the engine
/// turns them into camera motion and picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to an absolute viewport position, in physical pixels.
    CursorMoved {
        /// Horizontal position, origin at the viewport's left edge.
        x: f32,
        /// Vertical position, origin at the viewport's top edge.
        y: f32,
    },
    /// Mouse button state change.
    MouseButton {
        /// The button that changed.
        button: MouseButton,
        /// `true` on press, `false` on release.
        pressed: bool,
    },
    /// Scroll wheel movement; positive values zoom in.
    Scroll {
        /// Signed scroll amount in line-sized steps.
        delta: f32,
    },
}

/// Mouse button identifier, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button, drives the orbit drag.
    Left,
    /// Secondary button.
    Right,
    /// Wheel click.
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Raw;
        match button {
            Raw::Right => Self::Right,
            Raw::Middle => Self::Middle,
            Raw::Left | Raw::Back | Raw::Forward | Raw::Other(_) => Self::Left,
        }
    }
}
