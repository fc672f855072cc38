//! Input handling: platform-agnostic event types and key-bindable actions.

/// Platform-agnostic input events.
pub mod event;
/// Engine-level actions that can be bound to keys.
pub mod keyboard;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
