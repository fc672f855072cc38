//! In-window GUI layer: egui control panel drawn over the scene.
//!
//! The panel is painted as an extra pass onto the frame's surface texture
//! after the scene, and feeds user actions back to the engine each frame.

/// egui context, winit event bridge, and wgpu paint pass.
pub mod host;
/// Control panel layout and the actions it emits.
pub mod panel;

pub use host::EguiHost;
pub use panel::UiAction;
