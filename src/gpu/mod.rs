//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, texture targets, and shared
//! pipeline boilerplate.

/// Shared wgpu boilerplate helpers for the forward pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth/shadow targets and image uploads.
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
pub use texture::{DepthTarget, ShadowMap};
