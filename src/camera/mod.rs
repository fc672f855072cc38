//! Camera system for the viewer.
//!
//! Provides a damped orbital camera rig around a fixed look-at target, with
//! drag-to-orbit, scroll zoom, and optional continuous auto-rotation.

/// Damped orbital camera controller managing goal state and GPU resources.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;

pub use controller::OrbitController;
pub use core::{Camera, CameraUniform};
