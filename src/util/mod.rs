//! Shared utilities for the viewer.

pub mod color;
pub mod frame_timing;
