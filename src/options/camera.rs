use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and orbit tuning.
pub struct CameraOptions {
    /// Vertical field of view, degrees.
    pub fovy: f32,
    /// Near clip distance.
    pub znear: f32,
    /// Far clip distance.
    pub zfar: f32,
    /// Orbit sensitivity, radians per pixel of drag.
    pub rotate_speed: f32,
    /// Dolly sensitivity per scroll step.
    pub zoom_speed: f32,
    /// Exponential damping rate per second. Higher values settle faster.
    pub damping_rate: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.01,
            zfar: 500.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            damping_rate: 8.0,
            min_distance: 0.1,
            max_distance: 200.0,
        }
    }
}
