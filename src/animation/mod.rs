//! Skeletal animation: keyframe clips, clip playback, and palette sampling.
//!
//! Clips come straight out of the loaded asset as per-node keyframe tracks.
//! Each frame the engine advances a [`ClipPlayer`] clock, samples the active
//! clip into node-local transforms, walks the hierarchy to global transforms,
//! and multiplies in the inverse bind matrices to produce the joint palette
//! uploaded to the GPU.

mod player;
mod sampler;

pub use player::ClipPlayer;
pub use sampler::{bind_pose_palette, sample_palette};

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

/// Keyframed `Vec3` channel (translation or scale).
#[derive(Debug, Clone, Default)]
pub struct TrackVec3 {
    /// Keyframe timestamps in seconds, ascending.
    pub times: Vec<f32>,
    /// One value per timestamp.
    pub values: Vec<Vec3>,
}

impl TrackVec3 {
    /// Sample the track at `t` seconds, clamping to the first/last keyframe
    /// outside the keyed range. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, t: f32) -> Option<Vec3> {
        let (i0, i1, u) = keyframe_span(&self.times, t)?;
        let a = self.values.get(i0).copied()?;
        let b = self.values.get(i1).copied()?;
        Some(a.lerp(b, u))
    }
}

/// Keyframed rotation channel.
#[derive(Debug, Clone, Default)]
pub struct TrackQuat {
    /// Keyframe timestamps in seconds, ascending.
    pub times: Vec<f32>,
    /// One unit quaternion per timestamp.
    pub values: Vec<Quat>,
}

impl TrackQuat {
    /// Sample the track at `t` seconds with shortest-path spherical
    /// interpolation. Returns `None` for an empty track.
    #[must_use]
    pub fn sample(&self, t: f32) -> Option<Quat> {
        let (i0, i1, u) = keyframe_span(&self.times, t)?;
        let a = self.values.get(i0).copied()?;
        let b = self.values.get(i1).copied()?;
        Some(a.slerp(b, u).normalize())
    }
}

/// One animation clip: node-indexed TRS tracks plus the overall duration.
#[derive(Debug, Clone, Default)]
pub struct AnimClip {
    /// Clip name from the asset, or a generated fallback.
    pub name: String,
    /// Clip length in seconds (latest keyframe across all tracks).
    pub duration: f32,
    /// Translation tracks keyed by scene-node index.
    pub t_tracks: FxHashMap<usize, TrackVec3>,
    /// Rotation tracks keyed by scene-node index.
    pub r_tracks: FxHashMap<usize, TrackQuat>,
    /// Scale tracks keyed by scene-node index.
    pub s_tracks: FxHashMap<usize, TrackVec3>,
}

impl AnimClip {
    /// Empty clip with the given name.
    #[must_use]
    pub fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Fold a clock value into `[0, duration)`. Zero-length clips pin to zero.
    #[must_use]
    pub fn wrap_time(&self, t: f32) -> f32 {
        if self.duration > 0.0 {
            t.rem_euclid(self.duration)
        } else {
            0.0
        }
    }
}

/// Locate the keyframe pair bracketing `t` and the interpolation factor
/// between them. Clamps to the ends of the keyed range.
fn keyframe_span(times: &[f32], t: f32) -> Option<(usize, usize, f32)> {
    let first = *times.first()?;
    let last = *times.last()?;
    if t <= first {
        return Some((0, 0, 0.0));
    }
    if t >= last {
        let end = times.len() - 1;
        return Some((end, end, 0.0));
    }
    // partition_point gives the first index with time > t; t is strictly
    // inside the range here, so i0 is valid.
    let i1 = times.partition_point(|&k| k <= t);
    let i0 = i1 - 1;
    let t0 = times.get(i0).copied()?;
    let t1 = times.get(i1).copied()?;
    let span = t1 - t0;
    let u = if span > 0.0 { (t - t0) / span } else { 0.0 };
    Some((i0, i1, u))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_track() -> TrackVec3 {
        TrackVec3 {
            times: vec![0.0, 1.0, 3.0],
            values: vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 4.0, 0.0),
            ],
        }
    }

    #[test]
    fn track_clamps_before_first_keyframe() {
        let track = ramp_track();
        assert_eq!(track.sample(-5.0), Some(Vec3::ZERO));
        assert_eq!(track.sample(0.0), Some(Vec3::ZERO));
    }

    #[test]
    fn track_clamps_after_last_keyframe() {
        let track = ramp_track();
        assert_eq!(track.sample(3.0), Some(Vec3::new(2.0, 4.0, 0.0)));
        assert_eq!(track.sample(100.0), Some(Vec3::new(2.0, 4.0, 0.0)));
    }

    #[test]
    fn track_interpolates_within_span() {
        let track = ramp_track();
        let mid = track.sample(0.5).unwrap();
        assert!((mid - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        // Uneven spans interpolate by local factor, not global time.
        let late = track.sample(2.0).unwrap();
        assert!((late - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn empty_track_samples_to_none() {
        let track = TrackVec3::default();
        assert_eq!(track.sample(0.5), None);
    }

    #[test]
    fn quat_track_takes_shortest_path() {
        let track = TrackQuat {
            times: vec![0.0, 1.0],
            values: vec![
                Quat::IDENTITY,
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ],
        };
        let half = track.sample(0.5).unwrap();
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(half.angle_between(expected) < 1e-4);
    }

    #[test]
    fn wrap_time_folds_into_clip_range() {
        let clip = AnimClip {
            duration: 2.0,
            ..AnimClip::default()
        };
        assert!((clip.wrap_time(0.5) - 0.5).abs() < 1e-6);
        assert!((clip.wrap_time(2.0)).abs() < 1e-6);
        assert!((clip.wrap_time(4.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_time_of_zero_length_clip_is_zero() {
        let clip = AnimClip::named("static".to_owned());
        assert!((clip.wrap_time(7.0)).abs() < f32::EPSILON);
    }
}
