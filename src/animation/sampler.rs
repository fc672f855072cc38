//! Clip-to-palette sampling.
//!
//! Sampling runs on the CPU once per frame. Cost is linear in node count,
//! which stays small for character assets, so no caching beyond the per-call
//! global-transform memo is needed.

use glam::Mat4;
use rustc_hash::FxHashMap;

use super::AnimClip;
use crate::assets::CharacterData;

/// Sample `clip` at `time` seconds and return the joint palette: one matrix
/// per palette slot, each `global(joint) * inverse_bind(joint)`.
///
/// `time` may be any clock value; it is folded into the clip's range first.
#[must_use]
pub fn sample_palette(data: &CharacterData, clip: &AnimClip, time: f32) -> Vec<Mat4> {
    let t = clip.wrap_time(time);
    let locals = (0..data.parent.len())
        .map(|i| {
            let translation = clip
                .t_tracks
                .get(&i)
                .and_then(|track| track.sample(t))
                .unwrap_or_else(|| data.base_t.get(i).copied().unwrap_or_default());
            let rotation = clip
                .r_tracks
                .get(&i)
                .and_then(|track| track.sample(t))
                .unwrap_or_else(|| data.base_r.get(i).copied().unwrap_or_default());
            let scale = clip
                .s_tracks
                .get(&i)
                .and_then(|track| track.sample(t))
                .unwrap_or_else(|| data.base_s.get(i).copied().unwrap_or(glam::Vec3::ONE));
            Mat4::from_scale_rotation_translation(scale, rotation, translation)
        })
        .collect::<Vec<_>>();
    palette_from_locals(data, &locals)
}

/// Palette for the rest pose, used before any clip plays and for assets
/// that carry no animations at all.
#[must_use]
pub fn bind_pose_palette(data: &CharacterData) -> Vec<Mat4> {
    let locals = (0..data.parent.len())
        .map(|i| {
            Mat4::from_scale_rotation_translation(
                data.base_s.get(i).copied().unwrap_or(glam::Vec3::ONE),
                data.base_r.get(i).copied().unwrap_or_default(),
                data.base_t.get(i).copied().unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    palette_from_locals(data, &locals)
}

fn palette_from_locals(data: &CharacterData, locals: &[Mat4]) -> Vec<Mat4> {
    let mut memo: FxHashMap<usize, Mat4> = FxHashMap::default();
    data.joints
        .nodes
        .iter()
        .zip(&data.joints.inverse_bind)
        .map(|(&node, &inverse_bind)| {
            global_transform(node, &data.parent, locals, &mut memo) * inverse_bind
        })
        .collect()
}

fn global_transform(
    node: usize,
    parent: &[Option<usize>],
    locals: &[Mat4],
    memo: &mut FxHashMap<usize, Mat4>,
) -> Mat4 {
    if let Some(m) = memo.get(&node) {
        return *m;
    }
    let own = locals.get(node).copied().unwrap_or(Mat4::IDENTITY);
    let m = match parent.get(node).copied().flatten() {
        Some(p) => global_transform(p, parent, locals, memo) * own,
        None => own,
    };
    let _ = memo.insert(node, m);
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{TrackQuat, TrackVec3};
    use crate::assets::JointSet;
    use glam::{Quat, Vec3};

    /// Two-node chain: node 1 is parented to node 0 and offset one unit up.
    /// Inverse binds are chosen so the bind-pose palette is identity.
    fn chain() -> CharacterData {
        let bind_root = Mat4::IDENTITY;
        let bind_child = Mat4::from_translation(Vec3::Y);
        CharacterData {
            joints: JointSet {
                nodes: vec![0, 1],
                inverse_bind: vec![bind_root.inverse(), bind_child.inverse()],
            },
            parent: vec![None, Some(0)],
            base_t: vec![Vec3::ZERO, Vec3::Y],
            base_r: vec![Quat::IDENTITY, Quat::IDENTITY],
            base_s: vec![Vec3::ONE, Vec3::ONE],
            ..CharacterData::default()
        }
    }

    fn translation_of(m: Mat4) -> Vec3 {
        m.to_scale_rotation_translation().2
    }

    #[test]
    fn bind_pose_palette_is_identity_when_inverse_bind_matches() {
        let data = chain();
        let palette = bind_pose_palette(&data);
        assert_eq!(palette.len(), 2);
        for m in palette {
            assert!((m - Mat4::IDENTITY).abs_diff_eq(Mat4::ZERO, 1e-5));
        }
    }

    #[test]
    fn root_translation_carries_into_child_palette() {
        let data = chain();
        let mut clip = AnimClip::named("walk".to_owned());
        clip.duration = 1.0;
        let _ = clip.t_tracks.insert(
            0,
            TrackVec3 {
                times: vec![0.0, 1.0],
                values: vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)],
            },
        );

        let palette = sample_palette(&data, &clip, 0.5);
        // Both joints move with the root, relative to their own bind pose.
        assert!((translation_of(palette[0]) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((translation_of(palette[1]) - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn untracked_nodes_hold_their_rest_pose() {
        let data = chain();
        let mut clip = AnimClip::named("idle".to_owned());
        clip.duration = 1.0;
        let _ = clip.r_tracks.insert(
            1,
            TrackQuat {
                times: vec![0.0, 1.0],
                values: vec![Quat::IDENTITY, Quat::IDENTITY],
            },
        );

        let palette = sample_palette(&data, &clip, 0.25);
        // No translation track anywhere: palette stays at identity.
        assert!(translation_of(palette[0]).length() < 1e-5);
        assert!(translation_of(palette[1]).length() < 1e-5);
    }

    #[test]
    fn sampling_wraps_past_clip_end() {
        let data = chain();
        let mut clip = AnimClip::named("loop".to_owned());
        clip.duration = 2.0;
        let _ = clip.t_tracks.insert(
            0,
            TrackVec3 {
                times: vec![0.0, 2.0],
                values: vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)],
            },
        );

        let wrapped = sample_palette(&data, &clip, 2.5);
        let direct = sample_palette(&data, &clip, 0.5);
        assert!(
            (translation_of(wrapped[0]) - translation_of(direct[0])).length() < 1e-5
        );
    }
}
