//! glTF/GLB character import.
//!
//! Walks every mesh-bearing node in the document and flattens it into
//! [`CharacterData`]. Skinned primitives keep their joint/weight attributes
//! remapped into the combined palette; rigid primitives are baked into model
//! space by their node's bind-pose global transform and pinned to a synthetic
//! single joint, so they still follow the node during animation.

use std::path::Path;

use glam::{Mat3, Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::animation::Property;
use gltf::mesh::util::{ReadIndices, ReadJoints, ReadWeights};
use rustc_hash::FxHashMap;

use super::{CharacterData, JointSet, MeshPrimitive, SkinVertex};
use crate::animation::{AnimClip, TrackQuat, TrackVec3};
use crate::error::ViewerError;

/// Load a character from a `.glb` or `.gltf` file on disk.
///
/// # Errors
///
/// Returns [`ViewerError::AssetLoad`] when the file cannot be parsed or a
/// primitive is missing required attributes.
pub fn load_character(path: &Path) -> Result<CharacterData, ViewerError> {
    let (doc, buffers, _images) = gltf::import(path)?;

    let node_count = doc.nodes().len();
    let mut parent: Vec<Option<usize>> = vec![None; node_count];
    for node in doc.nodes() {
        for child in node.children() {
            parent[child.index()] = Some(node.index());
        }
    }

    let mut base_t = vec![Vec3::ZERO; node_count];
    let mut base_r = vec![Quat::IDENTITY; node_count];
    let mut base_s = vec![Vec3::ONE; node_count];
    let mut node_names = vec![String::new(); node_count];
    let mut local_bind = vec![Mat4::IDENTITY; node_count];
    for node in doc.nodes() {
        let i = node.index();
        let (t, r, s) = decompose(&node);
        base_t[i] = t;
        base_r[i] = r;
        base_s[i] = s;
        local_bind[i] = Mat4::from_scale_rotation_translation(s, r, t);
        node_names[i] = node.name().unwrap_or_default().to_owned();
    }

    // Concatenate all skins into one palette; remember each skin's base slot.
    let mut joints = JointSet::default();
    let mut skin_offset: FxHashMap<usize, u32> = FxHashMap::default();
    for skin in doc.skins() {
        let offset = u32::try_from(joints.len())
            .map_err(|_| ViewerError::AssetLoad("joint palette too large".to_owned()))?;
        let _ = skin_offset.insert(skin.index(), offset);

        let reader = skin.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
        let inverse_bind: Vec<Mat4> = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_default();
        for (k, joint) in skin.joints().enumerate() {
            joints.nodes.push(joint.index());
            joints
                .inverse_bind
                .push(inverse_bind.get(k).copied().unwrap_or(Mat4::IDENTITY));
        }
    }

    let mut bind_memo: FxHashMap<usize, Mat4> = FxHashMap::default();
    let mut primitives = Vec::new();
    for node in doc.nodes() {
        let Some(mesh) = node.mesh() else { continue };
        for (pi, prim) in mesh.primitives().enumerate() {
            let name = node
                .name()
                .or_else(|| mesh.name())
                .map_or_else(|| format!("primitive{pi}"), str::to_owned);
            let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| {
                    ViewerError::AssetLoad(format!("primitive {name} has no positions"))
                })?
                .collect();
            let normals: Vec<[f32; 3]> = reader.read_normals().map_or_else(
                || vec![[0.0, 1.0, 0.0]; positions.len()],
                Iterator::collect,
            );
            let indices: Vec<u32> = reader.read_indices().map_or_else(
                || (0..positions.len() as u32).collect(),
                |ri| match ri {
                    ReadIndices::U8(it) => it.map(u32::from).collect(),
                    ReadIndices::U16(it) => it.map(u32::from).collect(),
                    ReadIndices::U32(it) => it.collect(),
                },
            );

            let vertices = if let Some(skin) = node.skin() {
                let offset = skin_offset.get(&skin.index()).copied().unwrap_or(0);
                skinned_vertices(&name, &reader, &positions, &normals, offset)?
            } else {
                let bind = global_bind(node.index(), &parent, &local_bind, &mut bind_memo);
                baked_vertices(&positions, &normals, bind, &mut joints, node.index())
            };

            primitives.push(MeshPrimitive {
                name,
                vertices,
                indices,
            });
        }
    }

    let mut clips = Vec::new();
    for (ai, anim) in doc.animations().enumerate() {
        let mut clip = AnimClip::named(
            anim.name()
                .map_or_else(|| format!("clip{ai}"), str::to_owned),
        );
        for channel in anim.channels() {
            let target = channel.target().node().index();
            let reader = channel.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let Some(times) = reader.read_inputs().map(Iterator::collect::<Vec<f32>>) else {
                continue;
            };
            let Some(outputs) = reader.read_outputs() else {
                continue;
            };
            if let Some(last) = times.last() {
                clip.duration = clip.duration.max(*last);
            }
            match (channel.target().property(), outputs) {
                (Property::Translation, ReadOutputs::Translations(it)) => {
                    let values = it.map(Vec3::from).collect();
                    let _ = clip.t_tracks.insert(target, TrackVec3 { times, values });
                }
                (Property::Rotation, ReadOutputs::Rotations(rot)) => {
                    let values = rot
                        .into_f32()
                        .map(|r| Quat::from_xyzw(r[0], r[1], r[2], r[3]).normalize())
                        .collect();
                    let _ = clip.r_tracks.insert(target, TrackQuat { times, values });
                }
                (Property::Scale, ReadOutputs::Scales(it)) => {
                    let values = it.map(Vec3::from).collect();
                    let _ = clip.s_tracks.insert(target, TrackVec3 { times, values });
                }
                // Morph targets are not animated by this viewer.
                _ => {}
            }
        }
        clips.push(clip);
    }

    let data = CharacterData {
        primitives,
        joints,
        parent,
        base_t,
        base_r,
        base_s,
        clips,
        node_names,
    };
    log::info!(
        "loaded character: {} primitives, {} triangles, {} joints, {} clips",
        data.primitives.len(),
        data.triangle_count(),
        data.joints.len(),
        data.clips.len()
    );
    Ok(data)
}

fn decompose(node: &gltf::Node) -> (Vec3, Quat, Vec3) {
    match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            let m = Mat4::from_cols_array_2d(&matrix);
            let (s, r, t) = m.to_scale_rotation_translation();
            (t, r, s)
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => (
            Vec3::from(translation),
            Quat::from_xyzw(rotation[0], rotation[1], rotation[2], rotation[3]).normalize(),
            Vec3::from(scale),
        ),
    }
}

fn skinned_vertices<'a, 's, F>(
    name: &str,
    reader: &gltf::mesh::Reader<'a, 's, F>,
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    palette_offset: u32,
) -> Result<Vec<SkinVertex>, ViewerError>
where
    F: Clone + Fn(gltf::Buffer<'a>) -> Option<&'s [u8]>,
{
    let joints: Vec<[u16; 4]> = match reader.read_joints(0) {
        Some(ReadJoints::U8(it)) => it.map(|j| j.map(u16::from)).collect(),
        Some(ReadJoints::U16(it)) => it.collect(),
        None => {
            return Err(ViewerError::AssetLoad(format!(
                "skinned primitive {name} has no joint attribute"
            )))
        }
    };
    let weights: Vec<[f32; 4]> = match reader.read_weights(0) {
        Some(ReadWeights::F32(it)) => it.collect(),
        Some(ReadWeights::U8(it)) => it.map(|w| w.map(|x| f32::from(x) / 255.0)).collect(),
        Some(ReadWeights::U16(it)) => it.map(|w| w.map(|x| f32::from(x) / 65535.0)).collect(),
        None => {
            return Err(ViewerError::AssetLoad(format!(
                "skinned primitive {name} has no weight attribute"
            )))
        }
    };

    let offset = palette_offset as u16;
    Ok(positions
        .iter()
        .enumerate()
        .map(|(i, &position)| SkinVertex {
            position,
            normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            joints: joints
                .get(i)
                .copied()
                .unwrap_or_default()
                .map(|j| j + offset),
            weights: weights.get(i).copied().unwrap_or([1.0, 0.0, 0.0, 0.0]),
        })
        .collect())
}

/// Bake a rigid primitive into model space and attach it to a fresh
/// single-entry joint so it animates with its node.
fn baked_vertices(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    bind: Mat4,
    joints: &mut JointSet,
    node_index: usize,
) -> Vec<SkinVertex> {
    let slot = joints.len() as u16;
    joints.nodes.push(node_index);
    joints.inverse_bind.push(bind.inverse());

    let normal_m = normal_matrix(bind);
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let n = Vec3::from(normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]));
            SkinVertex {
                position: bind.transform_point3(Vec3::from(p)).to_array(),
                normal: (normal_m * n).normalize_or_zero().to_array(),
                joints: [slot, 0, 0, 0],
                weights: [1.0, 0.0, 0.0, 0.0],
            }
        })
        .collect()
}

fn normal_matrix(m: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(m);
    if linear.determinant().abs() < f32::EPSILON {
        Mat3::IDENTITY
    } else {
        linear.inverse().transpose()
    }
}

fn global_bind(
    node: usize,
    parent: &[Option<usize>],
    local: &[Mat4],
    memo: &mut FxHashMap<usize, Mat4>,
) -> Mat4 {
    if let Some(m) = memo.get(&node) {
        return *m;
    }
    let own = local.get(node).copied().unwrap_or(Mat4::IDENTITY);
    let m = match parent.get(node).copied().flatten() {
        Some(p) => global_bind(p, parent, local, memo) * own,
        None => own,
    };
    let _ = memo.insert(node, m);
    m
}
