//! Bone transform composition.
//!
//! For every bone, in index order:
//!
//! ```text
//! final[i] = final[parent(i)] ∘ bind[i] ∘ anim[i] ∘ bind[i]⁻¹
//! ```
//!
//! Bones are stored parent-first (see [`Skeleton`]), so a forward scan visits
//! every parent before its children and behaves like a breadth-first walk
//! without a queue.

use crate::pose::{BoneLines, PoseBuffers};
use crate::skeleton::Skeleton;

/// Overwrites the local animated poses in `pose` with final bone transforms.
pub fn compose_bone_transforms(skeleton: &Skeleton, pose: &mut PoseBuffers) {
    assert_eq!(skeleton.len(), pose.len(), "pose buffers sized for another skeleton");

    for bone in skeleton.bones() {
        let i = bone.index();

        let anim = pose.bone_transform(i);
        let mut world = bone
            .bind_transform()
            .combine(&anim.combine(bone.inverse_bind_transform()));

        if let Some(parent) = bone.parent() {
            debug_assert!(parent < i, "bone {i} visited before its parent {parent}");
            world = pose.bone_transform(parent).combine(&world);
        }

        pose.set_bone_transform(i, world);
    }
}

/// Projects every bone's bind-space head and tail through its final transform.
///
/// Pure projection for the debug renderer; skipping it has no effect on skinning.
pub fn project_bone_lines(skeleton: &Skeleton, pose: &PoseBuffers, lines: &mut BoneLines) {
    lines.heads.resize(skeleton.len(), glam::Vec3::ZERO);
    lines.tails.resize(skeleton.len(), glam::Vec3::ZERO);

    for bone in skeleton.bones() {
        let i = bone.index();
        let transform = pose.bone_transform(i);
        lines.heads[i] = transform.transform_point(bone.head());
        lines.tails[i] = transform.transform_point(bone.tail());
    }
}
