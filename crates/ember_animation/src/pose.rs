use glam::{Mat4, Quat, Vec3};

use ember_core::RigidTransform;

/// Per-bone rotation and translation, indexed like the skeleton's bones.
///
/// The interpolator writes local animated poses here and the composer then
/// overwrites the same slots with final bone transforms. The buffers belong
/// to exactly one skinned instance and are rewritten every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseBuffers {
    pub rotations: Vec<Quat>,
    pub translations: Vec<Vec3>,
}

impl PoseBuffers {
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            rotations: vec![Quat::IDENTITY; bone_count],
            translations: vec![Vec3::ZERO; bone_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn bone_transform(&self, index: usize) -> RigidTransform {
        RigidTransform::new(self.rotations[index], self.translations[index])
    }

    #[inline]
    pub fn set_bone_transform(&mut self, index: usize, transform: RigidTransform) {
        self.rotations[index] = transform.rotation;
        self.translations[index] = transform.translation;
    }

    pub fn reset(&mut self) {
        self.rotations.fill(Quat::IDENTITY);
        self.translations.fill(Vec3::ZERO);
    }

    /// Flattens the bone transforms into joint matrices for GPU upload.
    pub fn joint_matrices(&self, out: &mut Vec<Mat4>) {
        out.clear();
        out.extend(
            self.rotations
                .iter()
                .zip(&self.translations)
                .map(|(&r, &t)| Mat4::from_rotation_translation(r, t)),
        );
    }
}

/// Debug line geometry: one head/tail segment per bone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneLines {
    pub heads: Vec<Vec3>,
    pub tails: Vec<Vec3>,
}

impl BoneLines {
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            heads: vec![Vec3::ZERO; bone_count],
            tails: vec![Vec3::ZERO; bone_count],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.heads.iter().copied().zip(self.tails.iter().copied())
    }
}
