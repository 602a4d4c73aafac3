use std::sync::Arc;

use glam::Mat4;

use ember_animation::{BoneLines, PoseBuffers, Skeleton};
use ember_resources::Model;

/// Skinned model component of a scene node.
///
/// Owns the per-instance bone buffers; the skeleton and clips stay shared
/// with every other instance of the same model.
#[derive(Debug, Clone)]
pub struct SkinnedModel {
    model: Arc<Model>,
    pub(crate) skeleton: Arc<Skeleton>,
    pub(crate) pose: PoseBuffers,
    pub(crate) bone_lines: BoneLines,
    pub(crate) bone_lines_valid: bool,
}

impl SkinnedModel {
    /// Returns `None` for models without a skeleton.
    #[must_use]
    pub fn new(model: Arc<Model>) -> Option<Self> {
        let skeleton = Arc::clone(model.skeleton()?);
        let count = skeleton.len();
        Some(Self {
            model,
            skeleton,
            pose: PoseBuffers::new(count),
            bone_lines: BoneLines::new(count),
            bone_lines_valid: false,
        })
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// Final per-bone transforms from the last tick, indexed like the skeleton's bones.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> &PoseBuffers {
        &self.pose
    }

    /// Model-space bone segments, if the last tick produced them.
    #[inline]
    #[must_use]
    pub fn bone_lines(&self) -> Option<&BoneLines> {
        self.bone_lines_valid.then_some(&self.bone_lines)
    }

    /// Skinning palette for GPU upload.
    pub fn joint_matrices(&self, out: &mut Vec<Mat4>) {
        self.pose.joint_matrices(out);
    }
}
