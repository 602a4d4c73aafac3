use glam::{Quat, Vec3};

use ember_core::{ResourceError, RigidTransform};

use crate::skeleton::Skeleton;

/// One keyed pose of one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl BonePose {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    #[inline]
    #[must_use]
    pub const fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Shortest-arc slerp for rotation, lerp for translation.
    #[inline]
    #[must_use]
    pub fn blend(&self, other: &Self, t: f32) -> Self {
        Self {
            rotation: self.rotation.slerp(other.rotation, t),
            translation: self.translation.lerp(other.translation, t),
        }
    }
}

impl From<BonePose> for RigidTransform {
    fn from(pose: BonePose) -> Self {
        RigidTransform::new(pose.rotation, pose.translation)
    }
}

/// Keyed poses of a single bone. Empty means the bone is not animated by the clip.
#[derive(Debug, Clone, Default)]
pub struct BoneTrack {
    pub poses: Vec<BonePose>,
}

impl BoneTrack {
    /// A track that leaves its bone at the identity pose.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(poses: Vec<BonePose>) -> Self {
        Self { poses }
    }

    #[inline]
    #[must_use]
    pub fn is_animated(&self) -> bool {
        !self.poses.is_empty()
    }
}

/// A keyframed skeletal animation.
///
/// `keyframes` are global frame numbers shared by every track: an animated
/// track stores its pose for `keyframes[k]` at `poses[k]`.
#[derive(Debug, Clone)]
pub struct SkeletalClip {
    name: String,
    frame_count: u32,
    keyframes: Vec<u32>,
    tracks: Vec<BoneTrack>,
}

impl SkeletalClip {
    /// Builds a clip and checks its internal consistency.
    ///
    /// The clip must span at least one frame. Keyframes must be non-empty,
    /// strictly increasing and not past `frame_count`. Every animated track
    /// must hold exactly one pose per keyframe.
    pub fn new(
        name: impl Into<String>,
        frame_count: u32,
        keyframes: Vec<u32>,
        tracks: Vec<BoneTrack>,
    ) -> Result<Self, ResourceError> {
        let name = name.into();

        if keyframes.is_empty() || frame_count == 0 {
            return Err(ResourceError::EmptyKeyframes { anim: name });
        }

        if let Some(position) = keyframes.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ResourceError::UnorderedKeyframes {
                anim: name,
                position: position + 1,
            });
        }

        if let Some(&keyframe) = keyframes.iter().find(|&&k| k > frame_count) {
            return Err(ResourceError::KeyframeOutOfRange {
                anim: name,
                keyframe,
                frame_count,
            });
        }

        if let Some((track, t)) = tracks
            .iter()
            .enumerate()
            .find(|(_, t)| t.is_animated() && t.poses.len() != keyframes.len())
        {
            return Err(ResourceError::TrackLength {
                anim: name,
                track,
                poses: t.poses.len(),
                keyframes: keyframes.len(),
            });
        }

        Ok(Self {
            name,
            frame_count,
            keyframes,
            tracks,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip length in frames. Playback frames live in `[0, frame_count)`.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[u32] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[BoneTrack] {
        &self.tracks
    }

    /// Rejects a clip that does not carry one track per skeleton bone.
    pub fn validate_for(&self, skeleton: &Skeleton) -> Result<(), ResourceError> {
        if self.tracks.len() == skeleton.len() {
            Ok(())
        } else {
            Err(ResourceError::BoneCountMismatch {
                anim: self.name.clone(),
                skeleton: skeleton.name().to_string(),
                tracks: self.tracks.len(),
                bones: skeleton.len(),
            })
        }
    }
}
