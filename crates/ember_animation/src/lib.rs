//! Skeletal animation core for the Ember engine.
//!
//! Data flow per simulation tick:
//!
//! 1. [`PlaybackState::advance`] moves the frame and wraps it.
//! 2. [`interpolate`] writes each bone's local pose for that frame.
//! 3. [`compose_bone_transforms`] turns local poses into final bone transforms.
//! 4. Optionally [`project_bone_lines`] produces debug head/tail segments.
//!
//! [`Skeleton`] and [`SkeletalClip`] are immutable after load and can be
//! shared freely between instances; [`PoseBuffers`], [`BoneLines`] and
//! [`PlaybackState`] are owned by a single instance.

pub mod clip;
pub mod compose;
pub mod interpolate;
pub mod playback;
pub mod pose;
pub mod skeleton;

pub use clip::{BonePose, BoneTrack, SkeletalClip};
pub use compose::{compose_bone_transforms, project_bone_lines};
pub use interpolate::{KeyframeBracket, KeyframeCursor, interpolate, interpolate_with_cursor};
pub use playback::PlaybackState;
pub use pose::{BoneLines, PoseBuffers};
pub use skeleton::{Bone, BoneDesc, Skeleton};
