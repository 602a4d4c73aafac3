//! Scene node controllers.
//!
//! A controller is bound to one scene node and updated once per simulation
//! tick. Each variant of [`Controller`] drives a different aspect of its node;
//! all of them implement [`Updatable`].

use std::sync::Arc;

use glam::{Quat, Vec3};
use slotmap::{SlotMap, SparseSecondaryMap};

use ember_animation::{
    KeyframeCursor, PlaybackState, SkeletalClip, compose_bone_transforms,
    interpolate_with_cursor, project_bone_lines,
};

use crate::NodeHandle;
use crate::node::Node;
use crate::skinned::SkinnedModel;

/// Scene state a controller may touch during one tick.
pub struct TickContext<'a> {
    pub nodes: &'a mut SlotMap<NodeHandle, Node>,
    pub skinned: &'a mut SparseSecondaryMap<NodeHandle, SkinnedModel>,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Produce debug bone lines this tick.
    pub draw_skeletons: bool,
}

/// Capability of being advanced once per simulation tick.
pub trait Updatable {
    fn update(&mut self, ctx: &mut TickContext<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    SkelAnim,
    Spin,
}

#[derive(Debug, Clone)]
pub enum Controller {
    SkelAnim(SkelAnimController),
    Spin(SpinController),
}

impl Controller {
    #[must_use]
    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::SkelAnim(_) => ControllerKind::SkelAnim,
            Self::Spin(_) => ControllerKind::Spin,
        }
    }

    #[must_use]
    pub fn target(&self) -> NodeHandle {
        match self {
            Self::SkelAnim(c) => c.target,
            Self::Spin(c) => c.target,
        }
    }
}

impl Updatable for Controller {
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            Self::SkelAnim(c) => c.update(ctx),
            Self::Spin(c) => c.update(ctx),
        }
    }
}

impl From<SkelAnimController> for Controller {
    fn from(c: SkelAnimController) -> Self {
        Self::SkelAnim(c)
    }
}

impl From<SpinController> for Controller {
    fn from(c: SpinController) -> Self {
        Self::Spin(c)
    }
}

// ============================================================================
// Skeletal animation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
}

/// Plays a skeletal clip on the skinned model of its target node.
///
/// Starts `Stopped` with no clip. [`bind`](Self::bind) starts looping
/// playback from frame 0; playback never stops by itself.
#[derive(Debug, Clone)]
pub struct SkelAnimController {
    target: NodeHandle,
    clip: Option<Arc<SkeletalClip>>,
    playback: PlaybackState,
    cursor: KeyframeCursor,
}

impl SkelAnimController {
    /// `step` is the number of frames advanced per tick.
    ///
    /// # Panics
    ///
    /// If `step` is negative or not finite.
    #[must_use]
    pub fn new(target: NodeHandle, step: f32) -> Self {
        check_step(step);
        Self {
            target,
            clip: None,
            playback: PlaybackState::new(step),
            cursor: KeyframeCursor::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> NodeHandle {
        self.target
    }

    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        if self.clip.is_some() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Stopped
        }
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> Option<&Arc<SkeletalClip>> {
        self.clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> f32 {
        self.playback.frame()
    }

    #[inline]
    #[must_use]
    pub fn step(&self) -> f32 {
        self.playback.step
    }

    /// # Panics
    ///
    /// If `step` is negative or not finite.
    pub fn set_step(&mut self, step: f32) {
        check_step(step);
        self.playback.step = step;
    }

    /// Starts playing `clip` from frame 0.
    ///
    /// The clip must have one track per bone of the target's skeleton, which
    /// holds for every clip of the target's model. Ticking with any other
    /// clip panics.
    pub fn bind(&mut self, clip: Arc<SkeletalClip>) {
        log::debug!("Binding SkelAnim \"{}\" to node {:?}", clip.name(), self.target);
        self.clip = Some(clip);
        self.playback.rewind();
        self.cursor.reset();
    }

    /// Advances one tick and refreshes `skinned`'s bone transforms.
    ///
    /// # Panics
    ///
    /// If no clip is bound, or the bound clip's track count differs from
    /// the skeleton's bone count.
    pub fn tick(&mut self, skinned: &mut SkinnedModel, draw_skeleton: bool) {
        let Some(clip) = self.clip.as_deref() else {
            panic!("SkelAnimController for node {:?} ticked without a bound clip", self.target);
        };

        assert_eq!(
            clip.tracks().len(),
            skinned.skeleton.len(),
            "SkelAnim \"{}\" does not fit the skeleton of node {:?}",
            clip.name(),
            self.target
        );

        let frame = self.playback.advance(clip.frame_count());
        log::trace!("SkelAnim \"{}\" frame {frame}", clip.name());

        interpolate_with_cursor(clip, frame, &mut self.cursor, &mut skinned.pose);
        compose_bone_transforms(&skinned.skeleton, &mut skinned.pose);

        if draw_skeleton {
            project_bone_lines(&skinned.skeleton, &skinned.pose, &mut skinned.bone_lines);
        }
        skinned.bone_lines_valid = draw_skeleton;
    }
}

#[inline]
fn check_step(step: f32) {
    assert!(
        step.is_finite() && step >= 0.0,
        "SkelAnimController step {step} must be finite and non-negative"
    );
}

impl Updatable for SkelAnimController {
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        match ctx.skinned.get_mut(self.target) {
            Some(skinned) => self.tick(skinned, ctx.draw_skeletons),
            None => log::warn!(
                "SkelAnimController target {:?} has no skinned model, skipping",
                self.target
            ),
        }
    }
}

// ============================================================================
// Spin
// ============================================================================

/// Rotates its target node about a fixed axis at a constant angular speed.
#[derive(Debug, Clone)]
pub struct SpinController {
    target: NodeHandle,
    axis: Vec3,
    /// Radians per second.
    pub speed: f32,
}

impl SpinController {
    #[must_use]
    pub fn new(target: NodeHandle, axis: Vec3, speed: f32) -> Self {
        Self {
            target,
            axis: axis.normalize_or(Vec3::Y),
            speed,
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> NodeHandle {
        self.target
    }
}

impl Updatable for SpinController {
    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(node) = ctx.nodes.get_mut(self.target) {
            let delta = Quat::from_axis_angle(self.axis, self.speed * ctx.dt);
            node.transform.rotation = (delta * node.transform.rotation).normalize();
        }
    }
}
