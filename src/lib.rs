//! # Ember Engine
//!
//! A 3D engine core built around skeletal animation.
//!
//! The engine is split into focused crates, re-exported here:
//!
//! | Crate | Purpose |
//! |-------|---------|
//! | [`ember_core`] | Errors, rigid transforms, settings |
//! | [`ember_animation`] | Skeletons, clips, interpolation, bone composition |
//! | [`ember_resources`] | Meshes, materials, models and their storage |
//! | [`ember_scene`] | Scene graph, skinned nodes, controllers |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ember::prelude::*;
//!
//! ember::init_logger();
//!
//! let mut engine = Engine::new(EngineSettings::default());
//! // register meshes, materials, skeletons and clips in `engine.resources` ...
//! let node = engine.spawn_model("hero", &desc)?;
//! engine.play_skel_anim(node, "walk")?;
//!
//! loop {
//!     engine.tick(1.0 / 60.0);
//!     for (node, palette) in engine.skinning_palettes() {
//!         // upload `palette` ...
//!     }
//! }
//! ```

pub mod engine;

pub use ember_animation;
pub use ember_core;
pub use ember_resources;
pub use ember_scene;

pub use ember_core::glam;
pub use ember_core::{
    AnimationSettings, DebugSettings, EmberError, EngineSettings, Incompatibility, ResourceError,
    Result, ResultExt, RigidTransform,
};

pub use ember_animation::{
    Bone, BoneDesc, BoneLines, BonePose, BoneTrack, KeyframeCursor, PlaybackState, PoseBuffers,
    SkeletalClip, Skeleton,
};

pub use ember_resources::{
    Material, MaterialFeatures, Mesh, MeshAttributes, Model, ModelDesc, ResourceManager, SubModel,
    SubModelDesc,
};

pub use ember_scene::{
    Controller, ControllerHandle, ControllerKind, Node, NodeHandle, PlaybackStatus, Scene,
    SkelAnimController, SkinnedModel, SpinController, Transform, Updatable,
};

pub use engine::Engine;

/// Installs the `env_logger` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

pub mod prelude {
    pub use crate::engine::Engine;
    pub use crate::{
        BoneDesc, BonePose, BoneTrack, Controller, DebugSettings, EngineSettings, Material,
        MaterialFeatures, Mesh, MeshAttributes, ModelDesc, NodeHandle, ResourceError, Scene,
        SkelAnimController, SkeletalClip, Skeleton, SpinController, SubModelDesc,
    };
    pub use glam::{Mat4, Quat, Vec3};
}
