//! Core utilities and foundational types for the Ember engine.

pub mod errors;
pub mod math;
pub mod settings;

pub use errors::{EmberError, Incompatibility, ResourceError, Result, ResultExt};
pub use math::RigidTransform;
pub use settings::{AnimationSettings, DebugSettings, EngineSettings};

pub use glam;
