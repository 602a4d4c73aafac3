//! Scene graph system
//!
//! - [`Node`]: hierarchy links and transform
//! - [`Transform`]: rigid node placement with cached local/world matrices
//! - [`Scene`]: node storage, skinned model components and controllers
//! - [`Controller`]: per-tick node drivers (skeletal animation, spin)

pub mod controller;
pub mod node;
pub mod scene;
pub mod skinned;
pub mod transform;
pub mod transform_system;

pub use controller::{
    Controller, ControllerKind, PlaybackStatus, SkelAnimController, SpinController, TickContext,
    Updatable,
};
pub use node::Node;
pub use scene::Scene;
pub use skinned::SkinnedModel;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct ControllerHandle;
}
