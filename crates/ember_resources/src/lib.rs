//! Resource definitions, storage and model cross-validation for the Ember engine.

pub mod manager;
pub mod material;
pub mod mesh;
pub mod model;
pub mod storage;

pub use manager::{
    MaterialHandle, MeshHandle, ModelHandle, ResourceManager, SkelAnimHandle, SkeletonHandle,
};
pub use material::{Material, MaterialFeatures};
pub use mesh::{Mesh, MeshAttributes};
pub use model::{Model, ModelDesc, SubModel, SubModelDesc};
pub use storage::ResourceStorage;
