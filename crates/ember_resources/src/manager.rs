use slotmap::new_key_type;
use std::sync::Arc;

use ember_animation::{SkeletalClip, Skeleton};
use ember_core::ResourceError;

use crate::material::Material;
use crate::mesh::Mesh;
use crate::model::{Model, ModelDesc};
use crate::storage::ResourceStorage;

// Strongly-typed handles
new_key_type! {
    pub struct MeshHandle;
    pub struct MaterialHandle;
    pub struct SkeletonHandle;
    pub struct SkelAnimHandle;
    pub struct ModelHandle;
}

/// Central registry of loaded resources.
///
/// Cheap to clone; clones share the same storages. Skeletons and clips
/// registered here are shared by every model (and every scene instance of
/// those models) that references them.
#[derive(Clone)]
pub struct ResourceManager {
    pub meshes: Arc<ResourceStorage<MeshHandle, Mesh>>,
    pub materials: Arc<ResourceStorage<MaterialHandle, Material>>,
    pub skeletons: Arc<ResourceStorage<SkeletonHandle, Skeleton>>,
    pub skel_anims: Arc<ResourceStorage<SkelAnimHandle, SkeletalClip>>,
    pub models: Arc<ResourceStorage<ModelHandle, Model>>,
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            meshes: Arc::new(ResourceStorage::new("Mesh")),
            materials: Arc::new(ResourceStorage::new("Material")),
            skeletons: Arc::new(ResourceStorage::new("Skeleton")),
            skel_anims: Arc::new(ResourceStorage::new("SkelAnim")),
            models: Arc::new(ResourceStorage::new("Model")),
        }
    }

    pub fn add_mesh(&self, mesh: Mesh) -> Result<MeshHandle, ResourceError> {
        let name = mesh.name.clone();
        self.meshes.add(&name, mesh)
    }

    pub fn add_material(&self, material: Material) -> Result<MaterialHandle, ResourceError> {
        let name = material.name.clone();
        self.materials.add(&name, material)
    }

    pub fn add_skeleton(&self, skeleton: Skeleton) -> Result<SkeletonHandle, ResourceError> {
        let name = skeleton.name().to_string();
        self.skeletons.add(&name, skeleton)
    }

    pub fn add_skel_anim(&self, clip: SkeletalClip) -> Result<SkelAnimHandle, ResourceError> {
        let name = clip.name().to_string();
        self.skel_anims.add(&name, clip)
    }

    /// Loads, validates and registers a model. A model that fails
    /// validation is not registered.
    pub fn load_model(&self, desc: &ModelDesc) -> Result<Arc<Model>, ResourceError> {
        let model = Model::load(desc, self)?;
        let handle = self.models.add(&desc.name, model)?;
        log::info!("Loaded model \"{}\"", desc.name);
        self.models.get(handle).ok_or_else(|| ResourceError::NotFound {
            kind: self.models.kind(),
            name: desc.name.clone(),
        })
    }
}
