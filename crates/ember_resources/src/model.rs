//! Models and load-time cross-validation.
//!
//! A [`Model`] ties together the resources one skinned or static object needs:
//! an optional [`Skeleton`], its skeleton animations, and a list of
//! [`SubModel`]s, each pairing a mesh with a main material and a depth-pass
//! material. Loading checks that the pieces fit together and refuses the
//! whole model otherwise:
//!
//! - a material needing texture coordinates or vertex weights requires a mesh
//!   that has them,
//! - skeleton animations require a skeleton,
//! - every animation carries one track per skeleton bone,
//! - a model with a skeleton is skinned on the GPU, so all of its materials
//!   must support hardware skinning.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ember_animation::{SkeletalClip, Skeleton};
use ember_core::{Incompatibility, ResourceError, ResultExt};

use crate::manager::ResourceManager;
use crate::material::Material;
use crate::mesh::Mesh;

/// Already-parsed description of a sub-model: resource names only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubModelDesc {
    pub mesh: String,
    pub material: String,
    pub depth_material: String,
}

/// Already-parsed description of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub name: String,
    #[serde(default)]
    pub skeleton: Option<String>,
    pub sub_models: Vec<SubModelDesc>,
    #[serde(default)]
    pub skel_anims: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SubModel {
    mesh: Arc<Mesh>,
    material: Arc<Material>,
    depth_material: Arc<Material>,
}

impl SubModel {
    /// Pairs a mesh with its materials, rejecting materials that need
    /// vertex streams the mesh does not carry.
    pub fn new(
        mesh: Arc<Mesh>,
        material: Arc<Material>,
        depth_material: Arc<Material>,
    ) -> Result<Self, ResourceError> {
        check_compatible(&material, &mesh)?;
        check_compatible(&depth_material, &mesh)?;

        Ok(Self {
            mesh,
            material,
            depth_material,
        })
    }

    pub fn load(desc: &SubModelDesc, resources: &ResourceManager) -> Result<Self, ResourceError> {
        Self::new(
            resources.meshes.require(&desc.mesh)?,
            resources.materials.require(&desc.material)?,
            resources.materials.require(&desc.depth_material)?,
        )
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    #[inline]
    #[must_use]
    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    #[inline]
    #[must_use]
    pub fn depth_material(&self) -> &Arc<Material> {
        &self.depth_material
    }

    /// Both materials can skin on the GPU.
    #[must_use]
    pub fn has_hw_skinning(&self) -> bool {
        self.material.has_hw_skinning() && self.depth_material.has_hw_skinning()
    }
}

fn check_compatible(material: &Material, mesh: &Mesh) -> Result<(), ResourceError> {
    let reason = if material.has_tex_coords() && !mesh.has_tex_coords() {
        Incompatibility::MissingTexCoords
    } else if material.has_hw_skinning() && !mesh.has_vert_weights() {
        Incompatibility::MissingVertexWeights
    } else {
        return Ok(());
    };

    Err(ResourceError::IncompatibleResources {
        first: material.name.clone(),
        second: mesh.name.clone(),
        reason,
    })
}

#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    skeleton: Option<Arc<Skeleton>>,
    sub_models: Vec<SubModel>,
    skel_anims: Vec<Arc<SkeletalClip>>,
}

impl Model {
    /// Assembles and validates a model from already-loaded parts.
    pub fn new(
        name: impl Into<String>,
        skeleton: Option<Arc<Skeleton>>,
        sub_models: Vec<SubModel>,
        skel_anims: Vec<Arc<SkeletalClip>>,
    ) -> Result<Self, ResourceError> {
        let name = name.into();
        validate(skeleton.as_deref(), &sub_models, &skel_anims)
            .with_context(|| format!("Model \"{name}\""))?;

        Ok(Self {
            name,
            skeleton,
            sub_models,
            skel_anims,
        })
    }

    /// Resolves every name in `desc` against `resources` and validates the result.
    ///
    /// Any failure, including a missing resource, is reported as
    /// `Model "<name>": ...`.
    pub fn load(desc: &ModelDesc, resources: &ResourceManager) -> Result<Self, ResourceError> {
        let context = || format!("Model \"{}\"", desc.name);

        // Skeleton first: sub-model checks depend on it
        let skeleton = desc
            .skeleton
            .as_deref()
            .map(|name| resources.skeletons.require(name))
            .transpose()
            .with_context(context)?;

        let sub_models = desc
            .sub_models
            .iter()
            .enumerate()
            .map(|(i, sub)| {
                SubModel::load(sub, resources).with_context(|| format!("sub-model {i}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .with_context(context)?;

        let skel_anims = desc
            .skel_anims
            .iter()
            .map(|name| resources.skel_anims.require(name))
            .collect::<Result<Vec<_>, _>>()
            .with_context(context)?;

        let model = Self::new(desc.name.clone(), skeleton, sub_models, skel_anims)?;
        log::debug!(
            "Model \"{}\" assembled: {} sub-models, {} animations, skeleton: {}",
            model.name,
            model.sub_models.len(),
            model.skel_anims.len(),
            model.skeleton.as_ref().map_or("none", |s| s.name()),
        );
        Ok(model)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn has_skeleton(&self) -> bool {
        self.skeleton.is_some()
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn sub_models(&self) -> &[SubModel] {
        &self.sub_models
    }

    #[inline]
    #[must_use]
    pub fn skel_anims(&self) -> &[Arc<SkeletalClip>] {
        &self.skel_anims
    }

    #[must_use]
    pub fn skel_anim_by_name(&self, name: &str) -> Option<&Arc<SkeletalClip>> {
        self.skel_anims.iter().find(|a| a.name() == name)
    }
}

fn validate(
    skeleton: Option<&Skeleton>,
    sub_models: &[SubModel],
    skel_anims: &[Arc<SkeletalClip>],
) -> Result<(), ResourceError> {
    let Some(skeleton) = skeleton else {
        if skel_anims.is_empty() {
            return Ok(());
        }
        return Err(ResourceError::MissingSkeleton);
    };

    for anim in skel_anims {
        anim.validate_for(skeleton)?;
    }

    for (i, sub) in sub_models.iter().enumerate() {
        for material in [&sub.material, &sub.depth_material] {
            if !material.has_hw_skinning() {
                return Err(ResourceError::MissingHwSkinning {
                    sub_model: i,
                    material: material.name.clone(),
                });
            }
        }
    }

    Ok(())
}
