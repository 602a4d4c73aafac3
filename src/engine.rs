//! Engine Core Module
//!
//! This module contains [`Engine`], the frame-synchronous driver of the
//! simulation. It owns no window or GPU state, so it can be driven by any
//! frontend or headless.
//!
//! # Frame order
//!
//! 1. [`Engine::tick`] runs every controller, then propagates world transforms.
//! 2. Consumers read [`Engine::skinning_palettes`] and
//!    [`Scene::debug_bone_segments`].
//!
//! A consumer must never read the bone buffers while a tick is in flight;
//! `tick` takes `&mut self`, which makes that ordering a borrow error.

use std::sync::Arc;

use glam::Mat4;

use ember_core::{EngineSettings, ResourceError};
use ember_resources::{ModelDesc, ResourceManager};
use ember_scene::{ControllerHandle, NodeHandle, Scene, SkelAnimController};

/// The engine instance: settings, resources and the active scene.
///
/// # Lifecycle
///
/// 1. Create with [`Engine::new`] or [`Engine::default`]
/// 2. Register resources and spawn models
/// 3. Call [`Engine::tick`] once per frame
pub struct Engine {
    pub settings: EngineSettings,
    pub resources: ResourceManager,
    pub scene: Scene,

    frame: u64,
}

impl Engine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        log::debug!("Creating engine with {settings:?}");
        Self {
            settings,
            resources: ResourceManager::new(),
            scene: Scene::new(),
            frame: 0,
        }
    }

    /// Number of completed ticks.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Puts an instance of `desc` on a new root node.
    ///
    /// The model is loaded on first use; later spawns of the same model name
    /// share the registered model and get their own bone buffers.
    pub fn spawn_model(
        &mut self,
        node_name: &str,
        desc: &ModelDesc,
    ) -> Result<NodeHandle, ResourceError> {
        let model = match self.resources.models.get_by_name(&desc.name) {
            Some(model) => model,
            None => self.resources.load_model(desc)?,
        };
        let node = self.scene.create_node(node_name);
        if model.has_skeleton() {
            self.scene.add_skinned_model(node, Arc::clone(&model))?;
        }
        Ok(node)
    }

    /// Starts looping `clip` on the skinned model of `node`.
    ///
    /// The clip is looked up among the node's model animations. Fails if the
    /// node is not skinned, the clip is unknown, or the node already has a
    /// skeletal animation controller.
    ///
    /// # Panics
    ///
    /// If `settings.animation.default_step` was set to a negative or
    /// non-finite value. Settings from [`EngineSettings::from_json`] are
    /// always valid.
    pub fn play_skel_anim(
        &mut self,
        node: NodeHandle,
        clip: &str,
    ) -> Result<ControllerHandle, ResourceError> {
        let skinned = self
            .scene
            .skinned_model(node)
            .ok_or_else(|| ResourceError::NotFound {
                kind: "SkinnedModel",
                name: format!("{node:?}"),
            })?;
        let model = skinned.model();
        let anim = model
            .skel_anim_by_name(clip)
            .cloned()
            .ok_or_else(|| {
                ResourceError::NotFound {
                    kind: "SkelAnim",
                    name: clip.to_string(),
                }
                .context(format!("Model \"{}\"", model.name()))
            })?;

        let mut controller = SkelAnimController::new(node, self.settings.animation.default_step);
        controller.bind(anim);

        self.scene
            .add_controller(controller)
            .ok_or_else(|| ResourceError::Duplicate {
                kind: "SkelAnimController",
                name: format!("{node:?}"),
            })
    }

    /// Advances the simulation by one frame.
    ///
    /// When this returns every skinned node's bone buffers hold the pose
    /// for the new frame.
    pub fn tick(&mut self, dt: f32) {
        self.scene.update_controllers(
            dt,
            &self.settings.debug,
            self.settings.animation.parallel,
        );
        self.scene.update_world_transforms();
        self.frame += 1;
        log::trace!("Engine frame {} done", self.frame);
    }

    /// Joint matrices of every skinned node, ready for upload.
    pub fn skinning_palettes(&self) -> impl Iterator<Item = (NodeHandle, Vec<Mat4>)> + '_ {
        self.scene.skinned_models().map(|(node, skinned)| {
            let mut palette = Vec::with_capacity(skinned.skeleton().len());
            skinned.joint_matrices(&mut palette);
            (node, palette)
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
