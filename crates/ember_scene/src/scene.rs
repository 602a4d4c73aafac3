use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;
use slotmap::{SlotMap, SparseSecondaryMap};

use ember_core::{DebugSettings, ResourceError};
use ember_resources::Model;

use crate::controller::{Controller, ControllerKind, SkelAnimController, TickContext, Updatable};
use crate::node::Node;
use crate::skinned::SkinnedModel;
use crate::transform_system;
use crate::{ControllerHandle, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph plus the components and controllers attached to its nodes.
pub struct Scene {
    pub id: u32,

    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Components ====
    pub(crate) skinned: SparseSecondaryMap<NodeHandle, SkinnedModel>,

    controllers: SlotMap<ControllerHandle, Controller>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            skinned: SparseSecondaryMap::new(),
            controllers: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Creates a root node.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        let handle = self.nodes.insert(Node::new(name));
        self.root_nodes.push(handle);
        handle
    }

    /// Makes `child` a child of `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        // 1. Detach from old
        let old_parent = self.nodes[child].parent;
        if let Some(p) = old_parent {
            self.nodes[p].children.retain(|&x| x != child);
        } else {
            self.root_nodes.retain(|&x| x != child);
        }

        // 2. Attach to new
        self.nodes[parent].children.push(child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    pub fn update_world_transforms(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    // ========================================================================
    // Skinned models
    // ========================================================================

    /// Attaches a skinned instance of `model` to `node`.
    ///
    /// The model must have a skeleton.
    pub fn add_skinned_model(
        &mut self,
        node: NodeHandle,
        model: Arc<Model>,
    ) -> Result<(), ResourceError> {
        let name = model.name().to_string();
        let skinned = SkinnedModel::new(model).ok_or_else(|| {
            ResourceError::NotFound {
                kind: "Skeleton",
                name: name.clone(),
            }
            .context(format!("Model \"{name}\""))
        })?;

        if !self.nodes.contains_key(node) {
            return Err(ResourceError::NotFound {
                kind: "Node",
                name: format!("{node:?}"),
            });
        }

        self.skinned.insert(node, skinned);
        Ok(())
    }

    #[must_use]
    pub fn skinned_model(&self, node: NodeHandle) -> Option<&SkinnedModel> {
        self.skinned.get(node)
    }

    pub fn skinned_models(&self) -> impl Iterator<Item = (NodeHandle, &SkinnedModel)> {
        self.skinned.iter()
    }

    /// World-space bone segments of every skinned node whose last tick drew its skeleton.
    pub fn debug_bone_segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.skinned.iter().flat_map(move |(handle, skinned)| {
            let world = self
                .nodes
                .get(handle)
                .map(|n| *n.world_matrix())
                .unwrap_or_default();
            skinned.bone_lines().into_iter().flat_map(move |lines| {
                lines
                    .segments()
                    .map(move |(h, t)| (world.transform_point3(h), world.transform_point3(t)))
            })
        })
    }

    // ========================================================================
    // Controllers
    // ========================================================================

    /// Registers a controller.
    ///
    /// Only one skeletal animation controller may drive a given node; a second
    /// one is refused and `None` returned. A skeletal controller's clip must
    /// have one track per bone of its target's skeleton, otherwise the next
    /// update panics.
    pub fn add_controller(&mut self, controller: impl Into<Controller>) -> Option<ControllerHandle> {
        let controller = controller.into();

        if controller.kind() == ControllerKind::SkelAnim
            && self.controllers.values().any(|c| {
                c.kind() == ControllerKind::SkelAnim && c.target() == controller.target()
            })
        {
            log::warn!(
                "Node {:?} already has a SkelAnim controller, ignoring the new one",
                controller.target()
            );
            return None;
        }

        Some(self.controllers.insert(controller))
    }

    pub fn remove_controller(&mut self, handle: ControllerHandle) -> Option<Controller> {
        self.controllers.remove(handle)
    }

    #[must_use]
    pub fn controller(&self, handle: ControllerHandle) -> Option<&Controller> {
        self.controllers.get(handle)
    }

    pub fn controller_mut(&mut self, handle: ControllerHandle) -> Option<&mut Controller> {
        self.controllers.get_mut(handle)
    }

    pub fn skel_anim_controller_mut(
        &mut self,
        handle: ControllerHandle,
    ) -> Option<&mut SkelAnimController> {
        match self.controllers.get_mut(handle)? {
            Controller::SkelAnim(c) => Some(c),
            Controller::Spin(_) => None,
        }
    }

    /// Runs every controller once.
    ///
    /// All bone buffers are fully written when this returns, so the skinning
    /// consumer may read them afterwards. With `parallel` (and the `parallel`
    /// cargo feature) skeletal controllers run on the rayon pool, one job
    /// per skinned node.
    pub fn update_controllers(&mut self, dt: f32, debug: &DebugSettings, parallel: bool) {
        let draw_skeletons = debug.draws_skeletons();

        #[cfg(feature = "parallel")]
        {
            if parallel {
                self.update_skeletal_parallel(draw_skeletons);
                let mut ctx = TickContext {
                    nodes: &mut self.nodes,
                    skinned: &mut self.skinned,
                    dt,
                    draw_skeletons,
                };
                for controller in self.controllers.values_mut() {
                    if controller.kind() != ControllerKind::SkelAnim {
                        controller.update(&mut ctx);
                    }
                }
                return;
            }
        }

        #[cfg(not(feature = "parallel"))]
        {
            if parallel {
                log::debug!("Parallel controller update requested without the `parallel` feature");
            }
        }

        let mut ctx = TickContext {
            nodes: &mut self.nodes,
            skinned: &mut self.skinned,
            dt,
            draw_skeletons,
        };
        for controller in self.controllers.values_mut() {
            controller.update(&mut ctx);
        }
    }

    #[cfg(feature = "parallel")]
    fn update_skeletal_parallel(&mut self, draw_skeletons: bool) {
        use rayon::prelude::*;
        use rustc_hash::FxHashMap;

        let mut by_target: FxHashMap<NodeHandle, &mut SkelAnimController> = self
            .controllers
            .values_mut()
            .filter_map(|c| match c {
                Controller::SkelAnim(anim) => Some((anim.target(), anim)),
                Controller::Spin(_) => None,
            })
            .collect();

        // Each job owns one node's controller and buffers exclusively
        let mut jobs: Vec<(&mut SkelAnimController, &mut SkinnedModel)> = self
            .skinned
            .iter_mut()
            .filter_map(|(handle, skinned)| by_target.remove(&handle).map(|c| (c, skinned)))
            .collect();

        for target in by_target.keys() {
            log::warn!("SkelAnimController target {target:?} has no skinned model, skipping");
        }

        jobs.par_iter_mut()
            .for_each(|(controller, skinned)| controller.tick(skinned, draw_skeletons));
    }
}
