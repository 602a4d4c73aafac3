use glam::{Affine3A, Quat, Vec3};

use ember_core::RigidTransform;

/// Placement of a node relative to its parent.
///
/// Nodes carry rigid placements only, like bones. `position` and `rotation`
/// are written freely by game code and controllers; the hierarchy pass
/// compares them against the placement it last saw and rebuilds the local
/// matrix only on change.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    seen: Option<RigidTransform>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            seen: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn placement(&self) -> RigidTransform {
        RigidTransform::new(self.rotation, self.position)
    }

    /// Rebuilds the local matrix if the placement changed. Returns whether it did.
    pub(crate) fn refresh_local_matrix(&mut self) -> bool {
        let current = self.placement();
        if self.seen == Some(current) {
            return false;
        }
        self.local_matrix = Affine3A::from_rotation_translation(self.rotation, self.position);
        self.seen = Some(current);
        true
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    /// Forces the next hierarchy pass to rebuild this node (after re-parenting).
    pub fn mark_dirty(&mut self) {
        self.seen = None;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
