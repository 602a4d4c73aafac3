//! World matrix propagation through the node hierarchy.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::NodeHandle;
use crate::node::Node;

/// Recomputes world matrices below `roots`.
///
/// Iterative depth-first walk with an explicit stack; a node's world matrix
/// is rebuilt only when its own local matrix or an ancestor's changed.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.refresh_local_matrix();
        let changed = local_changed || parent_changed;

        if changed {
            node.transform.world_matrix = parent_world * node.transform.local_matrix;
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }
}
