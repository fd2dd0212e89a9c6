use cgmath::{Matrix4, Point3, SquareMatrix};
use thiserror::Error;

use super::{NodeFlags, NodeId, SpatialNode};
use crate::scene_log;
use crate::util::position_of;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("attaching {node} under {new_parent} would create a cycle")]
    WouldCreateCycle { node: NodeId, new_parent: NodeId },
    #[error("world transform of {0} is not invertible")]
    SingularTransform(NodeId),
    #[error("the scene root cannot be reparented")]
    RootIsImmovable,
}

/// Strict tree of spatial nodes with a single root. Nodes are never removed,
/// so a `NodeId` stays valid for the lifetime of the graph.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SpatialNode>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SpatialNode::new("scene")],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists
        false
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&SpatialNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SpatialNode> {
        self.nodes.get_mut(id.0)
    }

    fn get(&self, id: NodeId) -> Result<&SpatialNode, SceneError> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut SpatialNode, SceneError> {
        self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))
    }

    /// Insert `node` as the last child of `parent`. Any parent/children the
    /// node carried are discarded; its local transform is kept as-is.
    pub fn add(&mut self, parent: NodeId, mut node: SpatialNode) -> Result<NodeId, SceneError> {
        self.get(parent)?;

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// All nodes below `id`, depth-first pre-order, children in insertion order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// `true` when `ancestor` is `node` itself or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn local_transform(&self, id: NodeId) -> Result<Matrix4<f32>, SceneError> {
        Ok(self.get(id)?.local_transform)
    }

    pub fn set_local_transform(
        &mut self,
        id: NodeId,
        transform: Matrix4<f32>,
    ) -> Result<(), SceneError> {
        self.get_mut(id)?.local_transform = transform;
        Ok(())
    }

    pub fn world_transform(&self, id: NodeId) -> Result<Matrix4<f32>, SceneError> {
        let mut transform = self.get(id)?.local_transform;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            let node = &self.nodes[parent.0];
            transform = node.local_transform * transform;
            current = node.parent;
        }
        Ok(transform)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Point3<f32>, SceneError> {
        self.world_transform(id).map(|m| position_of(&m))
    }

    /// Set the local transform so the node ends up at `world` in world space.
    pub fn set_world_transform(
        &mut self,
        id: NodeId,
        world: Matrix4<f32>,
    ) -> Result<(), SceneError> {
        let local = match self.get(id)?.parent {
            Some(parent) => {
                let parent_world = self.world_transform(parent)?;
                parent_world.invert().ok_or(SceneError::SingularTransform(parent))? * world
            }
            None => world,
        };
        self.nodes[id.0].local_transform = local;
        Ok(())
    }

    /// Move `node` under `new_parent`, keeping its world transform unchanged.
    /// The node becomes the last child of its new parent.
    pub fn attach(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        self.get(node)?;
        self.get(new_parent)?;
        if node == self.root {
            return Err(SceneError::RootIsImmovable);
        }
        if self.is_ancestor(node, new_parent) {
            return Err(SceneError::WouldCreateCycle { node, new_parent });
        }

        let world = self.world_transform(node)?;
        let parent_inverse = self
            .world_transform(new_parent)?
            .invert()
            .ok_or(SceneError::SingularTransform(new_parent))?;

        if let Some(old_parent) = self.nodes[node.0].parent {
            self.nodes[old_parent.0].children.retain(|c| *c != node);
        }
        self.nodes[new_parent.0].children.push(node);

        let entry = &mut self.nodes[node.0];
        entry.parent = Some(new_parent);
        entry.local_transform = parent_inverse * world;

        scene_log!(TRACE, "attached {} ({}) under {}", node, entry.name, new_parent);
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        self.get_mut(id)?.flags.set(NodeFlags::VISIBLE, visible);
        Ok(())
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).map(|n| n.is_visible()).unwrap_or(false)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
