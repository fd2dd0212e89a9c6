use cgmath::{Matrix4, SquareMatrix};
use serde::{Deserialize, Serialize};

use super::Shape;

/// Index of a node inside its `SceneGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags::bitflags! {
    pub struct NodeFlags: u8 {
        const VISIBLE = 0b0000_0001;
        /// Ray casts test this node's shape.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::VISIBLE | NodeFlags::PICKABLE
    }
}

#[derive(Clone, Debug)]
pub struct SpatialNode {
    pub name: String,
    pub local_transform: Matrix4<f32>,
    pub shape: Option<Shape>,
    pub flags: NodeFlags,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SpatialNode {
    pub fn new(name: impl Into<String>) -> SpatialNode {
        SpatialNode {
            name: name.into(),
            local_transform: Matrix4::identity(),
            shape: None,
            flags: NodeFlags::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> SpatialNode {
        self.local_transform = transform;
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> SpatialNode {
        self.shape = Some(shape);
        self
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> SpatialNode {
        self.flags = flags;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub fn is_pickable(&self) -> bool {
        self.flags.contains(NodeFlags::PICKABLE)
    }
}
