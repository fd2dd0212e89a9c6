mod node;
mod scene_graph;
mod shape;

pub use node::{NodeFlags, NodeId, SpatialNode};
pub use scene_graph::{SceneError, SceneGraph};
pub use shape::{Shape, RAY_EPSILON};
