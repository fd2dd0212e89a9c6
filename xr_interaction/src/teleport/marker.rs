use cgmath::{EuclideanSpace, Matrix4, Point3};
use engine::scene::{NodeFlags, NodeId, SceneError, SceneGraph, Shape, SpatialNode};
use engine::util::position_of;

/// Landing indicator: a flat disc shown at the current teleport candidate.
/// It is never pickable, so probes cannot land on the marker itself.
#[derive(Clone, Copy, Debug)]
pub struct Marker {
    node: NodeId,
}

impl Marker {
    pub fn spawn(
        scene: &mut SceneGraph,
        parent: NodeId,
        radius: f32,
    ) -> Result<Marker, SceneError> {
        let node = scene.add(
            parent,
            SpatialNode::new("teleport-marker")
                .with_shape(Shape::disc(radius))
                .with_flags(NodeFlags::empty()),
        )?;
        Ok(Marker { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn update(
        &self,
        scene: &mut SceneGraph,
        candidate: Option<Point3<f32>>,
    ) -> Result<(), SceneError> {
        match candidate {
            Some(point) => {
                scene.set_world_transform(self.node, Matrix4::from_translation(point.to_vec()))?;
                scene.set_visible(self.node, true)
            }
            None => scene.set_visible(self.node, false),
        }
    }

    pub fn is_visible(&self, scene: &SceneGraph) -> bool {
        scene.is_visible(self.node)
    }

    pub fn position(&self, scene: &SceneGraph) -> Result<Point3<f32>, SceneError> {
        scene.world_transform(self.node).map(|m| position_of(&m))
    }
}
