use cgmath::Point3;
use engine::scene::NodeId;
use serde::Serialize;

use crate::controller::{ControllerId, TargetRayMode};

/// Render-facing snapshot produced at the end of each tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub controllers: Vec<ControllerReport>,
    pub marker: MarkerReport,
    pub teleport_candidate: Option<[f32; 3]>,
    /// World point the tracking origin maps to under the active frame.
    pub reference_anchor: Option<[f32; 3]>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControllerReport {
    pub id: ControllerId,
    pub ray_length: f32,
    pub hovered: Option<NodeId>,
    pub selected: Option<NodeId>,
    pub squeezing: bool,
    pub target_ray_mode: TargetRayMode,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerReport {
    pub visible: bool,
    pub position: [f32; 3],
}

pub(crate) fn point_array(point: Point3<f32>) -> [f32; 3] {
    [point.x, point.y, point.z]
}
