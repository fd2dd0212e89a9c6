use std::fmt;
use std::str::FromStr;

use cgmath::Matrix4;
use engine::scene::{NodeId, SceneError, SceneGraph};
use serde::{Deserialize, Serialize};

use crate::raycast::Ray;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(pub usize);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller {}", self.0)
    }
}

/// How the input source produces its pointing ray.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetRayMode {
    #[default]
    TrackedPointer,
    /// Touch / flat-screen sessions.
    Screen,
    Gaze,
}

impl TargetRayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetRayMode::TrackedPointer => "tracked-pointer",
            TargetRayMode::Screen => "screen",
            TargetRayMode::Gaze => "gaze",
        }
    }
}

impl fmt::Display for TargetRayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetRayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tracked-pointer" => Ok(TargetRayMode::TrackedPointer),
            "screen" => Ok(TargetRayMode::Screen),
            "gaze" => Ok(TargetRayMode::Gaze),
            other => Err(format!("unknown target ray mode '{}'", other)),
        }
    }
}

/// Per input device state. The grab slot and the squeeze flag are
/// independent: a controller may squeeze while holding an object.
#[derive(Clone, Debug)]
pub struct ControllerState {
    id: ControllerId,
    node: NodeId,
    ray_node: NodeId,
    selected: Option<NodeId>,
    squeezing: bool,
    target_ray_mode: TargetRayMode,
    ray_length: f32,
    hovered: Option<NodeId>,
}

impl ControllerState {
    pub fn new(id: ControllerId, node: NodeId, ray_node: NodeId, ray_length: f32) -> Self {
        ControllerState {
            id,
            node,
            ray_node,
            selected: None,
            squeezing: false,
            target_ray_mode: TargetRayMode::default(),
            ray_length,
            hovered: None,
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Scene node that follows the tracked pose; grabbed objects hang off it.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Child of `node` drawn as the pointing line, scaled along -Z.
    pub fn ray_node(&self) -> NodeId {
        self.ray_node
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn is_squeezing(&self) -> bool {
        self.squeezing
    }

    pub fn target_ray_mode(&self) -> TargetRayMode {
        self.target_ray_mode
    }

    pub fn ray_length(&self) -> f32 {
        self.ray_length
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn world_transform(&self, scene: &SceneGraph) -> Result<Matrix4<f32>, SceneError> {
        scene.world_transform(self.node)
    }

    pub fn world_ray(&self, scene: &SceneGraph) -> Result<Ray, SceneError> {
        self.world_transform(scene)
            .map(|transform| Ray::from_world_transform(&transform))
    }

    pub(crate) fn set_selected(&mut self, node: Option<NodeId>) {
        self.selected = node;
    }

    pub(crate) fn take_selected(&mut self) -> Option<NodeId> {
        self.selected.take()
    }

    pub(crate) fn set_squeezing(&mut self, squeezing: bool) {
        self.squeezing = squeezing;
    }

    pub(crate) fn set_target_ray_mode(&mut self, mode: TargetRayMode) {
        self.target_ray_mode = mode;
    }

    pub(crate) fn set_hovered(&mut self, node: Option<NodeId>) {
        self.hovered = node;
    }

    pub(crate) fn set_ray_length(
        &mut self,
        scene: &mut SceneGraph,
        length: f32,
    ) -> Result<(), SceneError> {
        self.ray_length = length;
        scene.set_local_transform(self.ray_node, Matrix4::from_nonuniform_scale(1.0, 1.0, length))
    }
}
