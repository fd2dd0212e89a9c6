use engine::scene::NodeId;
use serde::{Deserialize, Serialize};

use crate::controller::{ControllerId, TargetRayMode};
use crate::teleport::ReferenceFrame;

/// Discrete input delivered by the input runtime between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureEvent {
    SelectStart {
        controller: ControllerId,
        #[serde(default)]
        mode: TargetRayMode,
    },
    SelectEnd {
        controller: ControllerId,
    },
    SqueezeStart {
        controller: ControllerId,
    },
    SqueezeEnd {
        controller: ControllerId,
    },
}

impl GestureEvent {
    pub fn controller(&self) -> ControllerId {
        match *self {
            GestureEvent::SelectStart { controller, .. }
            | GestureEvent::SelectEnd { controller }
            | GestureEvent::SqueezeStart { controller }
            | GestureEvent::SqueezeEnd { controller } => controller,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureEvent::SelectStart { .. } => "select-start",
            GestureEvent::SelectEnd { .. } => "select-end",
            GestureEvent::SqueezeStart { .. } => "squeeze-start",
            GestureEvent::SqueezeEnd { .. } => "squeeze-end",
        }
    }
}

/// What a gesture changed, if anything.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EventOutcome {
    #[default]
    Ignored,
    Grabbed(NodeId),
    Released(NodeId),
    SqueezeStarted,
    SqueezeEnded,
    Teleported(ReferenceFrame),
}
