//! Controller interaction for immersive sessions: pointing, grabbing and
//! squeeze-to-teleport on top of the engine scene graph.

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod events;
pub mod raycast;
pub mod report;
pub mod selection;
pub mod teleport;

pub use config::{ContractPolicy, InteractionConfig};
pub use controller::{ControllerId, ControllerState, TargetRayMode};
pub use driver::{InteractionDriver, INTERACTIVE_GROUP_NAME};
pub use error::InteractionError;
pub use events::{EventOutcome, GestureEvent};
pub use raycast::{intersect, Hit, Ray, Raycaster};
pub use report::{ControllerReport, FrameReport, MarkerReport};
pub use selection::SelectionManager;
pub use teleport::{Marker, ReferenceFrame, ReferenceFrameSlot, RigidTransform, TeleportSystem};
