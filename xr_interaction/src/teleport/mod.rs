// Squeeze-to-teleport locomotion
//
// The user is relocated by swapping the reference frame the tracking runtime
// reports poses against, never by moving scene geometry or a camera node.

pub mod marker;
pub mod reference_frame;
pub mod teleport_system;

pub use marker::Marker;
pub use reference_frame::{FrameKind, ReferenceFrame, ReferenceFrameSlot, RigidTransform};
pub use teleport_system::TeleportSystem;
