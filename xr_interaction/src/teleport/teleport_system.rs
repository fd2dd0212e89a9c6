use cgmath::{EuclideanSpace, Point3};
use engine::scene::{SceneError, SceneGraph};
use engine::teleport_log;

use super::{ReferenceFrame, ReferenceFrameSlot, RigidTransform};
use crate::controller::{ControllerId, ControllerState};
use crate::raycast::Raycaster;

/// Squeeze-to-teleport: while a controller squeezes, its ray probes the
/// whole scene for a landing point; releasing the squeeze reanchors the
/// tracking frame on that point.
///
/// The candidate is rebuilt from scratch by every `probe` call and never
/// carried across frames.
#[derive(Clone, Debug, Default)]
pub struct TeleportSystem {
    raycaster: Raycaster,
    candidate: Option<Point3<f32>>,
    probing: Option<ControllerId>,
}

impl TeleportSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate(&self) -> Option<Point3<f32>> {
        self.candidate
    }

    /// Controller whose ray produced this frame's probe, if any.
    pub fn probing_controller(&self) -> Option<ControllerId> {
        self.probing
    }

    pub fn squeeze_start(&mut self, controller: &mut ControllerState) {
        controller.set_squeezing(true);
        teleport_log!(DEBUG, "{} squeeze started", controller.id());
    }

    /// One probe per frame. `controllers` must be in priority order: the
    /// first squeezing controller wins and any others are ignored.
    pub fn probe(
        &mut self,
        scene: &SceneGraph,
        controllers: &[ControllerState],
    ) -> Result<Option<Point3<f32>>, SceneError> {
        self.candidate = None;
        self.probing = None;

        let Some(controller) = controllers.iter().find(|c| c.is_squeezing()) else {
            return Ok(None);
        };
        self.probing = Some(controller.id());

        let ray = controller.world_ray(scene)?;
        let hits = self
            .raycaster
            .intersect(scene, &ray, scene.children(scene.root()), true);

        self.candidate = hits.first().map(|hit| hit.point);
        if let Some(hit) = hits.first() {
            teleport_log!(TRACE, "{} probe hit {} at {:?}", controller.id(), hit.node, hit.point);
        }
        Ok(self.candidate)
    }

    /// Clear the squeeze flag and, when a candidate exists and a base frame
    /// was captured, install an offset frame anchored on the candidate.
    /// Returns the installed frame.
    pub fn squeeze_end(
        &mut self,
        controller: &mut ControllerState,
        frames: &mut ReferenceFrameSlot,
    ) -> Option<ReferenceFrame> {
        controller.set_squeezing(false);

        let Some(point) = self.candidate else {
            teleport_log!(DEBUG, "{} squeeze ended without a target", controller.id());
            return None;
        };
        let Some(base) = frames.base() else {
            teleport_log!(
                WARN,
                "{} squeeze ended outside a session, not teleporting",
                controller.id()
            );
            return None;
        };

        let frame = base.offset(RigidTransform::from_translation(-point.to_vec()));
        frames.install_offset(frame);

        teleport_log!(INFO, "{} teleported to {:?}", controller.id(), point);
        Some(frame)
    }

    pub fn reset(&mut self) {
        self.candidate = None;
        self.probing = None;
    }
}
