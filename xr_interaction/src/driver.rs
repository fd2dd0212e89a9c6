use cgmath::Matrix4;
use engine::scene::{NodeFlags, NodeId, SceneError, SceneGraph, SpatialNode};
use engine::util::matrix_is_finite;
use engine::{input_log, teleport_log};

use crate::config::{ContractPolicy, InteractionConfig};
use crate::controller::{ControllerId, ControllerState, TargetRayMode};
use crate::error::InteractionError;
use crate::events::{EventOutcome, GestureEvent};
use crate::report::{point_array, ControllerReport, FrameReport, MarkerReport};
use crate::selection::SelectionManager;
use crate::teleport::{Marker, ReferenceFrame, ReferenceFrameSlot, RigidTransform, TeleportSystem};

pub const INTERACTIVE_GROUP_NAME: &str = "interaction-group";

/// Session-scoped interaction context.
///
/// Owns every piece of mutable interaction state (controllers, hover set,
/// teleport candidate, marker, reference frames) and mutates the scene graph
/// handed in by the host. The host calls `handle_event` for each gesture and
/// `tick` once per rendered frame; the two are never interleaved.
///
/// `tick` runs a fixed pipeline:
/// clear hover → hover per controller → teleport probe → marker update.
/// Rendering happens afterwards, outside this type.
pub struct InteractionDriver {
    config: InteractionConfig,
    interactive_group: NodeId,
    controllers: Vec<ControllerState>,
    selection: SelectionManager,
    teleport: TeleportSystem,
    marker: Marker,
    frames: ReferenceFrameSlot,
    session_active: bool,
    frame_index: u64,
}

impl InteractionDriver {
    /// Create the interactive group, one node (with a ray child) per
    /// controller, and the hidden teleport marker under the scene root.
    pub fn new(
        scene: &mut SceneGraph,
        config: InteractionConfig,
    ) -> Result<Self, InteractionError> {
        config.validate()?;
        let root = scene.root();

        let interactive_group = scene.add(root, SpatialNode::new(INTERACTIVE_GROUP_NAME))?;

        let controllers = (0..config.controller_count)
            .map(|i| -> Result<ControllerState, SceneError> {
                let node = scene.add(root, SpatialNode::new(format!("controller-{}", i)))?;
                let ray_node = scene.add(
                    node,
                    SpatialNode::new("ray")
                        .with_transform(Matrix4::from_nonuniform_scale(
                            1.0,
                            1.0,
                            config.default_ray_length,
                        ))
                        .with_flags(NodeFlags::VISIBLE),
                )?;
                Ok(ControllerState::new(
                    ControllerId(i),
                    node,
                    ray_node,
                    config.default_ray_length,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let marker = Marker::spawn(scene, root, config.marker_radius)?;
        let selection = SelectionManager::new(interactive_group, &config);

        Ok(InteractionDriver {
            config,
            interactive_group,
            controllers,
            selection,
            teleport: TeleportSystem::new(),
            marker,
            frames: ReferenceFrameSlot::new(),
            session_active: false,
            frame_index: 0,
        })
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Parent for grabbable content; released objects return here.
    pub fn interactive_group(&self) -> NodeId {
        self.interactive_group
    }

    pub fn controllers(&self) -> &[ControllerState] {
        &self.controllers
    }

    pub fn controller(&self, id: ControllerId) -> Result<&ControllerState, InteractionError> {
        self.controllers
            .get(id.0)
            .ok_or(InteractionError::UnknownController(id))
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn hovered(&self) -> &[NodeId] {
        self.selection.hovered()
    }

    pub fn teleport_candidate(&self) -> Option<cgmath::Point3<f32>> {
        self.teleport.candidate()
    }

    pub fn reference_frames(&self) -> &ReferenceFrameSlot {
        &self.frames
    }

    pub fn active_reference_frame(&self) -> Option<&ReferenceFrame> {
        self.frames.active()
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn index_of(&self, id: ControllerId) -> Result<usize, InteractionError> {
        self.controller(id).map(|_| id.0)
    }

    /// Strict surfaces contract violations; lenient logs them and carries on.
    fn enforce<T: Default>(
        &self,
        result: Result<T, InteractionError>,
    ) -> Result<T, InteractionError> {
        match (result, self.config.contract_policy) {
            (Ok(value), _) => Ok(value),
            (Err(err), ContractPolicy::Strict) => Err(err),
            (Err(err), ContractPolicy::Lenient) => {
                input_log!(ERROR, "ignoring contract violation: {}", err);
                Ok(T::default())
            }
        }
    }

    /// Place a controller directly in world space. Poses with NaN or
    /// infinite components are dropped and the controller keeps its last
    /// pose.
    pub fn set_controller_transform(
        &mut self,
        scene: &mut SceneGraph,
        id: ControllerId,
        world: Matrix4<f32>,
    ) -> Result<(), InteractionError> {
        if !matrix_is_finite(&world) {
            input_log!(WARN, "dropping non-finite pose for {}", id);
            return Ok(());
        }

        let result = self.index_of(id).and_then(|index| {
            scene
                .set_world_transform(self.controllers[index].node(), world)
                .map_err(InteractionError::from)
        });
        self.enforce(result)
    }

    /// Place a controller from a pose reported in physical tracking space,
    /// resolved through the active reference frame. With no session the pose
    /// is taken as world space.
    pub fn set_tracked_pose(
        &mut self,
        scene: &mut SceneGraph,
        id: ControllerId,
        pose: &RigidTransform,
    ) -> Result<(), InteractionError> {
        let world = match self.frames.active() {
            Some(frame) => frame.resolve(pose),
            None => pose.to_matrix(),
        };
        self.set_controller_transform(scene, id, world)
    }

    pub fn handle_event(
        &mut self,
        scene: &mut SceneGraph,
        event: GestureEvent,
    ) -> Result<EventOutcome, InteractionError> {
        input_log!(DEBUG, "{} on {}", event.name(), event.controller());
        let result = self.dispatch(scene, event);
        self.enforce(result)
    }

    fn dispatch(
        &mut self,
        scene: &mut SceneGraph,
        event: GestureEvent,
    ) -> Result<EventOutcome, InteractionError> {
        let index = self.index_of(event.controller())?;

        let outcome = match event {
            GestureEvent::SelectStart { mode, .. } => self
                .selection
                .select_start(scene, &mut self.controllers, index, mode)?
                .map(EventOutcome::Grabbed),
            GestureEvent::SelectEnd { .. } => self
                .selection
                .select_end(scene, &mut self.controllers[index])?
                .map(EventOutcome::Released),
            GestureEvent::SqueezeStart { .. } => {
                self.teleport.squeeze_start(&mut self.controllers[index]);
                Some(EventOutcome::SqueezeStarted)
            }
            GestureEvent::SqueezeEnd { .. } => Some(
                self.teleport
                    .squeeze_end(&mut self.controllers[index], &mut self.frames)
                    .map_or(EventOutcome::SqueezeEnded, EventOutcome::Teleported),
            ),
        };

        Ok(outcome.unwrap_or_default())
    }

    pub fn select_start(
        &mut self,
        scene: &mut SceneGraph,
        controller: ControllerId,
        mode: TargetRayMode,
    ) -> Result<EventOutcome, InteractionError> {
        self.handle_event(scene, GestureEvent::SelectStart { controller, mode })
    }

    pub fn select_end(
        &mut self,
        scene: &mut SceneGraph,
        controller: ControllerId,
    ) -> Result<EventOutcome, InteractionError> {
        self.handle_event(scene, GestureEvent::SelectEnd { controller })
    }

    pub fn squeeze_start(
        &mut self,
        scene: &mut SceneGraph,
        controller: ControllerId,
    ) -> Result<EventOutcome, InteractionError> {
        self.handle_event(scene, GestureEvent::SqueezeStart { controller })
    }

    pub fn squeeze_end(
        &mut self,
        scene: &mut SceneGraph,
        controller: ControllerId,
    ) -> Result<EventOutcome, InteractionError> {
        self.handle_event(scene, GestureEvent::SqueezeEnd { controller })
    }

    /// Per-frame interaction pass. Controller poses must already be current.
    pub fn tick(&mut self, scene: &mut SceneGraph) -> Result<FrameReport, InteractionError> {
        self.frame_index += 1;

        self.selection.clean_hovered(&mut self.controllers);

        for controller in self.controllers.iter_mut() {
            self.selection.update_hover(scene, controller)?;
        }

        self.teleport.probe(scene, &self.controllers)?;

        self.marker.update(scene, self.teleport.candidate())?;

        self.report(scene)
    }

    pub fn report(&self, scene: &SceneGraph) -> Result<FrameReport, InteractionError> {
        let controllers = self
            .controllers
            .iter()
            .map(|c| ControllerReport {
                id: c.id(),
                ray_length: c.ray_length(),
                hovered: c.hovered(),
                selected: c.selected(),
                squeezing: c.is_squeezing(),
                target_ray_mode: c.target_ray_mode(),
            })
            .collect();

        Ok(FrameReport {
            frame: self.frame_index,
            controllers,
            marker: MarkerReport {
                visible: self.marker.is_visible(scene),
                position: point_array(self.marker.position(scene)?),
            },
            teleport_candidate: self.teleport.candidate().map(point_array),
            reference_anchor: self.frames.active().map(|f| point_array(f.anchor_point())),
        })
    }

    /// Capture the base frame for a new session. Gesture state left over
    /// from a previous session is reset first; the session starts even when
    /// that reset reports a contract violation.
    pub fn session_start(
        &mut self,
        scene: &mut SceneGraph,
        base: ReferenceFrame,
    ) -> Result<(), InteractionError> {
        let reset = self.reset_gestures(scene);
        self.frames.capture_base(base);
        self.session_active = true;
        teleport_log!(INFO, "session started, base anchored at {:?}", base.anchor_point());
        reset
    }

    /// Release held objects, drop all gesture state and both frames. The
    /// teardown always completes; the first contract violation met on the
    /// way is returned afterwards.
    pub fn session_end(&mut self, scene: &mut SceneGraph) -> Result<(), InteractionError> {
        let reset = self.reset_gestures(scene);
        self.frames.clear();
        self.session_active = false;
        teleport_log!(INFO, "session ended");
        reset
    }

    fn reset_gestures(&mut self, scene: &mut SceneGraph) -> Result<(), InteractionError> {
        let mut first_error = None;

        for index in 0..self.controllers.len() {
            let released = self.selection.select_end(scene, &mut self.controllers[index]);
            if let Err(err) = self.enforce(released) {
                first_error.get_or_insert(err);
            }
            let controller = &mut self.controllers[index];
            controller.set_squeezing(false);
            controller.set_target_ray_mode(TargetRayMode::default());
        }

        self.selection.clean_hovered(&mut self.controllers);
        self.teleport.reset();
        if let Err(err) = self.marker.update(scene, None) {
            first_error.get_or_insert(err.into());
        }

        first_error.map_or(Ok(()), Err)
    }
}
