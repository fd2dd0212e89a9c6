use engine::scene::{NodeId, SceneError, SceneGraph};
use engine::selection_log;

use crate::config::InteractionConfig;
use crate::controller::{ControllerState, TargetRayMode};
use crate::error::InteractionError;
use crate::raycast::{Hit, Raycaster};

/// Hover feedback and grab/release against the interactive group.
///
/// Hover is transient: `clean_hovered` wipes the previous frame's set and
/// `update_hover` rebuilds it, once per controller per frame.
#[derive(Clone, Debug)]
pub struct SelectionManager {
    interactive_group: NodeId,
    hovered: Vec<NodeId>,
    raycaster: Raycaster,
    default_ray_length: f32,
    suppressed_modes: Vec<TargetRayMode>,
}

impl SelectionManager {
    pub fn new(interactive_group: NodeId, config: &InteractionConfig) -> Self {
        SelectionManager {
            interactive_group,
            hovered: Vec::new(),
            raycaster: Raycaster::default(),
            default_ray_length: config.default_ray_length,
            suppressed_modes: config.hover_suppressed_modes.clone(),
        }
    }

    pub fn interactive_group(&self) -> NodeId {
        self.interactive_group
    }

    /// Objects hovered during the current frame, in controller order.
    pub fn hovered(&self) -> &[NodeId] {
        &self.hovered
    }

    pub fn intersections(
        &self,
        scene: &SceneGraph,
        controller: &ControllerState,
    ) -> Result<Vec<Hit>, SceneError> {
        let ray = controller.world_ray(scene)?;
        Ok(self
            .raycaster
            .intersect(scene, &ray, scene.children(self.interactive_group), true))
    }

    pub fn clean_hovered(&mut self, controllers: &mut [ControllerState]) {
        self.hovered.clear();
        for controller in controllers {
            controller.set_hovered(None);
        }
    }

    pub fn update_hover(
        &mut self,
        scene: &mut SceneGraph,
        controller: &mut ControllerState,
    ) -> Result<(), SceneError> {
        if self.suppressed_modes.contains(&controller.target_ray_mode()) {
            return Ok(());
        }

        // A holding controller would only ever hover what it holds
        if controller.selected().is_some() {
            return Ok(());
        }

        let hits = self.intersections(scene, controller)?;
        match hits.first() {
            Some(hit) => {
                self.hovered.push(hit.node);
                controller.set_hovered(Some(hit.node));
                controller.set_ray_length(scene, hit.distance)
            }
            None => controller.set_ray_length(scene, self.default_ray_length),
        }
    }

    /// Grab the nearest interactive object under `controllers[index]`'s ray.
    /// Returns the grabbed node, or `None` when the gesture was a no-op.
    pub fn select_start(
        &mut self,
        scene: &mut SceneGraph,
        controllers: &mut [ControllerState],
        index: usize,
        mode: TargetRayMode,
    ) -> Result<Option<NodeId>, InteractionError> {
        let controller = &mut controllers[index];
        controller.set_target_ray_mode(mode);
        let id = controller.id();

        if let Some(held) = controller.selected() {
            selection_log!(DEBUG, "{} already holds {}, ignoring select-start", id, held);
            return Ok(None);
        }

        let hits = self.intersections(scene, &controllers[index])?;
        let Some(nearest) = hits.first() else {
            selection_log!(TRACE, "{} select-start hit nothing", id);
            return Ok(None);
        };
        let node = nearest.node;

        // First processed grab wins
        if let Some(owner) = controllers
            .iter()
            .find(|c| c.id() != id && c.selected() == Some(node))
        {
            selection_log!(WARN, "{} is already held by {}, ignoring {}", node, owner.id(), id);
            return Ok(None);
        }

        let controller = &mut controllers[index];
        scene.attach(node, controller.node())?;
        controller.set_selected(Some(node));

        selection_log!(DEBUG, "{} grabbed {} at distance {:.3}", id, node, nearest.distance);
        Ok(Some(node))
    }

    /// Return the held object (if any) to the interactive group.
    ///
    /// The grab slot is cleared even when the object turns out to have been
    /// moved elsewhere by the host; that case is reported as
    /// `UnexpectedParent` and the object is left where it is.
    pub fn select_end(
        &mut self,
        scene: &mut SceneGraph,
        controller: &mut ControllerState,
    ) -> Result<Option<NodeId>, InteractionError> {
        let Some(node) = controller.take_selected() else {
            return Ok(None);
        };

        let actual = scene.parent(node);
        if actual != Some(controller.node()) {
            return Err(InteractionError::UnexpectedParent {
                node,
                expected: controller.node(),
                actual,
            });
        }

        scene.attach(node, self.interactive_group)?;
        selection_log!(DEBUG, "{} released {}", controller.id(), node);
        Ok(Some(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerId;
    use cgmath::{vec3, Deg, Matrix4, Quaternion, Rotation3};
    use engine::scene::{NodeFlags, Shape, SpatialNode};
    use engine::util::matrices_approx_eq;

    struct Fixture {
        scene: SceneGraph,
        group: NodeId,
        world: NodeId,
        controllers: Vec<ControllerState>,
        selection: SelectionManager,
    }

    fn fixture() -> Fixture {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let group = scene.add(root, SpatialNode::new("interaction-group")).unwrap();
        let world = scene.add(root, SpatialNode::new("world")).unwrap();

        let controllers = (0..2)
            .map(|i| {
                let node = scene.add(root, SpatialNode::new(format!("controller-{i}"))).unwrap();
                let ray = scene
                    .add(node, SpatialNode::new("ray").with_flags(NodeFlags::VISIBLE))
                    .unwrap();
                ControllerState::new(ControllerId(i), node, ray, 5.0)
            })
            .collect();

        let selection = SelectionManager::new(group, &InteractionConfig::default());
        Fixture {
            scene,
            group,
            world,
            controllers,
            selection,
        }
    }

    fn sphere_at(scene: &mut SceneGraph, parent: NodeId, name: &str, z: f32) -> NodeId {
        scene
            .add(
                parent,
                SpatialNode::new(name)
                    .with_shape(Shape::sphere(0.5))
                    .with_transform(Matrix4::from_translation(vec3(0.0, 0.0, z))),
            )
            .unwrap()
    }

    #[test]
    fn test_hover_sets_ray_length_to_hit_distance() {
        let mut f = fixture();
        let object = sphere_at(&mut f.scene, f.group, "object", -2.0);

        f.selection.clean_hovered(&mut f.controllers);
        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert!((f.controllers[0].ray_length() - 1.5).abs() < 1e-4);
        assert_eq!(f.controllers[0].hovered(), Some(object));
        assert_eq!(f.selection.hovered(), &[object]);
        assert_eq!(f.scene.parent(object), Some(f.group));
    }

    #[test]
    fn test_hover_miss_resets_default_length() {
        let mut f = fixture();
        f.controllers[0].set_ray_length(&mut f.scene, 1.0).unwrap();

        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert_eq!(f.controllers[0].ray_length(), 5.0);
        assert_eq!(f.controllers[0].hovered(), None);
    }

    #[test]
    fn test_hover_ignores_non_interactive_content() {
        let mut f = fixture();
        sphere_at(&mut f.scene, f.world, "scenery", -2.0);

        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert!(f.selection.hovered().is_empty());
    }

    #[test]
    fn test_clean_discards_previous_frame() {
        let mut f = fixture();
        sphere_at(&mut f.scene, f.group, "object", -2.0);
        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        f.selection.clean_hovered(&mut f.controllers);

        assert!(f.selection.hovered().is_empty());
        assert_eq!(f.controllers[0].hovered(), None);
    }

    #[test]
    fn test_screen_mode_gets_no_hover() {
        let mut f = fixture();
        sphere_at(&mut f.scene, f.group, "object", -2.0);
        f.controllers[0].set_target_ray_mode(TargetRayMode::Screen);

        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert!(f.selection.hovered().is_empty());
        assert_eq!(f.controllers[0].ray_length(), 5.0);
    }

    #[test]
    fn test_hover_suppression_follows_config() {
        let mut f = fixture();
        let object = sphere_at(&mut f.scene, f.group, "object", -2.0);
        let config = InteractionConfig {
            hover_suppressed_modes: vec![TargetRayMode::Gaze],
            ..InteractionConfig::default()
        };
        let mut selection = SelectionManager::new(f.group, &config);

        f.controllers[0].set_target_ray_mode(TargetRayMode::Gaze);
        f.controllers[1].set_target_ray_mode(TargetRayMode::Screen);
        for controller in f.controllers.iter_mut() {
            selection.update_hover(&mut f.scene, controller).unwrap();
        }

        assert_eq!(f.controllers[0].hovered(), None);
        assert_eq!(f.controllers[1].hovered(), Some(object));
        assert_eq!(selection.hovered(), &[object]);
    }

    #[test]
    fn test_grab_and_release_preserve_world_transform() {
        let mut f = fixture();
        let object = f
            .scene
            .add(
                f.group,
                SpatialNode::new("object").with_shape(Shape::cuboid(1.0, 1.0, 1.0)).with_transform(
                    Matrix4::from_translation(vec3(0.0, 0.0, -3.0))
                        * Matrix4::from(Quaternion::from_angle_y(Deg(30.0)))
                        * Matrix4::from_scale(0.8),
                ),
            )
            .unwrap();
        f.scene
            .set_world_transform(
                f.controllers[0].node(),
                Matrix4::from_translation(vec3(0.0, 0.0, 0.5))
                    * Matrix4::from(Quaternion::from_angle_z(Deg(15.0))),
            )
            .unwrap();
        let before = f.scene.world_transform(object).unwrap();

        let grabbed = f
            .selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();

        assert_eq!(grabbed, Some(object));
        assert_eq!(f.scene.parent(object), Some(f.controllers[0].node()));
        assert_eq!(f.controllers[0].selected(), Some(object));
        assert!(matrices_approx_eq(&before, &f.scene.world_transform(object).unwrap(), 1e-4));

        let released = f.selection.select_end(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert_eq!(released, Some(object));
        assert_eq!(f.scene.parent(object), Some(f.group));
        assert_eq!(f.controllers[0].selected(), None);
        assert!(matrices_approx_eq(&before, &f.scene.world_transform(object).unwrap(), 1e-4));
    }

    #[test]
    fn test_grab_takes_nearest_descendant() {
        let mut f = fixture();
        let model = f.scene.add(f.group, SpatialNode::new("model")).unwrap();
        let back = sphere_at(&mut f.scene, model, "back", -6.0);
        let front = sphere_at(&mut f.scene, model, "front", -3.0);

        let grabbed = f
            .selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();

        assert_eq!(grabbed, Some(front));
        assert_eq!(f.scene.parent(back), Some(model));
    }

    #[test]
    fn test_select_start_without_hit_is_noop_but_records_mode() {
        let mut f = fixture();

        let grabbed = f
            .selection
            .select_start(&mut f.scene, &mut f.controllers, 1, TargetRayMode::Gaze)
            .unwrap();

        assert_eq!(grabbed, None);
        assert_eq!(f.controllers[1].selected(), None);
        assert_eq!(f.controllers[1].target_ray_mode(), TargetRayMode::Gaze);
    }

    #[test]
    fn test_select_end_without_selection_is_noop() {
        let mut f = fixture();
        let released = f.selection.select_end(&mut f.scene, &mut f.controllers[0]).unwrap();
        assert_eq!(released, None);
    }

    #[test]
    fn test_holding_controller_never_hovers() {
        let mut f = fixture();
        sphere_at(&mut f.scene, f.group, "a", -2.0);
        sphere_at(&mut f.scene, f.group, "b", -4.0);
        f.selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();

        f.selection.clean_hovered(&mut f.controllers);
        f.selection.update_hover(&mut f.scene, &mut f.controllers[0]).unwrap();

        assert_eq!(f.controllers[0].hovered(), None);
        assert!(f.selection.hovered().is_empty());
    }

    #[test]
    fn test_second_controller_cannot_take_held_object() {
        let mut f = fixture();
        let object = sphere_at(&mut f.scene, f.group, "object", -2.0);

        f.selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();
        let second = f
            .selection
            .select_start(&mut f.scene, &mut f.controllers, 1, TargetRayMode::TrackedPointer)
            .unwrap();

        assert_eq!(second, None);
        assert_eq!(f.controllers[0].selected(), Some(object));
        assert_eq!(f.controllers[1].selected(), None);
    }

    #[test]
    fn test_second_grab_while_holding_is_ignored() {
        let mut f = fixture();
        let first = sphere_at(&mut f.scene, f.group, "first", -2.0);
        let other = sphere_at(&mut f.scene, f.group, "other", -2.0);

        f.selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();
        let again = f
            .selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();

        assert_eq!(again, None);
        assert_eq!(f.controllers[0].selected(), Some(first));
        assert_eq!(f.scene.parent(other), Some(f.group));
    }

    #[test]
    fn test_release_after_external_move_reports_contract_violation() {
        let mut f = fixture();
        let object = sphere_at(&mut f.scene, f.group, "object", -2.0);
        f.selection
            .select_start(&mut f.scene, &mut f.controllers, 0, TargetRayMode::TrackedPointer)
            .unwrap();
        f.scene.attach(object, f.world).unwrap();

        let err = f.selection.select_end(&mut f.scene, &mut f.controllers[0]).unwrap_err();

        assert!(matches!(err, InteractionError::UnexpectedParent { node, .. } if node == object));
        assert_eq!(f.controllers[0].selected(), None);
        assert_eq!(f.scene.parent(object), Some(f.world));
    }
}
