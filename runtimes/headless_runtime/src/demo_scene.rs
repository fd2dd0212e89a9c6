use std::f32::consts::TAU;

use cgmath::{vec3, Matrix4, Point3};
use engine::scene::{NodeId, SceneError, SceneGraph, Shape, SpatialNode};

const CONE_SEGMENTS: usize = 12;

/// Ground plus a handful of grabbable primitives. Only the ground lives
/// outside the interactive group, so it can be teleported onto but not
/// picked up.
pub fn build(scene: &mut SceneGraph, interactive_group: NodeId) -> Result<(), SceneError> {
    let root = scene.root();
    scene.add(root, SpatialNode::new("ground").with_shape(Shape::quad(20.0, 20.0)))?;

    let objects = [
        ("cone", cone(0.2, 0.4), vec3(-0.8, 1.0, -1.2)),
        ("sphere-a", Shape::sphere(0.2), vec3(0.0, 1.2, -1.5)),
        ("sphere-b", Shape::sphere(0.25), vec3(0.8, 0.9, -1.0)),
        ("wire-box", Shape::cuboid(0.4, 0.4, 0.4), vec3(0.3, 0.5, -2.5)),
    ];

    for (name, shape, position) in objects {
        scene.add(
            interactive_group,
            SpatialNode::new(name)
                .with_shape(shape)
                .with_transform(Matrix4::from_translation(position)),
        )?;
    }

    Ok(())
}

/// Closed cone centred on the origin, apex up.
fn cone(radius: f32, height: f32) -> Shape {
    let apex = Point3::new(0.0, height / 2.0, 0.0);
    let base_center = Point3::new(0.0, -height / 2.0, 0.0);
    let rim = |i: usize| {
        let angle = TAU * (i % CONE_SEGMENTS) as f32 / CONE_SEGMENTS as f32;
        Point3::new(radius * angle.cos(), -height / 2.0, radius * angle.sin())
    };

    let triangles = (0..CONE_SEGMENTS)
        .flat_map(|i| [[apex, rim(i), rim(i + 1)], [base_center, rim(i + 1), rim(i)]])
        .collect();

    Shape::TriangleMesh { triangles }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_places_ground_outside_group() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let group = scene.add(root, SpatialNode::new("group")).unwrap();

        build(&mut scene, group).unwrap();

        let ground = scene.find_by_name("ground").unwrap();
        assert_eq!(scene.parent(ground), Some(root));
        assert_eq!(scene.children(group).len(), 4);
    }

    #[test]
    fn test_cone_is_hit_from_the_side() {
        let shape = cone(0.2, 0.4);
        let t = shape
            .intersect_local(Point3::new(0.01, 0.0, 2.0), vec3(0.0, 0.0, -1.0))
            .unwrap();
        // Half way up the slant the radius is halved
        assert!((t - 1.9).abs() < 0.01);
    }
}
