use cgmath::{InnerSpace, Matrix4, Point3, SquareMatrix, Transform, Vector3};
use engine::scene::{NodeId, SceneGraph};
use engine::util::{position_of, rotation_only, FORWARD};
use ordered_float::OrderedFloat;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Unit length, unless built from a degenerate pose (see `is_finite`).
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray along the local -Z axis of `transform`. Only the rotation part is
    /// applied to the axis, so scaled controllers still produce unit rays.
    pub fn from_world_transform(transform: &Matrix4<f32>) -> Ray {
        Ray::new(position_of(transform), rotation_only(transform) * FORWARD)
    }

    pub fn at(&self, distance: f32) -> Point3<f32> {
        self.origin + self.direction * distance
    }

    /// False for rays derived from zero-scale or NaN transforms; such rays
    /// hit nothing.
    pub fn is_finite(&self) -> bool {
        let o = self.origin;
        let d = self.direction;
        [o.x, o.y, o.z, d.x, d.y, d.z].iter().all(|v| v.is_finite())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Point3<f32>,
}

/// Ray queries against a scene graph. Hits outside `near..=far` are dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raycaster {
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Raycaster {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    pub fn new(near: f32, far: f32) -> Raycaster {
        Raycaster { near, far }
    }

    /// All hits of `ray` against `candidates` (and, when `recursive`, their
    /// descendants), nearest first. Equal distances keep traversal order.
    pub fn intersect(
        &self,
        scene: &SceneGraph,
        ray: &Ray,
        candidates: &[NodeId],
        recursive: bool,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        if !ray.is_finite() {
            engine::scene_log!(TRACE, "ignoring non-finite ray {:?}", ray);
            return hits;
        }

        for &candidate in candidates {
            self.intersect_node(scene, ray, candidate, recursive, &mut hits);
        }
        // Stable, so ties keep traversal order
        hits.sort_by_key(|hit| OrderedFloat(hit.distance));
        hits
    }

    fn intersect_node(
        &self,
        scene: &SceneGraph,
        ray: &Ray,
        id: NodeId,
        recursive: bool,
        hits: &mut Vec<Hit>,
    ) {
        let Some(node) = scene.node(id) else {
            return;
        };

        if node.is_pickable() {
            if let Some(shape) = node.shape.as_ref() {
                if let Some(hit) = self.test_shape(scene, ray, id, shape) {
                    hits.push(hit);
                }
            }
        }

        if recursive {
            for &child in node.children() {
                self.intersect_node(scene, ray, child, recursive, hits);
            }
        }
    }

    fn test_shape(
        &self,
        scene: &SceneGraph,
        ray: &Ray,
        id: NodeId,
        shape: &engine::scene::Shape,
    ) -> Option<Hit> {
        let world = scene.world_transform(id).ok()?;
        let Some(world_to_local) = world.invert() else {
            engine::scene_log!(TRACE, "skipping {} with singular transform", id);
            return None;
        };

        let local_origin = world_to_local.transform_point(ray.origin);
        let local_direction = world_to_local.transform_vector(ray.direction);

        // Affine maps preserve the ray parameter, and the world direction is
        // unit length, so the local parameter is the world distance.
        let distance = shape.intersect_local(local_origin, local_direction)?;
        if !distance.is_finite() || distance < self.near || distance > self.far {
            return None;
        }

        Some(Hit {
            node: id,
            distance,
            point: ray.at(distance),
        })
    }
}

/// `Raycaster::default().intersect(..)`.
pub fn intersect(
    scene: &SceneGraph,
    ray: &Ray,
    candidates: &[NodeId],
    recursive: bool,
) -> Vec<Hit> {
    Raycaster::default().intersect(scene, ray, candidates, recursive)
}
