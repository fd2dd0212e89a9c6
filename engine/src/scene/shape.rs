use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

/// Ray parameters at or below this are treated as behind the origin.
pub const RAY_EPSILON: f32 = 1e-6;

/// Pickable geometry, expressed in the owning node's local space.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Centered on the local origin.
    Sphere { radius: f32 },
    /// Axis-aligned in local space, centered on the local origin.
    Cuboid { half_extents: Vector3<f32> },
    /// Rectangle in the local XZ plane; the usual ground.
    Quad { half_width: f32, half_depth: f32 },
    /// Circle in the local XZ plane.
    Disc { radius: f32 },
    /// Two-sided triangle soup.
    TriangleMesh { triangles: Vec<[Point3<f32>; 3]> },
}

impl Shape {
    pub fn sphere(radius: f32) -> Shape {
        Shape::Sphere { radius }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Shape {
        Shape::Cuboid {
            half_extents: Vector3::new(width, height, depth) * 0.5,
        }
    }

    pub fn quad(width: f32, depth: f32) -> Shape {
        Shape::Quad {
            half_width: width * 0.5,
            half_depth: depth * 0.5,
        }
    }

    pub fn disc(radius: f32) -> Shape {
        Shape::Disc { radius }
    }

    /// Nearest ray parameter `t > RAY_EPSILON` where `origin + t * direction`
    /// touches the shape. `direction` need not be normalized. Non-finite
    /// input never produces a hit.
    pub fn intersect_local(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<f32> {
        let t = match self {
            Shape::Sphere { radius } => intersect_sphere(origin, direction, *radius),
            Shape::Cuboid { half_extents } => intersect_cuboid(origin, direction, *half_extents),
            Shape::Quad {
                half_width,
                half_depth,
            } => intersect_xz_plane(origin, direction)
                .filter(|(_, p)| p.x.abs() <= *half_width && p.z.abs() <= *half_depth)
                .map(|(t, _)| t),
            Shape::Disc { radius } => intersect_xz_plane(origin, direction)
                .filter(|(_, p)| p.x * p.x + p.z * p.z <= radius * radius)
                .map(|(t, _)| t),
            Shape::TriangleMesh { triangles } => triangles
                .iter()
                .filter_map(|[v0, v1, v2]| {
                    intersect_triangle(origin, direction, *v0, *v1, *v2)
                })
                .fold(None, |nearest: Option<f32>, t| match nearest {
                    Some(n) if n <= t => Some(n),
                    _ => Some(t),
                }),
        };
        t.filter(|t| t.is_finite())
    }
}

fn nearest_forward(t0: f32, t1: f32) -> Option<f32> {
    if t0 > RAY_EPSILON {
        Some(t0)
    } else if t1 > RAY_EPSILON {
        Some(t1)
    } else {
        None
    }
}

fn intersect_sphere(origin: Point3<f32>, direction: Vector3<f32>, radius: f32) -> Option<f32> {
    let o = origin.to_vec();
    let a = direction.dot(direction);
    if a <= f32::EPSILON {
        return None;
    }
    let b = 2.0 * o.dot(direction);
    let c = o.dot(o) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t0 = (-b - sqrt_discriminant) / (2.0 * a);
    let t1 = (-b + sqrt_discriminant) / (2.0 * a);
    nearest_forward(t0, t1)
}

// Slab test
fn intersect_cuboid(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    half_extents: Vector3<f32>,
) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];

        if d.abs() <= f32::EPSILON {
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut near = (-h - o) * inv;
        let mut far = (h - o) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }

        t_min = t_min.max(near);
        t_max = t_max.min(far);
        if t_min > t_max {
            return None;
        }
    }

    nearest_forward(t_min, t_max)
}

fn intersect_xz_plane(origin: Point3<f32>, direction: Vector3<f32>) -> Option<(f32, Point3<f32>)> {
    if direction.y.abs() <= f32::EPSILON {
        return None;
    }

    let t = -origin.y / direction.y;
    if t <= RAY_EPSILON {
        return None;
    }

    Some((t, origin + direction * t))
}

// Möller-Trumbore, culling disabled
fn intersect_triangle(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    v0: Point3<f32>,
    v1: Point3<f32>,
    v2: Point3<f32>,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = direction.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < f32::EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - v0;

    let u = inv_det * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = inv_det * direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(q);
    (t > RAY_EPSILON).then_some(t)
}
