use cgmath::{InnerSpace, Matrix3, Matrix4, Point3, Vector3};

/// Forward axis of controllers and cameras (right-handed, -Z).
pub const FORWARD: Vector3<f32> = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};

pub fn translation_of(transform: &Matrix4<f32>) -> Vector3<f32> {
    transform.w.truncate()
}

pub fn position_of(transform: &Matrix4<f32>) -> Point3<f32> {
    let t = translation_of(transform);
    Point3::new(t.x, t.y, t.z)
}

/// Upper 3x3 with each basis column normalized, discarding translation and scale.
/// Degenerate (zero-length) columns are left as-is.
pub fn rotation_only(transform: &Matrix4<f32>) -> Matrix3<f32> {
    let normalize = |column: Vector3<f32>| {
        let length = column.magnitude();
        if length > f32::EPSILON {
            column / length
        } else {
            column
        }
    };

    Matrix3::from_cols(
        normalize(transform.x.truncate()),
        normalize(transform.y.truncate()),
        normalize(transform.z.truncate()),
    )
}

pub fn matrix_is_finite(transform: &Matrix4<f32>) -> bool {
    let values: &[f32; 16] = transform.as_ref();
    values.iter().all(|v| v.is_finite())
}

pub fn matrices_approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>, epsilon: f32) -> bool {
    let a: &[f32; 16] = a.as_ref();
    let b: &[f32; 16] = b.as_ref();
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}

pub fn points_approx_eq(a: Point3<f32>, b: Point3<f32>, epsilon: f32) -> bool {
    (a - b).magnitude() <= epsilon
}
