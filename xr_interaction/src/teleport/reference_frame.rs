use cgmath::{InnerSpace, Matrix4, Point3, Quaternion, Vector3};

/// Rotation followed by translation, as reported by tracking runtimes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidTransform {
    pub position: Vector3<f32>,
    /// Unit quaternion.
    pub orientation: Quaternion<f32>,
}

impl RigidTransform {
    pub fn identity() -> Self {
        RigidTransform {
            position: Vector3::new(0.0, 0.0, 0.0),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    pub fn new(position: Vector3<f32>, orientation: Quaternion<f32>) -> Self {
        RigidTransform {
            position,
            orientation: orientation.normalize(),
        }
    }

    pub fn from_translation(position: Vector3<f32>) -> Self {
        RigidTransform {
            position,
            ..Self::identity()
        }
    }

    pub fn inverse(&self) -> Self {
        let orientation = self.orientation.conjugate();
        RigidTransform {
            position: -(orientation * self.position),
            orientation,
        }
    }

    /// `self * other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &RigidTransform) -> Self {
        RigidTransform {
            position: self.position + self.orientation * other.position,
            orientation: (self.orientation * other.orientation).normalize(),
        }
    }

    pub fn transform_point(&self, point: Point3<f32>) -> Point3<f32> {
        let rotated = self.orientation * Vector3::new(point.x, point.y, point.z);
        Point3::new(
            rotated.x + self.position.x,
            rotated.y + self.position.y,
            rotated.z + self.position.z,
        )
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.orientation)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Captured from the runtime at session start.
    Base,
    /// Derived from the base to relocate the user.
    Offset,
}

/// Coordinate system tracked poses are reported against.
///
/// Mirrors WebXR offset reference spaces: `origin_offset` is the pose of
/// this frame's origin in the physical tracking space, and a pose tracked
/// at `p` is reported as `origin_offset⁻¹ · p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceFrame {
    kind: FrameKind,
    origin_offset: RigidTransform,
}

impl ReferenceFrame {
    pub fn base() -> Self {
        Self::base_with_offset(RigidTransform::identity())
    }

    /// A base frame whose origin the runtime already placed somewhere other
    /// than the physical tracking origin (floor level, bounded space, ...).
    pub fn base_with_offset(origin_offset: RigidTransform) -> Self {
        ReferenceFrame {
            kind: FrameKind::Base,
            origin_offset,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn origin_offset(&self) -> &RigidTransform {
        &self.origin_offset
    }

    pub fn offset(&self, transform: RigidTransform) -> ReferenceFrame {
        ReferenceFrame {
            kind: FrameKind::Offset,
            origin_offset: self.origin_offset.compose(&transform),
        }
    }

    pub fn resolve(&self, tracked: &RigidTransform) -> Matrix4<f32> {
        self.origin_offset.inverse().compose(tracked).to_matrix()
    }

    /// World point at which the physical tracking origin now appears.
    pub fn anchor_point(&self) -> Point3<f32> {
        self.origin_offset
            .inverse()
            .transform_point(Point3::new(0.0, 0.0, 0.0))
    }
}

/// The session's base frame plus at most one installed offset frame.
#[derive(Clone, Debug, Default)]
pub struct ReferenceFrameSlot {
    base: Option<ReferenceFrame>,
    offset: Option<ReferenceFrame>,
}

impl ReferenceFrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the base for a new session; any previous offset is dropped.
    pub fn capture_base(&mut self, base: ReferenceFrame) {
        self.base = Some(base);
        self.offset = None;
    }

    /// Replace the active offset frame.
    pub fn install_offset(&mut self, frame: ReferenceFrame) {
        self.offset = Some(frame);
    }

    pub fn base(&self) -> Option<&ReferenceFrame> {
        self.base.as_ref()
    }

    pub fn offset(&self) -> Option<&ReferenceFrame> {
        self.offset.as_ref()
    }

    /// The offset when one is installed, otherwise the base.
    pub fn active(&self) -> Option<&ReferenceFrame> {
        self.offset.as_ref().or(self.base.as_ref())
    }

    pub fn clear(&mut self) {
        self.base = None;
        self.offset = None;
    }
}
