//! Per-object position, rotation, and scale.

use crate::math::{Matrix4, Quaternion, Vector3, EPSILON};

/// Position/rotation/scale with a cached model matrix.
///
/// Plain data: mutating a transform does not notify anything. An object
/// that caches world-space geometry derived from its transform calls
/// [`crate::object::SceneObject::resync`] after mutation; the
/// convenience mutators on `SceneObject` pair the two steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vector3,
    rotation: Quaternion,
    scale: Vector3,
    matrix: Matrix4,
}

impl Transform {
    pub fn identity() -> Self {
        Self::new(Vector3::ZERO, Quaternion::IDENTITY, Vector3::ONE)
    }

    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        let mut t = Self {
            position,
            rotation,
            scale,
            matrix: Matrix4::IDENTITY,
        };
        t.rebuild();
        t
    }

    pub fn from_position(position: Vector3) -> Self {
        Self::new(position, Quaternion::IDENTITY, Vector3::ONE)
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    /// The composed model matrix `T * R * S`: scale, then rotate, then
    /// translate.
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.rebuild();
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.rebuild();
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
        self.rebuild();
    }

    /// Compose `delta` onto the current rotation (current applied first).
    /// A degenerate current rotation is treated as identity.
    pub fn rotate(&mut self, delta: Quaternion) {
        let current = if self.rotation.magnitude() < EPSILON {
            Quaternion::IDENTITY
        } else {
            self.rotation
        };
        self.rotation = (delta * current).normalize();
        self.rebuild();
    }

    pub fn rotate_axis_angle(&mut self, axis: Vector3, angle: f32) {
        self.rotate(Quaternion::from_axis_angle(axis, angle));
    }

    /// Local +Z rotated into world space.
    pub fn forward(&self) -> Vector3 {
        self.rotation.rotate(Vector3::Z)
    }

    /// Local +Y rotated into world space.
    pub fn up(&self) -> Vector3 {
        self.rotation.rotate(Vector3::Y)
    }

    /// Local +X rotated into world space.
    pub fn right(&self) -> Vector3 {
        self.rotation.rotate(Vector3::X)
    }

    /// Evaluate a local-space point in world space:
    /// `rotation · (p * scale) + position`.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.matrix.transform_point(p)
    }

    fn rebuild(&mut self) {
        self.matrix = Matrix4::from_translation(self.position)
            * self.rotation.to_matrix4()
            * Matrix4::from_scale(self.scale);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vector3, b: Vector3, tol: f32) {
        assert!((a - b).magnitude() < tol, "{a:?} vs {b:?}");
    }

    #[test]
    fn component_round_trip_is_exact() {
        let position = Vector3::new(1.5, -2.0, 3.25);
        let rotation = Quaternion::from_axis_angle(Vector3::Y, 0.7);
        let scale = Vector3::new(2.0, 2.0, 2.0);
        let mut t = Transform::identity();
        t.set_position(position);
        t.set_rotation(rotation);
        t.set_scale(scale);
        assert_eq!(t.position(), position);
        assert_eq!(t.rotation(), rotation);
        assert_eq!(t.scale(), scale);
    }

    #[test]
    fn transform_point_matches_component_evaluation() {
        let t = Transform::new(
            Vector3::new(1.0, 2.0, 3.0),
            Quaternion::from_axis_angle(Vector3::Z, FRAC_PI_2),
            Vector3::new(2.0, 1.0, 1.0),
        );
        let p = Vector3::new(1.0, 0.0, 0.0);
        // Scale: (2,0,0); rotate 90° about Z: (0,2,0); translate: (1,4,3).
        assert_vec_eq(t.transform_point(p), Vector3::new(1.0, 4.0, 3.0), 1e-5);
    }

    #[test]
    fn derived_axes_follow_rotation() {
        let t = Transform::identity();
        assert_vec_eq(t.forward(), Vector3::Z, 1e-6);
        assert_vec_eq(t.up(), Vector3::Y, 1e-6);
        assert_vec_eq(t.right(), Vector3::X, 1e-6);

        let mut yawed = Transform::identity();
        yawed.set_rotation(Quaternion::from_axis_angle(Vector3::Y, FRAC_PI_2));
        // A quarter turn about +Y swings forward onto +X.
        assert_vec_eq(yawed.forward(), Vector3::X, 1e-6);
        assert_vec_eq(yawed.up(), Vector3::Y, 1e-6);
        assert_vec_eq(yawed.right(), -Vector3::Z, 1e-6);
    }

    #[test]
    fn rotate_composes_onto_existing_rotation() {
        let mut t = Transform::identity();
        t.rotate_axis_angle(Vector3::Y, FRAC_PI_2 / 2.0);
        t.rotate_axis_angle(Vector3::Y, FRAC_PI_2 / 2.0);
        assert_vec_eq(t.forward(), Vector3::X, 1e-5);
        assert!((t.rotation().magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_treats_degenerate_rotation_as_identity() {
        let mut t = Transform::identity();
        t.set_rotation(Quaternion::new(0.0, 0.0, 0.0, 0.0));
        t.rotate_axis_angle(Vector3::Z, FRAC_PI_2);
        assert_vec_eq(t.right(), Vector3::Y, 1e-6);
    }
}
