//! Unit quaternion rotations.

use std::ops::Mul;

use super::{Matrix3, Matrix4, Vector3, EPSILON};

/// Rotation as a unit quaternion (w, x, y, z).
///
/// Composition is the Hamilton product and is not commutative: applying
/// rotation `a` and then rotation `b` is `b * a`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`. A degenerate axis yields
    /// the identity rotation.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let Some(axis) = axis.try_normalize() else {
            return Self::IDENTITY;
        };
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Euler rotation matching [`Matrix4::from_euler`]: X applied first,
    /// then Y, then Z.
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_angle(Vector3::X, x);
        let qy = Self::from_axis_angle(Vector3::Y, y);
        let qz = Self::from_axis_angle(Vector3::Z, z);
        qz * qy * qx
    }

    #[inline]
    pub fn magnitude_squared(self) -> f32 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn magnitude(self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Scale to unit magnitude. A degenerate (near-zero) quaternion is
    /// treated as the identity rotation.
    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag < EPSILON {
            return Self::IDENTITY;
        }
        Self::new(self.w / mag, self.x / mag, self.y / mag, self.z / mag)
    }

    /// Inverse rotation (for unit quaternions).
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a vector by conjugating the pure quaternion (0, v).
    pub fn rotate(self, v: Vector3) -> Vector3 {
        let qv = Vector3::new(self.x, self.y, self.z);
        let t = qv.cross(v) * 2.0;
        v + t * self.w + qv.cross(t)
    }

    /// The equivalent 3x3 rotation matrix (column-vector convention).
    pub fn to_matrix3(self) -> Matrix3 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        Matrix3::from_cols(
            Vector3::new(1.0 - y * y2 - z * z2, x * y2 + w * z2, x * z2 - w * y2),
            Vector3::new(x * y2 - w * z2, 1.0 - x * x2 - z * z2, y * z2 + w * x2),
            Vector3::new(x * z2 + w * y2, y * z2 - w * x2, 1.0 - x * x2 - y * y2),
        )
    }

    pub fn to_matrix4(self) -> Matrix4 {
        Matrix4::from_matrix3(&self.to_matrix3())
    }

    /// Extract the rotation from a 3x3 rotation matrix (Shepperd's
    /// method: branch on the largest diagonal contribution to keep the
    /// square root well-conditioned).
    pub fn from_matrix3(m: &Matrix3) -> Self {
        let trace = m.at(0, 0) + m.at(1, 1) + m.at(2, 2);
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (m.at(2, 1) - m.at(1, 2)) / s,
                (m.at(0, 2) - m.at(2, 0)) / s,
                (m.at(1, 0) - m.at(0, 1)) / s,
            )
        } else if m.at(0, 0) > m.at(1, 1) && m.at(0, 0) > m.at(2, 2) {
            let s = (1.0 + m.at(0, 0) - m.at(1, 1) - m.at(2, 2)).sqrt() * 2.0;
            Self::new(
                (m.at(2, 1) - m.at(1, 2)) / s,
                0.25 * s,
                (m.at(0, 1) + m.at(1, 0)) / s,
                (m.at(0, 2) + m.at(2, 0)) / s,
            )
        } else if m.at(1, 1) > m.at(2, 2) {
            let s = (1.0 + m.at(1, 1) - m.at(0, 0) - m.at(2, 2)).sqrt() * 2.0;
            Self::new(
                (m.at(0, 2) - m.at(2, 0)) / s,
                (m.at(0, 1) + m.at(1, 0)) / s,
                0.25 * s,
                (m.at(1, 2) + m.at(2, 1)) / s,
            )
        } else {
            let s = (1.0 + m.at(2, 2) - m.at(0, 0) - m.at(1, 1)).sqrt() * 2.0;
            Self::new(
                (m.at(1, 0) - m.at(0, 1)) / s,
                (m.at(0, 2) + m.at(2, 0)) / s,
                (m.at(1, 2) + m.at(2, 1)) / s,
                0.25 * s,
            )
        }
    }

    /// Extract the rotation from the 3x3 block of a 4x4 matrix.
    pub fn from_matrix4(m: &Matrix4) -> Self {
        Self::from_matrix3(&m.rotation_block())
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product.
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_vec_eq(a: Vector3, b: Vector3, tol: f32) {
        assert!((a - b).magnitude() < tol, "{a:?} vs {b:?}");
    }

    const ROTATIONS: [(f32, f32, f32); 4] = [
        (0.0, 0.0, 0.0),
        (0.5, -1.2, 2.0),
        (FRAC_PI_2, FRAC_PI_2, 0.0),
        (-2.7, 0.3, 1.9),
    ];

    const VECTORS: [Vector3; 3] = [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(-2.0, 3.0, 0.5),
        Vector3::new(0.1, 0.1, -7.0),
    ];

    #[test]
    fn identity_leaves_vectors_alone() {
        assert_eq!(Quaternion::IDENTITY.rotate(Vector3::X), Vector3::X);
    }

    #[test]
    fn axis_angle_quarter_turn() {
        let q = Quaternion::from_axis_angle(Vector3::Z, FRAC_PI_2);
        assert_vec_eq(q.rotate(Vector3::X), Vector3::Y, 1e-6);
    }

    #[test]
    fn rotation_preserves_magnitude() {
        for &(x, y, z) in &ROTATIONS {
            let q = Quaternion::from_euler(x, y, z);
            assert!((q.magnitude() - 1.0).abs() < 1e-5);
            for &v in &VECTORS {
                let r = q.rotate(v);
                assert!((r.magnitude() - v.magnitude()).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn quaternion_matches_matrix_rotation() {
        for &(x, y, z) in &ROTATIONS {
            let q = Quaternion::from_euler(x, y, z);
            let m = Matrix4::from_euler(x, y, z);
            for &v in &VECTORS {
                assert_vec_eq(q.rotate(v), m.transform_direction(v), 1e-4);
            }
        }
    }

    #[test]
    fn composition_order_is_right_to_left() {
        let qx = Quaternion::from_axis_angle(Vector3::X, FRAC_PI_2);
        let qy = Quaternion::from_axis_angle(Vector3::Y, FRAC_PI_2);
        // Apply X first, then Y.
        let combined = qy * qx;
        let expected = qy.rotate(qx.rotate(Vector3::Z));
        assert_vec_eq(combined.rotate(Vector3::Z), expected, 1e-6);
    }

    #[test]
    fn matrix_round_trip() {
        for &(x, y, z) in &ROTATIONS {
            let q = Quaternion::from_euler(x, y, z);
            let back = Quaternion::from_matrix3(&q.to_matrix3());
            // q and -q encode the same rotation; compare by action.
            for &v in &VECTORS {
                assert_vec_eq(q.rotate(v), back.rotate(v), 1e-4);
            }
        }
    }

    #[test]
    fn round_trip_covers_every_shepperd_branch() {
        // Half-turns about each axis drive the trace non-positive.
        for axis in [Vector3::X, Vector3::Y, Vector3::Z] {
            let q = Quaternion::from_axis_angle(axis, PI);
            let back = Quaternion::from_matrix3(&q.to_matrix3());
            for &v in &VECTORS {
                assert_vec_eq(q.rotate(v), back.rotate(v), 1e-4);
            }
        }
    }

    #[test]
    fn conjugate_inverts_rotation() {
        let q = Quaternion::from_euler(0.4, 0.9, -1.3);
        for &v in &VECTORS {
            assert_vec_eq(q.conjugate().rotate(q.rotate(v)), v, 1e-4);
        }
    }

    #[test]
    fn degenerate_quaternion_normalizes_to_identity() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(q.normalize(), Quaternion::IDENTITY);
        assert_eq!(
            Quaternion::from_axis_angle(Vector3::ZERO, 1.0),
            Quaternion::IDENTITY
        );
    }
}
