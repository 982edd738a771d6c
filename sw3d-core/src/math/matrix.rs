//! Square matrix types.
//!
//! Storage is column-major and vectors are columns: `M * v` applies `M`
//! to `v`, and `A * B` applies `B` first. The combined Euler rotation is
//! `Rz * Ry * Rx`: X rotates first, then Y, then Z. Every rotation
//! producer in the crate ([`Matrix4::from_euler`],
//! [`super::Quaternion::from_euler`], the camera's view conversion)
//! follows this convention.

use std::ops::{Index, Mul};

use super::{Quaternion, Vector3, Vector4, EPSILON};

/// Determinant of a 2x2 matrix given row by row.
#[inline]
fn det2(a: f32, b: f32, c: f32, d: f32) -> f32 {
    a * d - b * c
}

/// Determinant of a 3x3 matrix given as rows, by cofactor expansion
/// along the first row.
#[inline]
fn det3(m: &[[f32; 3]; 3]) -> f32 {
    m[0][0] * det2(m[1][1], m[1][2], m[2][1], m[2][2])
        - m[0][1] * det2(m[1][0], m[1][2], m[2][0], m[2][2])
        + m[0][2] * det2(m[1][0], m[1][1], m[2][0], m[2][1])
}

/// 3x3 matrix; rotation blocks and normal math.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix3 {
    pub cols: [Vector3; 3],
}

impl Matrix3 {
    pub const IDENTITY: Self = Self {
        cols: [Vector3::X, Vector3::Y, Vector3::Z],
    };

    pub const ZERO: Self = Self {
        cols: [Vector3::ZERO; 3],
    };

    #[inline]
    pub const fn from_cols(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    /// Element at (row, col).
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vector3 {
        self.cols[index]
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vector3 {
        Vector3::new(self.cols[0][index], self.cols[1][index], self.cols[2][index])
    }

    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2))
    }

    pub fn determinant(&self) -> f32 {
        let m = [
            [self.at(0, 0), self.at(0, 1), self.at(0, 2)],
            [self.at(1, 0), self.at(1, 1), self.at(1, 2)],
            [self.at(2, 0), self.at(2, 1), self.at(2, 2)],
        ];
        det3(&m)
    }

    /// Inverse by the adjugate, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let mut out = Self::ZERO;
        for r in 0..3 {
            for c in 0..3 {
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                // The cofactor of (c, r) lands transposed at (r, c).
                let mut minor = [[0.0f32; 2]; 2];
                let mut mr = 0;
                for row in 0..3 {
                    if row == c {
                        continue;
                    }
                    let mut mc = 0;
                    for col in 0..3 {
                        if col == r {
                            continue;
                        }
                        minor[mr][mc] = self.at(row, col);
                        mc += 1;
                    }
                    mr += 1;
                }
                out.cols[c][r] =
                    sign * det2(minor[0][0], minor[0][1], minor[1][0], minor[1][1]) * inv_det;
            }
        }
        Some(out)
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = f32;

    /// Address by (row, col).
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.cols[col][row]
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            cols: [self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2]],
        }
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

/// 4x4 matrix; affine transforms in homogeneous coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    pub cols: [Vector4; 4],
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        cols: [Vector4::X, Vector4::Y, Vector4::Z, Vector4::W],
    };

    pub const ZERO: Self = Self {
        cols: [Vector4::ZERO; 4],
    };

    #[inline]
    pub const fn from_cols(c0: Vector4, c1: Vector4, c2: Vector4, c3: Vector4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Element at (row, col).
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    #[inline]
    pub fn col(&self, index: usize) -> Vector4 {
        self.cols[index]
    }

    #[inline]
    pub fn row(&self, index: usize) -> Vector4 {
        Vector4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    pub fn from_translation(translation: Vector3) -> Self {
        Self::from_cols(
            Vector4::X,
            Vector4::Y,
            Vector4::Z,
            Vector4::from_point(translation),
        )
    }

    pub fn from_scale(scale: Vector3) -> Self {
        Self::from_cols(
            Vector4::new(scale.x, 0.0, 0.0, 0.0),
            Vector4::new(0.0, scale.y, 0.0, 0.0),
            Vector4::new(0.0, 0.0, scale.z, 0.0),
            Vector4::W,
        )
    }

    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vector4::X,
            Vector4::new(0.0, c, s, 0.0),
            Vector4::new(0.0, -s, c, 0.0),
            Vector4::W,
        )
    }

    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vector4::new(c, 0.0, -s, 0.0),
            Vector4::Y,
            Vector4::new(s, 0.0, c, 0.0),
            Vector4::W,
        )
    }

    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vector4::new(c, s, 0.0, 0.0),
            Vector4::new(-s, c, 0.0, 0.0),
            Vector4::Z,
            Vector4::W,
        )
    }

    /// Combined rotation about all three axes: `Rz * Ry * Rx`.
    ///
    /// X is applied first, then Y, then Z (the crate-wide convention; see
    /// the module docs).
    pub fn from_euler(x: f32, y: f32, z: f32) -> Self {
        Self::from_rotation_z(z) * Self::from_rotation_y(y) * Self::from_rotation_x(x)
    }

    /// Embed a 3x3 rotation block.
    pub fn from_matrix3(m: &Matrix3) -> Self {
        Self::from_cols(
            Vector4::from_direction(m.cols[0]),
            Vector4::from_direction(m.cols[1]),
            Vector4::from_direction(m.cols[2]),
            Vector4::W,
        )
    }

    pub fn from_quaternion(q: Quaternion) -> Self {
        Self::from_matrix3(&q.to_matrix3())
    }

    /// The rotation block as a 3x3 matrix.
    pub fn rotation_block(&self) -> Matrix3 {
        Matrix3::from_cols(self.cols[0].xyz(), self.cols[1].xyz(), self.cols[2].xyz())
    }

    pub fn transpose(&self) -> Self {
        Self::from_cols(self.row(0), self.row(1), self.row(2), self.row(3))
    }

    /// 3x3 minor: determinant after deleting `row` and `col`.
    fn minor(&self, row: usize, col: usize) -> f32 {
        let mut m = [[0.0f32; 3]; 3];
        let mut mr = 0;
        for r in 0..4 {
            if r == row {
                continue;
            }
            let mut mc = 0;
            for c in 0..4 {
                if c == col {
                    continue;
                }
                m[mr][mc] = self.at(r, c);
                mc += 1;
            }
            mr += 1;
        }
        det3(&m)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        let mut det = 0.0;
        for c in 0..4 {
            let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
            det += sign * self.at(0, c) * self.minor(0, c);
        }
        det
    }

    /// Inverse by the adjugate, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let mut out = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                // The cofactor of (c, r) lands transposed at (r, c).
                out.cols[c][r] = sign * self.minor(c, r) * inv_det;
            }
        }
        Some(out)
    }

    /// Apply to a 3D point (w = 1, translation included).
    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (*self * Vector4::from_point(p)).xyz()
    }

    /// Apply to a 3D direction (w = 0, translation ignored).
    #[inline]
    pub fn transform_direction(&self, d: Vector3) -> Vector3 {
        (*self * Vector4::from_direction(d)).xyz()
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f32;

    /// Address by (row, col).
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.cols[col][row]
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            cols: [
                self * rhs.cols[0],
                self * rhs.cols[1],
                self * rhs.cols[2],
                self * rhs.cols[3],
            ],
        }
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;

    fn mul(self, v: Vector4) -> Vector4 {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z + self.cols[3] * v.w
    }
}
