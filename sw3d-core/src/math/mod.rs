//! Linear-algebra kernel: vectors, matrices, quaternions.
//!
//! Pure value types with no dependencies. Conventions are fixed
//! crate-wide: column-major matrices, column vectors (`M * v`), combined
//! Euler rotation `Rz * Ry * Rx`.

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use matrix::{Matrix3, Matrix4};
pub use quaternion::Quaternion;
pub use vector::{Vector2, Vector3, Vector4};

/// Threshold below which magnitudes, determinants, and dot products are
/// treated as degenerate.
pub const EPSILON: f32 = 1e-6;
