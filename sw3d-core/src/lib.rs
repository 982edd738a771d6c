//! SW3D core library: a software 3D rendering pipeline.
//!
//! Meshes defined in object-local space are carried through transform
//! composition, world-to-camera view conversion, near/far and screen
//! clipping, and perspective or orthographic projection into draw calls
//! on a pluggable 2D surface. Everything runs on the CPU, synchronously,
//! one frame per [`Camera::render`] call.

pub mod camera;
pub mod color;
pub mod error;
pub mod geometry;
pub mod math;
pub mod obj;
pub mod object;
pub mod projection;
pub mod scene;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, RenderMode};
pub use color::Color;
pub use error::{Error, Result};
pub use geometry::Mesh;
pub use math::{Matrix3, Matrix4, Quaternion, Vector2, Vector3, Vector4};
pub use object::{SceneObject, UpdateKind};
pub use projection::{Projection, ViewParams};
pub use scene::{ObjectHandle, Scene};
pub use surface::{DrawSurface, ImageSurface};
pub use transform::Transform;
