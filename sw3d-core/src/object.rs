//! Scene objects: a transform bound to a mesh plus world-space caches.

use log::trace;

use crate::geometry::Mesh;
use crate::math::{Quaternion, Vector3};
use crate::transform::Transform;

/// Which transform component changed, so a resync can skip work that
/// the change cannot have affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    Position,
    Rotation,
    Scale,
    All,
}

/// One renderable: a mesh, its transform, and the world-space vertex and
/// face-normal caches the renderer reads. Every primitive kind (cube,
/// tetrahedron, grid floor, loaded OBJ, camera gizmo) is this one
/// concrete type.
#[derive(Debug, Clone)]
pub struct SceneObject {
    transform: Transform,
    mesh: Mesh,
    world_vertices: Vec<Vector3>,
    world_normals: Vec<Option<Vector3>>,
    /// Read by the renderer to pick the highlight pen; never consulted
    /// by the object itself.
    pub selected: bool,
}

impl SceneObject {
    pub fn new(mesh: Mesh) -> Self {
        Self::with_transform(mesh, Transform::identity())
    }

    pub fn with_transform(mesh: Mesh, transform: Transform) -> Self {
        let mut object = Self {
            transform,
            mesh,
            world_vertices: Vec::new(),
            world_normals: Vec::new(),
            selected: false,
        };
        object.resync(UpdateKind::All);
        object
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Direct mutable access to the transform. The world-space caches go
    /// stale until [`Self::resync`] is called; prefer the setter methods,
    /// which pair the two.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Mesh vertices evaluated in world space under the current
    /// transform.
    pub fn world_vertices(&self) -> &[Vector3] {
        &self.world_vertices
    }

    /// Unit face normals in world space, `None` where the face is
    /// degenerate (zero area) and must be skipped by the renderer.
    pub fn world_normals(&self) -> &[Option<Vector3>] {
        &self.world_normals
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Re-evaluate the world-space caches from the current transform.
    ///
    /// Every vertex becomes `rotation · (vertex * scale) + position`.
    /// Face normals are recomputed only when `kind` includes a rotation
    /// change: translation moves every vertex equally and symmetric
    /// scaling preserves facet orientation, so neither affects them.
    pub fn resync(&mut self, kind: UpdateKind) {
        let transform = self.transform;
        self.world_vertices.clear();
        self.world_vertices.extend(
            self.mesh
                .vertices()
                .iter()
                .map(|&v| transform.transform_point(v)),
        );
        if matches!(kind, UpdateKind::Rotation | UpdateKind::All) {
            self.world_normals.clear();
            let mut degenerate = 0usize;
            for face in self.mesh.faces() {
                let a = self.world_vertices[face[0]];
                let b = self.world_vertices[face[1]];
                let c = self.world_vertices[face[2]];
                let normal = (b - a).cross(c - a).try_normalize();
                if normal.is_none() {
                    degenerate += 1;
                }
                self.world_normals.push(normal);
            }
            if degenerate > 0 {
                trace!(
                    "mesh '{}': {} degenerate face normal(s)",
                    self.mesh.name(),
                    degenerate
                );
            }
        }
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.transform.set_position(position);
        self.resync(UpdateKind::Position);
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.transform.set_rotation(rotation);
        self.resync(UpdateKind::Rotation);
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.transform.set_scale(scale);
        self.resync(UpdateKind::Scale);
    }

    pub fn rotate(&mut self, delta: Quaternion) {
        self.transform.rotate(delta);
        self.resync(UpdateKind::Rotation);
    }

    pub fn rotate_axis_angle(&mut self, axis: Vector3, angle: f32) {
        self.transform.rotate_axis_angle(axis, angle);
        self.resync(UpdateKind::Rotation);
    }
}
