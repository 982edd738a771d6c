//! Mesh data and builtin primitive generators.
//!
//! A [`Mesh`] is immutable after construction: vertex positions in
//! object-local space, polygonal faces as vertex-index lists, and edges
//! as index pairs. Builtin primitives are defined in unit space (centered
//! at the origin, extents ±1) and sized through the consuming transform.

use log::debug;

use crate::error::{Error, Result};
use crate::math::Vector3;

/// Static geometry for one named object.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vector3>,
    faces: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl Mesh {
    /// Build a mesh, validating that every face and edge index is in
    /// range and every face has at least three vertices. Geometry
    /// problems surface here, at load time, never during rendering.
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vector3>,
        faces: Vec<Vec<usize>>,
        edges: Vec<(usize, usize)>,
    ) -> Result<Self> {
        let name = name.into();
        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::MalformedGeometry(format!(
                    "mesh '{}': face {} has {} vertices, need at least 3",
                    name,
                    fi,
                    face.len()
                )));
            }
            for &vi in face {
                if vi >= vertices.len() {
                    return Err(Error::MalformedGeometry(format!(
                        "mesh '{}': face {} references vertex {} of {}",
                        name,
                        fi,
                        vi,
                        vertices.len()
                    )));
                }
            }
        }
        for &(a, b) in &edges {
            if a >= vertices.len() || b >= vertices.len() {
                return Err(Error::MalformedGeometry(format!(
                    "mesh '{}': edge ({}, {}) references vertex beyond {}",
                    name,
                    a,
                    b,
                    vertices.len()
                )));
            }
        }
        debug!(
            "mesh '{}': {} vertices, {} faces, {} edges",
            name,
            vertices.len(),
            faces.len(),
            edges.len()
        );
        Ok(Self {
            name,
            vertices,
            faces,
            edges,
        })
    }

    /// Build a mesh whose edges are derived from its faces.
    pub fn with_derived_edges(
        name: impl Into<String>,
        vertices: Vec<Vector3>,
        faces: Vec<Vec<usize>>,
    ) -> Result<Self> {
        let edges = edges_from_faces(&faces);
        Self::new(name, vertices, faces, edges)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Axis-aligned unit cube: 8 vertices, 6 quad faces, 12 edges.
    pub fn cube() -> Self {
        let vertices = vec![
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(1.0, 1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
            Vector3::new(1.0, -1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-1.0, 1.0, 1.0),
        ];
        // Wound counter-clockwise seen from outside.
        let faces = vec![
            vec![0, 3, 2, 1], // back (-z)
            vec![4, 5, 6, 7], // front (+z)
            vec![0, 4, 7, 3], // left (-x)
            vec![1, 2, 6, 5], // right (+x)
            vec![0, 1, 5, 4], // bottom (-y)
            vec![3, 7, 6, 2], // top (+y)
        ];
        let edges = edges_from_faces(&faces);
        Self {
            name: "cube".into(),
            vertices,
            faces,
            edges,
        }
    }

    /// Regular tetrahedron inscribed in the unit cube.
    pub fn tetrahedron() -> Self {
        let vertices = vec![
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
        ];
        let faces = vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]];
        let edges = edges_from_faces(&faces);
        Self {
            name: "tetrahedron".into(),
            vertices,
            faces,
            edges,
        }
    }

    /// Line grid on the XZ plane: `divisions` cells per side, edges only.
    pub fn grid_floor(divisions: usize) -> Self {
        let n = divisions.max(1);
        let mut vertices = Vec::with_capacity((n + 1) * 4);
        let mut edges = Vec::with_capacity((n + 1) * 2);
        for i in 0..=n {
            let t = -1.0 + 2.0 * i as f32 / n as f32;
            // Line parallel to Z at x = t.
            vertices.push(Vector3::new(t, 0.0, -1.0));
            vertices.push(Vector3::new(t, 0.0, 1.0));
            edges.push((vertices.len() - 2, vertices.len() - 1));
            // Line parallel to X at z = t.
            vertices.push(Vector3::new(-1.0, 0.0, t));
            vertices.push(Vector3::new(1.0, 0.0, t));
            edges.push((vertices.len() - 2, vertices.len() - 1));
        }
        Self {
            name: "grid_floor".into(),
            vertices,
            faces: Vec::new(),
            edges,
        }
    }

    /// Frustum-shaped wireframe marking a camera's position and facing,
    /// apex at the origin opening toward +Z. Cosmetic only.
    pub fn camera_gizmo() -> Self {
        let vertices = vec![
            Vector3::ZERO,
            Vector3::new(-1.0, -0.75, 1.0),
            Vector3::new(1.0, -0.75, 1.0),
            Vector3::new(1.0, 0.75, 1.0),
            Vector3::new(-1.0, 0.75, 1.0),
        ];
        let edges = vec![
            (0, 1),
            (0, 2),
            (0, 3),
            (0, 4),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 1),
        ];
        Self {
            name: "camera_gizmo".into(),
            vertices,
            faces: Vec::new(),
            edges,
        }
    }
}

/// Derive edges from faces: consecutive vertex pairs per face, closing
/// the loop, normalized to (low, high) and deduplicated.
pub fn edges_from_faces(faces: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for face in faces {
        for i in 0..face.len() {
            let a = face[i];
            let b = face[(i + 1) % face.len()];
            if a != b {
                edges.push((a.min(b), a.max(b)));
            }
        }
    }
    edges.sort_unstable();
    edges.dedup();
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_expected_counts() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 6);
        assert_eq!(cube.edges().len(), 12);
        // Unit extents.
        for v in cube.vertices() {
            assert_eq!(v.x.abs(), 1.0);
            assert_eq!(v.y.abs(), 1.0);
            assert_eq!(v.z.abs(), 1.0);
        }
    }

    #[test]
    fn cube_faces_wind_outward() {
        let cube = Mesh::cube();
        for face in cube.faces() {
            let (a, b, c) = (
                cube.vertices()[face[0]],
                cube.vertices()[face[1]],
                cube.vertices()[face[2]],
            );
            let normal = (b - a).cross(c - a);
            let centroid = face
                .iter()
                .fold(Vector3::ZERO, |acc, &i| acc + cube.vertices()[i])
                * (1.0 / face.len() as f32);
            assert!(normal.dot(centroid) > 0.0, "face {face:?} winds inward");
        }
    }

    #[test]
    fn tetrahedron_has_expected_counts() {
        let tetra = Mesh::tetrahedron();
        assert_eq!(tetra.vertices().len(), 4);
        assert_eq!(tetra.faces().len(), 4);
        assert_eq!(tetra.edges().len(), 6);
    }

    #[test]
    fn derived_edges_close_the_loop() {
        let faces = vec![vec![0, 1, 2]];
        assert_eq!(edges_from_faces(&faces), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn shared_face_edges_are_deduplicated() {
        // Two triangles sharing edge (1, 2).
        let faces = vec![vec![0, 1, 2], vec![1, 3, 2]];
        let edges = edges_from_faces(&faces);
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn grid_floor_is_edges_only() {
        let grid = Mesh::grid_floor(4);
        assert!(grid.faces().is_empty());
        assert_eq!(grid.edges().len(), 10);
        assert_eq!(grid.vertices().len(), 20);
    }

    #[test]
    fn out_of_range_face_index_is_rejected() {
        let err = Mesh::with_derived_edges(
            "broken",
            vec![Vector3::ZERO, Vector3::X, Vector3::Y],
            vec![vec![0, 1, 3]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }

    #[test]
    fn short_face_is_rejected() {
        let err = Mesh::with_derived_edges(
            "broken",
            vec![Vector3::ZERO, Vector3::X],
            vec![vec![0, 1]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }

    #[test]
    fn out_of_range_edge_index_is_rejected() {
        let err = Mesh::new(
            "broken",
            vec![Vector3::ZERO, Vector3::X],
            Vec::new(),
            vec![(0, 2)],
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }
}
