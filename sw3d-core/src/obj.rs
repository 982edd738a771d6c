//! Wavefront OBJ parser for externally authored geometry.
//!
//! Supports the subset this renderer consumes: `v` vertex positions,
//! `f` polygonal faces (attribute references like `1/2/3` keep only the
//! position index, negative indices count back from the current vertex
//! list), and `l` polyline elements as explicit edges. Everything else
//! (`vn`, `vt`, groups, materials) is skipped. Malformed statements fail
//! the whole load; the returned [`Mesh`] satisfies the index-bounds
//! invariant by construction.

use std::path::Path;

use log::debug;
use nom::{
    character::complete::{char, digit1, multispace0, multispace1, space1},
    combinator::{opt, recognize},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{edges_from_faces, Mesh};
use crate::math::Vector3;

/// Read and parse an OBJ file; the mesh is named after the file stem.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "obj".to_string());
    parse_obj(&text, &name)
}

/// Parse OBJ text into a mesh.
pub fn parse_obj(input: &str, name: &str) -> Result<Mesh> {
    let mut vertices: Vec<Vector3> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();
    let mut polylines: Vec<Vec<usize>> = Vec::new();

    for (lineno, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword {
            "v" => {
                let v = parse_position(line).map_err(|_| statement_error(name, lineno, raw))?;
                vertices.push(v);
            }
            "f" => {
                let refs = parse_indices("f", line)
                    .map_err(|_| statement_error(name, lineno, raw))?;
                if refs.len() < 3 {
                    return Err(Error::MalformedGeometry(format!(
                        "obj '{}', line {}: face needs at least 3 vertices",
                        name,
                        lineno + 1
                    )));
                }
                let face = resolve_indices(name, lineno, &refs, vertices.len())?;
                faces.push(face);
            }
            "l" => {
                let refs = parse_indices("l", line)
                    .map_err(|_| statement_error(name, lineno, raw))?;
                if refs.len() < 2 {
                    return Err(Error::MalformedGeometry(format!(
                        "obj '{}', line {}: polyline needs at least 2 vertices",
                        name,
                        lineno + 1
                    )));
                }
                polylines.push(resolve_indices(name, lineno, &refs, vertices.len())?);
            }
            // Normals, texture coordinates, grouping, materials.
            _ => continue,
        }
    }

    let mut edges = edges_from_faces(&faces);
    for line in &polylines {
        for span in line.windows(2) {
            let (a, b) = (span[0], span[1]);
            if a != b {
                edges.push((a.min(b), a.max(b)));
            }
        }
    }
    edges.sort_unstable();
    edges.dedup();

    debug!(
        "obj '{}': {} vertices, {} faces, {} edges",
        name,
        vertices.len(),
        faces.len(),
        edges.len()
    );
    Mesh::new(name, vertices, faces, edges)
}

fn statement_error(name: &str, lineno: usize, raw: &str) -> Error {
    Error::MalformedGeometry(format!(
        "obj '{}', line {}: cannot parse '{}'",
        name,
        lineno + 1,
        raw.trim()
    ))
}

/// Map 1-based (or negative, relative) OBJ indices onto the vertex list.
fn resolve_indices(
    name: &str,
    lineno: usize,
    refs: &[i32],
    vertex_count: usize,
) -> Result<Vec<usize>> {
    refs.iter()
        .map(|&r| {
            let resolved = if r > 0 {
                Some((r - 1) as usize)
            } else if r < 0 {
                vertex_count.checked_sub(r.unsigned_abs() as usize)
            } else {
                None
            };
            match resolved {
                Some(i) if i < vertex_count => Ok(i),
                _ => Err(Error::MalformedGeometry(format!(
                    "obj '{}', line {}: vertex reference {} out of range (have {})",
                    name,
                    lineno + 1,
                    r,
                    vertex_count
                ))),
            }
        })
        .collect()
}

/// `v x y z` with an optional (ignored) w component.
fn parse_position(line: &str) -> std::result::Result<Vector3, ()> {
    fn inner(input: &str) -> IResult<&str, Vector3> {
        let (input, _) = char('v')(input)?;
        let (input, x) = preceded(space1, float)(input)?;
        let (input, y) = preceded(space1, float)(input)?;
        let (input, z) = preceded(space1, float)(input)?;
        let (input, _) = opt(preceded(space1, float))(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, Vector3::new(x, y, z)))
    }
    match inner(line) {
        Ok(("", v)) => Ok(v),
        _ => Err(()),
    }
}

/// `f 1 2 3`, `f 1/4/7 2/5/8 ...`, `l 1 2 ...`; keeps the leading
/// position index of each reference.
fn parse_indices(keyword: &'static str, line: &str) -> std::result::Result<Vec<i32>, ()> {
    fn index_ref(input: &str) -> IResult<&str, i32> {
        let (input, digits) = recognize(pair(opt(char('-')), digit1))(input)?;
        // Attribute references after the position index are skipped.
        let (input, _) = opt(recognize(pair(
            char('/'),
            nom::bytes::complete::take_while(|c: char| c.is_ascii_digit() || c == '/' || c == '-'),
        )))(input)?;
        match digits.parse::<i32>() {
            Ok(v) => Ok((input, v)),
            Err(_) => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            ))),
        }
    }
    fn inner<'a>(keyword: &'static str, input: &'a str) -> IResult<&'a str, Vec<i32>> {
        let (input, _) = nom::bytes::complete::tag(keyword)(input)?;
        let (input, refs) = preceded(multispace1, separated_list1(multispace1, index_ref))(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, refs))
    }
    match inner(keyword, line) {
        Ok(("", refs)) => Ok(refs),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# comment
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
";

    #[test]
    fn parses_a_minimal_triangle() {
        let mesh = parse_obj(TRIANGLE, "tri").unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces(), &[vec![0, 1, 2]]);
        assert_eq!(mesh.edges().len(), 3);
        assert_eq!(mesh.vertices()[1], Vector3::X);
    }

    #[test]
    fn accepts_attribute_references_and_negatives() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
f 1/1/1 2/2/2 3/3/3
f -3 -2 -1
";
        let mesh = parse_obj(text, "quadish").unwrap();
        assert_eq!(mesh.faces().len(), 2);
        assert_eq!(mesh.faces()[1], vec![1, 2, 3]);
    }

    #[test]
    fn polylines_become_edges() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
l 1 2 3
";
        let mesh = parse_obj(text, "line").unwrap();
        assert!(mesh.faces().is_empty());
        assert_eq!(mesh.edges(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn skips_unsupported_statements() {
        let text = "\
o thing
v 0 0 0
vn 0 0 1
vt 0.5 0.5
v 1 0 0
v 0 1 0
usemtl steel
f 1 2 3
";
        let mesh = parse_obj(text, "thing").unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        assert_eq!(mesh.faces().len(), 1);
    }

    #[test]
    fn rejects_out_of_range_face_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n";
        let err = parse_obj(text, "broken").unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }

    #[test]
    fn rejects_missing_position_component() {
        let text = "v 0 0\n";
        let err = parse_obj(text, "broken").unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }

    #[test]
    fn rejects_zero_index() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        let err = parse_obj(text, "broken").unwrap_err();
        assert!(matches!(err, Error::MalformedGeometry(_)));
    }
}
