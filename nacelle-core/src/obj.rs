//! Loader for the line-oriented text mesh format.
//!
//! Recognised directives:
//!
//! ```text
//! v  x y z                     position (w = 1)
//! vt u v                       texture coordinate
//! vn x y z                     normal (w = 0)
//! f  v/t/n v/t/n v/t/n         triangle, 1-based indices
//! ```
//!
//! Every other line is skipped. Faces are expanded into flat per-corner
//! arrays once the whole file has been read.
use log::debug;
use nalgebra::{Vector2, Vector4};
use nom::{
    character::complete::u32 as index,
    combinator::all_consuming,
    number::complete::float,
    IResult,
};
use std::fs;
use std::path::Path;

use crate::error::MeshError;
use crate::geometry::MeshData;

const MISSING_TOKEN: &str = "<end of line>";

/// One `f` directive: three `[vertex, uv, normal]` index triples, still 1-based
struct Face {
    line: usize,
    corners: [[u32; 3]; 3],
}

/// Read and parse a mesh file
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<MeshData, MeshError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| MeshError::AssetNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_mesh_bytes(&bytes)?;
    debug!(
        "loaded mesh {} ({} triangles)",
        path.display(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse mesh text that is already in memory
pub fn parse_mesh(input: &str) -> Result<MeshData, MeshError> {
    parse_mesh_bytes(input.as_bytes())
}

/// Parse raw mesh file contents.
///
/// Only directive lines have to be UTF-8; comments and unknown lines may hold
/// any bytes.
pub fn parse_mesh_bytes(input: &[u8]) -> Result<MeshData, MeshError> {
    let mut positions: Vec<Vector4<f32>> = Vec::new();
    let mut uvs: Vec<Vector2<f32>> = Vec::new();
    let mut normals: Vec<Vector4<f32>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (number, raw) in input.split(|&b| b == b'\n').enumerate() {
        let line = number + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);

        if let Some(rest) = raw.strip_prefix(b"v ") {
            let [x, y, z] = parse_floats::<3>(decode(rest, line)?, line)?;
            positions.push(Vector4::new(x, y, z, 1.0));
        } else if let Some(rest) = raw.strip_prefix(b"vt ") {
            let [u, v] = parse_floats::<2>(decode(rest, line)?, line)?;
            uvs.push(Vector2::new(u, v));
        } else if let Some(rest) = raw.strip_prefix(b"vn ") {
            let [x, y, z] = parse_floats::<3>(decode(rest, line)?, line)?;
            normals.push(Vector4::new(x, y, z, 0.0));
        } else if let Some(rest) = raw.strip_prefix(b"f ") {
            faces.push(parse_face(decode(rest, line)?, line)?);
        }
    }

    let mut mesh = MeshData::with_capacity(faces.len());
    for face in &faces {
        for [v, t, n] in face.corners {
            mesh.push_corner(
                *lookup(&positions, v, face.line, "vertex")?,
                *lookup(&uvs, t, face.line, "texture coordinate")?,
                *lookup(&normals, n, face.line, "normal")?,
            );
        }
    }

    Ok(mesh)
}

/// Directive arguments as text; the first token that is not UTF-8 is a parse error
fn decode(rest: &[u8], line: usize) -> Result<&str, MeshError> {
    std::str::from_utf8(rest).map_err(|_| {
        let token = rest
            .split(|b| b.is_ascii_whitespace())
            .find(|token| std::str::from_utf8(token).is_err())
            .unwrap_or(rest);
        MeshError::Parse {
            line,
            token: String::from_utf8_lossy(token).into_owned(),
        }
    })
}

/// Parse the first `N` whitespace separated floats; extra tokens are ignored
fn parse_floats<const N: usize>(rest: &str, line: usize) -> Result<[f32; N], MeshError> {
    let mut tokens = rest.split_whitespace();
    let mut values = [0.0f32; N];
    for value in &mut values {
        let token = tokens.next().unwrap_or(MISSING_TOKEN);
        *value = parse_float(token, line)?;
    }
    Ok(values)
}

fn parse_float(token: &str, line: usize) -> Result<f32, MeshError> {
    let result: IResult<&str, f32> = all_consuming(float)(token);
    result.map(|(_, value)| value).map_err(|_| MeshError::Parse {
        line,
        token: token.to_string(),
    })
}

fn parse_index(token: &str, line: usize) -> Result<u32, MeshError> {
    let result: IResult<&str, u32> = all_consuming(index)(token);
    result.map(|(_, value)| value).map_err(|_| MeshError::Parse {
        line,
        token: token.to_string(),
    })
}

fn parse_face(rest: &str, line: usize) -> Result<Face, MeshError> {
    let groups: Vec<&str> = rest.split_whitespace().collect();
    if groups.len() != 3 {
        return Err(MeshError::MalformedFace {
            line,
            reason: format!("expected 3 vertices, found {}", groups.len()),
        });
    }

    let mut corners = [[0u32; 3]; 3];
    for (corner, group) in corners.iter_mut().zip(&groups) {
        let fields: Vec<&str> = group.split('/').collect();
        if fields.len() != 3 || fields.iter().any(|field| field.is_empty()) {
            return Err(MeshError::MalformedFace {
                line,
                reason: format!("'{}' is not a vertex/uv/normal triple", group),
            });
        }
        for (slot, field) in corner.iter_mut().zip(&fields) {
            *slot = parse_index(field, line)?;
        }
    }

    Ok(Face { line, corners })
}

fn lookup<'a, T>(
    items: &'a [T],
    one_based: u32,
    line: usize,
    what: &str,
) -> Result<&'a T, MeshError> {
    (one_based as usize)
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or_else(|| MeshError::MalformedFace {
            line,
            reason: format!(
                "{} index {} out of range (1..={})",
                what,
                one_based,
                items.len()
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TRIANGLE: &str = "\
# a single triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.0 0.0
vt 1.0 0.0
vn 0 0 1
f 1/1/1 2/2/1 3/1/1
";

    const QUAD: &str = "\
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
s off
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
";

    #[test]
    fn test_flattened_counts_and_w() {
        let mesh = parse_mesh(QUAD).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.uvs.len(), 6);
        assert_eq!(mesh.normals.len(), 6);
        assert!(mesh.vertices.iter().all(|v| v.w == 1.0));
        assert!(mesh.normals.iter().all(|n| n.w == 0.0));
    }

    #[test]
    fn test_face_index_order() {
        let mesh = parse_mesh(TRIANGLE).unwrap();
        assert_eq!(mesh.vertices[0], Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(mesh.vertices[1], Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(mesh.vertices[2], Vector4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(mesh.uvs[1], Vector2::new(1.0, 0.0));
        assert_eq!(mesh.normals[2], Vector4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn test_no_shared_vertex_dedup() {
        let mesh = parse_mesh(QUAD).unwrap();
        // Corner 1 is referenced by both triangles and appears twice
        assert_eq!(mesh.vertices[0], mesh.vertices[3]);
        assert_eq!(mesh.vertices[2], mesh.vertices[4]);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let text = "v 1 2 3 0.5\nvt 0.25 0.75 0\nvn 0 1 0\nf 1/1/1 1/1/1 1/1/1\n";
        let mesh = parse_mesh(text).unwrap();
        assert_eq!(mesh.vertices[0], Vector4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(mesh.uvs[0], Vector2::new(0.25, 0.75));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = TRIANGLE.replace('\n', "\r\n");
        let mesh = parse_mesh(&text).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let mesh = parse_mesh("# nothing here\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_parse_error_reports_line_and_token() {
        let text = "v 0 0 0\nv 1 abc 0\n";
        match parse_mesh(text) {
            Err(MeshError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_component_is_parse_error() {
        match parse_mesh("vn 0 1\n") {
            Err(MeshError::Parse { line, token }) => {
                assert_eq!(line, 1);
                assert_eq!(token, MISSING_TOKEN);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_face_index() {
        let text = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/x/1 3/1/1\n";
        assert!(matches!(
            parse_mesh(text),
            Err(MeshError::Parse { line: 4, ref token }) if token == "x"
        ));
    }

    #[test]
    fn test_quad_face_is_malformed() {
        let text = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1/1/1 1/1/1 1/1/1\n";
        assert!(matches!(
            parse_mesh(text),
            Err(MeshError::MalformedFace { line: 4, .. })
        ));
    }

    #[test]
    fn test_missing_uv_index_is_malformed() {
        let text = "v 0 0 0\nvn 0 0 1\nf 1//1 1//1 1//1\n";
        assert!(matches!(
            parse_mesh(text),
            Err(MeshError::MalformedFace { line: 3, .. })
        ));
    }

    #[test]
    fn test_out_of_range_index_is_malformed() {
        let text = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 1/1/1\n";
        assert!(matches!(
            parse_mesh(text),
            Err(MeshError::MalformedFace { line: 4, .. })
        ));

        let zero = "v 0 0 0\nvt 0 0\nvn 0 0 1\nf 0/1/1 1/1/1 1/1/1\n";
        assert!(matches!(
            parse_mesh(zero),
            Err(MeshError::MalformedFace { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(QUAD.as_bytes()).unwrap();

        let mesh = load_mesh(file.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_latin1_comment_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Cr\xe9\xe9 par Blender\n").unwrap();
        file.write_all(TRIANGLE.as_bytes()).unwrap();

        let mesh = load_mesh(file.path()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_invalid_utf8_in_directive_is_parse_error() {
        let input = b"v 0 0 0\nv 1 \xff 0\n";
        match parse_mesh_bytes(input) {
            Err(MeshError::Parse { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "\u{fffd}");
            }
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.obj");

        match load_mesh(&path) {
            Err(MeshError::AssetNotFound { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected AssetNotFound, got {:?}", other),
        }
    }
}
