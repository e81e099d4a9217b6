//! Flattened triangle geometry shared between scene nodes
use nalgebra::{Vector2, Vector3, Vector4};

/// Triangle soup with per-corner attributes.
///
/// The three arrays are index-aligned: entry `i` of `vertices`, `uvs` and
/// `normals` describe the same triangle corner, and every three consecutive
/// corners form one triangle. Positions carry `w = 1`, normals `w = 0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vector4<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub normals: Vec<Vector4<f32>>,
}

/// Borrowed view of one triangle inside a [`MeshData`]
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a> {
    pub vertices: &'a [Vector4<f32>],
    pub uvs: &'a [Vector2<f32>],
    pub normals: &'a [Vector4<f32>],
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
            uvs: Vec::with_capacity(triangles * 3),
            normals: Vec::with_capacity(triangles * 3),
        }
    }

    /// Append one triangle corner
    pub fn push_corner(&mut self, position: Vector4<f32>, uv: Vector2<f32>, normal: Vector4<f32>) {
        self.vertices.push(position);
        self.uvs.push(uv);
        self.normals.push(normal);
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle<'_>> {
        let start = index * 3;
        if start + 3 > self.vertices.len() {
            return None;
        }
        Some(Triangle {
            vertices: &self.vertices[start..start + 3],
            uvs: &self.uvs[start..start + 3],
            normals: &self.normals[start..start + 3],
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle<'_>> {
        self.vertices
            .chunks_exact(3)
            .zip(self.uvs.chunks_exact(3))
            .zip(self.normals.chunks_exact(3))
            .map(|((vertices, uvs), normals)| Triangle {
                vertices,
                uvs,
                normals,
            })
    }
}

impl Triangle<'_> {
    /// Calculate the face normal from the triangle's positions
    pub fn face_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].xyz();
        let v1 = self.vertices[1].xyz();
        let v2 = self.vertices[2].xyz();

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }
}
