//! Indexed triangle mesh geometry.
//!
//! This is the buffer format an external loader (OBJ, glTF, ...) fills;
//! the renderers consume it without knowing where it came from.

use glimmer_math::{Aabb, Vec2, Vec3};

/// A mesh of vertex positions, optional normals and uvs, and triangle
/// index triples.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional; call `compute_normals` to generate)
    pub normals: Option<Vec<Vec3>>,

    /// Texture coordinates (optional; one Vec2 per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs: None,
            indices,
            bounds,
        }
    }

    /// Create a mesh that also carries texture coordinates.
    pub fn with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
    ) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs,
            indices,
            bounds,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }
        Aabb::from_points(min, max)
    }

    /// Compute smooth vertex normals by averaging the face normals of
    /// every face sharing a vertex. Faces wind counter-clockwise.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks(3) {
            if face.len() < 3 {
                continue;
            }

            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                log::warn!("mesh face references missing vertex, skipping");
                continue;
            }

            let edge1 = self.positions[i1] - self.positions[i0];
            let edge2 = self.positions[i2] - self.positions[i0];
            let face_normal = edge1.cross(edge2);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            let len = normal.length();
            if len > 1e-8 {
                *normal /= len;
            }
        }

        self.normals = Some(normals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2, 0, 2, 3],
            None,
        )
    }

    #[test]
    fn test_bounds_and_count() {
        let mesh = unit_quad();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.bounds.x.min, 0.0);
        assert_eq!(mesh.bounds.y.max, 1.0);
    }

    #[test]
    fn test_compute_normals_ccw() {
        let mut mesh = unit_quad();
        mesh.compute_normals();

        // CCW winding in the XY plane faces +Z.
        let normals = mesh.normals.as_ref().unwrap();
        for n in normals {
            assert!((n.z - 1.0).abs() < 1e-5, "normal {n:?} should be +Z");
        }
    }

    #[test]
    fn test_empty_mesh_bounds() {
        let mesh = Mesh::new(vec![], vec![], None);
        assert_eq!(mesh.bounds, Aabb::EMPTY);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
