//! Composite triangle-mesh object with its own internal BVH.

use std::sync::Arc;

use glimmer_core::Mesh;
use glimmer_math::{Aabb, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::object::{Object, ObjectRef, SurfaceProperties};
use crate::sampling::gen_f32;
use crate::{Bvh, Intersection, Material, Triangle};

/// A triangle mesh that intersects through a per-mesh BVH and samples
/// its surface area-uniformly (meshes can be area lights).
pub struct MeshTriangle {
    triangles: Vec<Arc<Triangle>>,
    bvh: Bvh,
    bounds: Aabb,
    area: f32,
    material: Arc<Material>,
}

impl MeshTriangle {
    /// Build from raw position/index buffers.
    pub fn new(positions: &[Vec3], indices: &[u32], material: Arc<Material>) -> Self {
        Self::assemble(positions, indices, None, material)
    }

    /// Build from a loaded [`Mesh`], carrying its texture coordinates.
    pub fn from_mesh(mesh: &Mesh, material: Arc<Material>) -> Self {
        Self::assemble(
            &mesh.positions,
            &mesh.indices,
            mesh.uvs.as_deref(),
            material,
        )
    }

    fn assemble(
        positions: &[Vec3],
        indices: &[u32],
        uvs: Option<&[Vec2]>,
        material: Arc<Material>,
    ) -> Self {
        let triangles: Vec<Arc<Triangle>> = indices
            .chunks_exact(3)
            .map(|face| {
                let (i0, i1, i2) = (face[0] as usize, face[1] as usize, face[2] as usize);
                let mut tri =
                    Triangle::new(positions[i0], positions[i1], positions[i2], material.clone());
                if let Some(uvs) = uvs {
                    tri = tri.with_st([uvs[i0], uvs[i1], uvs[i2]]);
                }
                Arc::new(tri)
            })
            .collect();

        let bounds = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| Aabb::surrounding(&acc, &t.bounds()));
        let area = triangles.iter().map(|t| t.area()).sum();
        let bvh = Bvh::build(triangles.iter().map(|t| t.clone() as ObjectRef).collect());

        Self {
            triangles,
            bvh,
            bounds,
            area,
            material,
        }
    }
}

impl Object for MeshTriangle {
    fn intersect(&self, ray: &Ray) -> Intersection {
        let mut hit = self.bvh.intersect(ray);
        if hit.happened {
            // surface colour is a mesh-level property
            hit.diffuse_color = self.eval_diffuse_color(hit.uv);
        }
        hit
    }

    fn surface_properties(&self, _point: Vec3, uv: Vec2) -> SurfaceProperties {
        SurfaceProperties {
            normal: Vec3::ZERO,
            st: uv,
        }
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        if self.triangles.is_empty() {
            return (Intersection::miss(), 0.0);
        }

        // pick a triangle in proportion to its area, then sample it
        let p = gen_f32(rng) * self.area;
        let mut running = 0.0;
        for tri in &self.triangles {
            running += tri.area();
            if p <= running {
                let (sample, _) = tri.sample(rng);
                return (sample, 1.0 / self.area);
            }
        }
        // float accumulation can leave p just past the last triangle
        let (sample, _) = self.triangles[self.triangles.len() - 1].sample(rng);
        (sample, 1.0 / self.area)
    }

    /// Checkerboard pattern in texture space (nearest lookup).
    fn eval_diffuse_color(&self, uv: Vec2) -> Vec3 {
        let scale = 5.0;
        let a = (uv.x * scale).rem_euclid(1.0) > 0.5;
        let b = (uv.y * scale).rem_euclid(1.0) > 0.5;
        if a ^ b {
            Vec3::new(0.937, 0.937, 0.231)
        } else {
            Vec3::new(0.815, 0.235, 0.031)
        }
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_quad(material: Arc<Material>) -> MeshTriangle {
        MeshTriangle::new(
            &[
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            &[0, 1, 2, 0, 2, 3],
            material,
        )
    }

    #[test]
    fn test_mesh_intersect_through_bvh() {
        let mesh = unit_quad(Arc::new(Material::diffuse(Vec3::splat(0.7))));
        let hit = mesh.intersect(&Ray::new(Vec3::new(0.2, 0.3, 3.0), -Vec3::Z));
        assert!(hit.happened);
        assert!((hit.distance - 3.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_mesh_area_sums_triangles() {
        let mesh = unit_quad(Arc::new(Material::diffuse(Vec3::splat(0.7))));
        assert!((mesh.area() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_emissive_mesh_samples_with_mesh_pdf() {
        let light = Arc::new(Material::emissive(Vec3::splat(0.65), Vec3::splat(10.0)));
        let mesh = unit_quad(light);
        assert!(mesh.has_emit());

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let (sample, pdf) = mesh.sample(&mut rng);
            assert!(sample.point.z.abs() < 1e-5);
            assert!((pdf - 1.0 / 4.0).abs() < 1e-5);
            assert_eq!(sample.emit, Vec3::splat(10.0));
        }
    }
}
