//! Triangle primitive, intersected with Möller-Trumbore.

use std::sync::Arc;

use glimmer_math::{Aabb, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::object::{Object, SurfaceProperties};
use crate::sampling::gen_f32;
use crate::{Intersection, Material, EPSILON};

/// A single triangle with vertices in counter-clockwise order.
///
/// The face normal follows the winding; rays arriving from behind the
/// face are culled, which also keeps a surface from shadowing itself.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Cached edges v1-v0 and v2-v0
    e1: Vec3,
    e2: Vec3,
    /// Texture coordinates at each vertex
    st: [Vec2; 3],
    normal: Vec3,
    area: f32,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let cross = e1.cross(e2);
        Self {
            v0,
            v1,
            v2,
            e1,
            e2,
            st: [Vec2::ZERO; 3],
            normal: cross.normalize_or_zero(),
            area: cross.length() * 0.5,
            material,
        }
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_st(mut self, st: [Vec2; 3]) -> Self {
        self.st = st;
        self
    }

    fn interpolate_st(&self, u: f32, v: f32) -> Vec2 {
        self.st[0] * (1.0 - u - v) + self.st[1] * u + self.st[2] * v
    }
}

impl Object for Triangle {
    fn intersect(&self, ray: &Ray) -> Intersection {
        // back-face cull: the face is only visible from its front side
        if ray.direction.dot(self.normal) > 0.0 {
            return Intersection::miss();
        }

        let pvec = ray.direction.cross(self.e2);
        let det = self.e1.dot(pvec);
        if det.abs() < 1e-8 {
            return Intersection::miss();
        }

        let det_inv = 1.0 / det;
        let tvec = ray.origin - self.v0;
        let u = tvec.dot(pvec) * det_inv;
        if !(0.0..=1.0).contains(&u) {
            return Intersection::miss();
        }

        let qvec = tvec.cross(self.e1);
        let v = ray.direction.dot(qvec) * det_inv;
        if v < 0.0 || u + v > 1.0 {
            return Intersection::miss();
        }

        let t = self.e2.dot(qvec) * det_inv;
        if t <= EPSILON {
            return Intersection::miss();
        }

        let point = ray.at(t);
        let props = self.surface_properties(point, Vec2::new(u, v));
        Intersection {
            happened: true,
            point,
            normal: props.normal,
            uv: props.st,
            distance: t,
            emit: self.material.emission,
            diffuse_color: self.eval_diffuse_color(props.st),
            material: Some(self.material.clone()),
        }
    }

    fn surface_properties(&self, _point: Vec3, uv: Vec2) -> SurfaceProperties {
        SurfaceProperties {
            normal: self.normal,
            st: self.interpolate_st(uv.x, uv.y),
        }
    }

    fn area(&self) -> f32 {
        self.area
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        // uniform over the triangle via the sqrt warp
        let x = gen_f32(rng).sqrt();
        let y = gen_f32(rng);

        let point = self.v0 * (1.0 - x) + self.v1 * (x * (1.0 - y)) + self.v2 * (x * y);
        let sample = Intersection {
            happened: true,
            point,
            normal: self.normal,
            uv: Vec2::ZERO,
            distance: 0.0,
            emit: self.material.emission,
            diffuse_color: self.material.kd,
            material: Some(self.material.clone()),
        };
        (sample, 1.0 / self.area)
    }

    fn eval_diffuse_color(&self, _uv: Vec2) -> Vec3 {
        self.material.kd
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.v0.min(self.v1).min(self.v2), self.v0.max(self.v1).max(self.v2))
    }
}
