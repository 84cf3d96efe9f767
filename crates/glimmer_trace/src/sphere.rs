//! Sphere primitive.

use std::f32::consts::PI;
use std::sync::Arc;

use glimmer_math::{Aabb, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::object::{Object, SurfaceProperties};
use crate::sampling::gen_f32;
use crate::{Intersection, Material, EPSILON};

pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    diffuse_color: Vec3,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let diffuse_color = material.kd;
        Self {
            center,
            radius,
            material,
            diffuse_color,
        }
    }

    /// Override the surface colour used by the Phong shader (defaults
    /// to the material's kd).
    pub fn with_diffuse_color(mut self, color: Vec3) -> Self {
        self.diffuse_color = color;
        self
    }
}

impl Object for Sphere {
    fn intersect(&self, ray: &Ray) -> Intersection {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return Intersection::miss();
        }
        let sqrtd = discriminant.sqrt();

        // nearest root past the self-intersection bias
        let mut root = (h - sqrtd) / a;
        if root <= EPSILON {
            root = (h + sqrtd) / a;
            if root <= EPSILON {
                return Intersection::miss();
            }
        }

        let point = ray.at(root);
        let props = self.surface_properties(point, Vec2::ZERO);
        Intersection {
            happened: true,
            point,
            normal: props.normal,
            uv: props.st,
            distance: root,
            emit: self.material.emission,
            diffuse_color: self.eval_diffuse_color(props.st),
            material: Some(self.material.clone()),
        }
    }

    fn surface_properties(&self, point: Vec3, _uv: Vec2) -> SurfaceProperties {
        SurfaceProperties {
            normal: (point - self.center).normalize(),
            st: Vec2::ZERO,
        }
    }

    fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    fn has_emit(&self) -> bool {
        self.material.has_emission()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        let theta = 2.0 * PI * gen_f32(rng);
        let phi = PI * gen_f32(rng);
        let dir = Vec3::new(
            phi.cos(),
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
        );

        let sample = Intersection {
            happened: true,
            point: self.center + self.radius * dir,
            normal: dir,
            uv: Vec2::ZERO,
            distance: 0.0,
            emit: self.material.emission,
            diffuse_color: self.diffuse_color,
            material: Some(self.material.clone()),
        };
        (sample, 1.0 / self.area())
    }

    fn eval_diffuse_color(&self, _uv: Vec2) -> Vec3 {
        self.diffuse_color
    }

    fn bounds(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(Material::diffuse(Vec3::splat(0.5))),
        )
    }

    #[test]
    fn test_sphere_hit_front() {
        let s = unit_sphere();
        let hit = s.intersect(&Ray::new(Vec3::ZERO, -Vec3::Z));
        assert!(hit.happened);
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside() {
        let s = unit_sphere();
        let hit = s.intersect(&Ray::new(Vec3::new(0.0, 0.0, -3.0), -Vec3::Z));
        assert!(hit.happened);
        assert!((hit.distance - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let s = unit_sphere();
        let hit = s.intersect(&Ray::new(Vec3::ZERO, Vec3::Y));
        assert!(!hit.happened);
        assert_eq!(hit.distance, f32::INFINITY);
    }

    #[test]
    fn test_sample_lies_on_surface() {
        let s = unit_sphere();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let (sample, pdf) = s.sample(&mut rng);
            let r = (sample.point - Vec3::new(0.0, 0.0, -3.0)).length();
            assert!((r - 1.0).abs() < 1e-4);
            assert!((pdf - 1.0 / s.area()).abs() < 1e-9);
        }
    }
}
