//! Whitted-style recursive ray tracing (E [S*] (D|G) L).
//!
//! Mirrors and dielectrics recurse on the analytic reflection and
//! refraction directions, mixed by Fresnel reflectance; everything else
//! shades with the Phong model against the scene's point lights.

use glimmer_math::{Ray, Vec3};

use crate::material::{fresnel, reflect, refract};
use crate::{Light, MaterialKind, Scene, EPSILON};

/// Radiance arriving along `ray`, up to `scene.max_depth` bounces.
pub fn cast_ray(scene: &Scene, ray: &Ray, depth: u32) -> Vec3 {
    if depth > scene.max_depth {
        return Vec3::ZERO;
    }

    let inter = scene.intersect(ray);
    if !inter.happened {
        return scene.background_color;
    }
    let m = match &inter.material {
        Some(m) => m.clone(),
        None => return scene.background_color,
    };

    let hit_point = inter.point;
    let n = inter.normal;

    match m.kind {
        MaterialKind::ReflectionAndRefraction => {
            let reflection_dir = reflect(ray.direction, n).normalize_or_zero();
            // zero on total internal reflection; the Fresnel weight
            // below is 1 there, so the refracted branch contributes 0
            let refraction_dir = refract(ray.direction, n, m.ior).normalize_or_zero();

            let reflection_orig = offset_outside(hit_point, n, reflection_dir);
            let refraction_orig = offset_outside(hit_point, n, refraction_dir);

            let reflection_color =
                cast_ray(scene, &Ray::new(reflection_orig, reflection_dir), depth + 1);
            let refraction_color =
                cast_ray(scene, &Ray::new(refraction_orig, refraction_dir), depth + 1);

            let kr = fresnel(ray.direction, n, m.ior);
            reflection_color * kr + refraction_color * (1.0 - kr)
        }
        MaterialKind::Reflection => {
            let kr = fresnel(ray.direction, n, m.ior);
            let reflection_dir = reflect(ray.direction, n).normalize_or_zero();
            let reflection_orig = offset_outside(hit_point, n, reflection_dir);
            cast_ray(scene, &Ray::new(reflection_orig, reflection_dir), depth + 1) * kr
        }
        _ => {
            // Phong: diffuse and specular sums over the point lights
            let mut light_amt = Vec3::ZERO;
            let mut specular_color = Vec3::ZERO;
            let shadow_orig = offset_outside(hit_point, n, -ray.direction);

            for light in scene.lights() {
                let light = match light {
                    Light::Point(p) => p,
                    Light::Area(_) => continue,
                };

                let light_dir = light.position - hit_point;
                let light_distance2 = light_dir.length_squared();
                let light_dir = light_dir.normalize_or_zero();
                let l_dot_n = light_dir.dot(n).max(0.0);

                // occluded only if something sits between us and the light
                let shadow_hit = scene.intersect(&Ray::new(shadow_orig, light_dir));
                let in_shadow =
                    shadow_hit.happened && shadow_hit.distance * shadow_hit.distance < light_distance2;

                if !in_shadow {
                    light_amt += light.intensity * l_dot_n;
                }

                let reflection_dir = reflect(-light_dir, n);
                specular_color += (-reflection_dir.dot(ray.direction))
                    .max(0.0)
                    .powf(m.specular_exponent)
                    * light.intensity;
            }

            light_amt * (inter.diffuse_color * m.kd + specular_color * m.ks)
        }
    }
}

/// Nudge a ray origin off the surface, to the side the new direction
/// leaves through.
#[inline]
fn offset_outside(point: Vec3, n: Vec3, dir: Vec3) -> Vec3 {
    if dir.dot(n) < 0.0 {
        point - n * EPSILON
    } else {
        point + n * EPSILON
    }
}
