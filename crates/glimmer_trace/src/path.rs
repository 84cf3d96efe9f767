//! Unidirectional Monte Carlo path tracing.
//!
//! Direct light via next-event estimation, indirect light via BSDF
//! sampling with Russian-roulette termination. Diffuse surfaces get
//! both passes; glossy surfaces only the indirect pass.

use glimmer_math::{Ray, Vec3};
use rand::RngCore;

use crate::{MaterialKind, Scene, EPSILON};

/// Radiance arriving along `ray`.
///
/// `depth` only tracks the recursion for the caller; termination is
/// purely Russian roulette.
pub fn cast_ray(scene: &Scene, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Vec3 {
    let inter = scene.intersect(ray);
    if !inter.happened {
        return Vec3::ZERO;
    }
    let m = match &inter.material {
        Some(m) => m.clone(),
        None => return Vec3::ZERO,
    };

    // rays that reach an emitter report its radiance directly; the
    // indirect pass below never recurses into emitters, so light is
    // not counted twice
    if m.has_emission() {
        return m.emission;
    }

    let mut l_dir = Vec3::ZERO;
    let mut l_indir = Vec3::ZERO;

    // direct illumination: sample a point on the emissive surfaces
    if m.kind == MaterialKind::Diffuse {
        if let Some((light, pdf_light)) = scene.sample_light(rng) {
            let to_light = light.point - inter.point;
            let to_light_dir = to_light.normalize_or_zero();

            // unoccluded when the shadow ray reaches (at least) the light
            let shadow = scene.intersect(&Ray::new(inter.point, to_light_dir));
            if shadow.distance - to_light.length() > -EPSILON {
                l_dir = light.emit
                    * m.eval(ray.direction, to_light_dir, inter.normal)
                    * to_light_dir.dot(inter.normal)
                    * (-to_light_dir).dot(light.normal)
                    / to_light.length_squared()
                    / pdf_light;
            }
        }
    }

    // indirect illumination: diffuse surfaces fall through into the
    // same pass glossy surfaces get
    if matches!(m.kind, MaterialKind::Diffuse | MaterialKind::Glossy)
        && crate::sampling::gen_f32(rng) <= scene.russian_roulette
    {
        let wo = m.sample(ray.direction, inter.normal, rng).normalize_or_zero();
        let next_ray = Ray::new(inter.point, wo);
        let next = scene.intersect(&next_ray);

        let next_emits = next
            .material
            .as_ref()
            .is_some_and(|nm| nm.has_emission());
        if next.happened && !next_emits {
            let pdf = m.pdf(ray.direction, wo, inter.normal);
            if pdf > EPSILON {
                l_indir = cast_ray(scene, &next_ray, depth + 1, rng)
                    * m.eval(ray.direction, wo, inter.normal)
                    * wo.dot(inter.normal)
                    / pdf
                    / scene.russian_roulette;
            }
        }
    }

    l_dir + l_indir
}
