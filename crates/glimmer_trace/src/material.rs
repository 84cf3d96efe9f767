//! Surface materials and the dielectric helper functions.

use std::f32::consts::PI;

use glimmer_math::Vec3;
use rand::RngCore;

use crate::sampling::{gen_f32, to_world, uniform_hemisphere};

/// The closed set of material behaviours the integrators dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Diffuse,
    Glossy,
    Reflection,
    ReflectionAndRefraction,
}

/// Material parameters shared by both integrators.
///
/// `kd`/`ks` weight the diffuse and specular terms; `emission` is the
/// radiance of area lights. All colours live in linear [0, 1] space.
#[derive(Debug, Clone)]
pub struct Material {
    pub kind: MaterialKind,
    /// Refractive index (used by the reflection/refraction kinds)
    pub ior: f32,
    /// Diffuse coefficient / albedo
    pub kd: Vec3,
    /// Specular coefficient
    pub ks: Vec3,
    /// Phong specular exponent
    pub specular_exponent: f32,
    /// Emitted radiance
    pub emission: Vec3,
}

impl Material {
    pub fn new(kind: MaterialKind, emission: Vec3) -> Self {
        Self {
            kind,
            ior: 1.3,
            kd: Vec3::splat(0.8),
            ks: Vec3::splat(0.2),
            specular_exponent: 25.0,
            emission,
        }
    }

    /// A plain diffuse surface with the given albedo.
    pub fn diffuse(kd: Vec3) -> Self {
        Self::new(MaterialKind::Diffuse, Vec3::ZERO).with_kd(kd)
    }

    /// A diffuse area-light surface.
    pub fn emissive(kd: Vec3, emission: Vec3) -> Self {
        Self::new(MaterialKind::Diffuse, emission).with_kd(kd)
    }

    pub fn with_kd(mut self, kd: Vec3) -> Self {
        self.kd = kd;
        self
    }

    pub fn with_ks(mut self, ks: Vec3) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }

    pub fn with_specular_exponent(mut self, exponent: f32) -> Self {
        self.specular_exponent = exponent;
        self
    }

    pub fn has_emission(&self) -> bool {
        self.emission.length() > 1e-6
    }

    /// BSDF value for incident direction `wi` (pointing into the
    /// surface), outgoing direction `wo`, and normal `n`.
    pub fn eval(&self, wi: Vec3, wo: Vec3, n: Vec3) -> Vec3 {
        match self.kind {
            MaterialKind::Diffuse => {
                // energy-conserving Lambertian
                if wo.dot(n) > 0.0 {
                    self.kd / PI
                } else {
                    Vec3::ZERO
                }
            }
            MaterialKind::Glossy => {
                // diffuse lobe plus a normalized Phong specular lobe
                if wo.dot(n) > 0.0 {
                    let r = reflect(wi, n);
                    let spec = r.dot(wo).max(0.0).powf(self.specular_exponent);
                    self.kd / PI
                        + self.ks * (self.specular_exponent + 2.0) / (2.0 * PI) * spec
                } else {
                    Vec3::ZERO
                }
            }
            // Perfect mirrors and dielectrics are handled analytically
            // by the Whitted integrator, not sampled through the BSDF.
            _ => Vec3::ZERO,
        }
    }

    /// Sample an outgoing direction for incident `wi` about normal `n`.
    pub fn sample(&self, _wi: Vec3, n: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        match self.kind {
            MaterialKind::Diffuse | MaterialKind::Glossy => {
                let local = uniform_hemisphere(gen_f32(rng), gen_f32(rng));
                to_world(local, n)
            }
            _ => Vec3::ZERO,
        }
    }

    /// Probability density of `sample` having produced `wo`.
    pub fn pdf(&self, _wi: Vec3, wo: Vec3, n: Vec3) -> f32 {
        match self.kind {
            MaterialKind::Diffuse | MaterialKind::Glossy => {
                if wo.dot(n) > 0.0 {
                    0.5 / PI
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }
}

/// Mirror reflection of `i` about `n`.
#[inline]
pub fn reflect(i: Vec3, n: Vec3) -> Vec3 {
    i - 2.0 * i.dot(n) * n
}

/// Refraction of `i` through a surface with normal `n` and index `ior`,
/// by Snell's law. When the ray starts inside the medium (cos > 0) the
/// indices swap and the normal flips. Returns zero on total internal
/// reflection.
pub fn refract(i: Vec3, n: Vec3, ior: f32) -> Vec3 {
    let mut cosi = i.dot(n).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, ior);
    let mut normal = n;
    if cosi < 0.0 {
        cosi = -cosi;
    } else {
        std::mem::swap(&mut etai, &mut etat);
        normal = -n;
    }
    let eta = etai / etat;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * i + (eta * cosi - k.sqrt()) * normal
    }
}

/// Fresnel reflectance of a dielectric interface: the fraction of
/// incident light reflected for view direction `i`, normal `n`, and
/// refractive index `ior`. Total internal reflection yields 1.
pub fn fresnel(i: Vec3, n: Vec3, ior: f32) -> f32 {
    let cosi = i.dot(n).clamp(-1.0, 1.0);
    let (mut etai, mut etat) = (1.0, ior);
    if cosi > 0.0 {
        std::mem::swap(&mut etai, &mut etat);
    }
    let sint = etai / etat * (1.0 - cosi * cosi).max(0.0).sqrt();
    if sint >= 1.0 {
        return 1.0;
    }

    let cost = (1.0 - sint * sint).max(0.0).sqrt();
    let cosi = cosi.abs();
    let rs = ((etat * cosi) - (etai * cost)) / ((etat * cosi) + (etai * cost));
    let rp = ((etai * cosi) - (etat * cost)) / ((etai * cosi) + (etat * cost));
    (rs * rs + rp * rp) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reflect_mirrors_about_normal() {
        let i = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(i, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_fresnel_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let i = crate::sampling::uniform_hemisphere(
                crate::sampling::gen_f32(&mut rng),
                crate::sampling::gen_f32(&mut rng),
            ) * -1.0;
            let kr = fresnel(i, Vec3::Z, 1.5);
            assert!((0.0..=1.0).contains(&kr), "kr = {kr}");
        }
    }

    #[test]
    fn test_fresnel_matched_index_reflects_nothing() {
        let i = Vec3::new(0.3, -0.8, 0.1).normalize();
        let kr = fresnel(i, Vec3::Y, 1.0);
        assert!(kr.abs() < 1e-5, "kr = {kr}");
    }

    #[test]
    fn test_total_internal_reflection() {
        // leaving glass at a grazing angle: sin(t) > 1
        let i = Vec3::new(0.95, 0.3122, 0.0).normalize();
        let kr = fresnel(i, Vec3::Y, 1.5);
        assert_eq!(kr, 1.0);
        assert_eq!(refract(i, Vec3::Y, 1.5), Vec3::ZERO);
    }

    #[test]
    fn test_refract_straight_through() {
        let i = -Vec3::Y;
        let t = refract(i, Vec3::Y, 1.5);
        assert!((t - i).length() < 1e-6);
    }

    #[test]
    fn test_diffuse_eval_hemisphere() {
        let m = Material::diffuse(Vec3::splat(0.7));
        let wi = -Vec3::Y;

        let above = m.eval(wi, Vec3::Y, Vec3::Y);
        assert!((above - Vec3::splat(0.7) / PI).length() < 1e-6);

        let below = m.eval(wi, -Vec3::Y, Vec3::Y);
        assert_eq!(below, Vec3::ZERO);
    }

    #[test]
    fn test_sample_stays_above_surface() {
        let m = Material::diffuse(Vec3::splat(0.5));
        let n = Vec3::new(0.3, 0.9, -0.2).normalize();
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..500 {
            let wo = m.sample(-Vec3::Y, n, &mut rng);
            assert!(wo.dot(n) >= -1e-5);
            assert!(m.pdf(-Vec3::Y, wo, n) > 0.0 || wo.dot(n).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pdf_is_uniform_hemisphere() {
        let m = Material::diffuse(Vec3::splat(0.5));
        assert!((m.pdf(-Vec3::Y, Vec3::Y, Vec3::Y) - 0.5 / PI).abs() < 1e-7);
        assert_eq!(m.pdf(-Vec3::Y, -Vec3::Y, Vec3::Y), 0.0);
    }
}
