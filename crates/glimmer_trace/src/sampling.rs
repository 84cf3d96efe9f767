//! Random sampling helpers shared by the materials and objects.

use glimmer_math::Vec3;
use rand::RngCore;
use std::f32::consts::PI;

/// Draw a uniform float in [0, 1) from any RNG.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    // 24 mantissa bits keep the result strictly below 1.0
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Uniform direction on the +Z hemisphere.
pub fn uniform_hemisphere(u1: f32, u2: f32) -> Vec3 {
    let z = (1.0 - 2.0 * u1).abs();
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u2;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Rotate a local (+Z up) direction into the frame of normal `n`.
pub fn to_world(local: Vec3, n: Vec3) -> Vec3 {
    let up = if n.y.abs() < 0.999 { Vec3::Y } else { Vec3::X };
    let t = up.cross(n).normalize();
    let b = n.cross(t);
    t * local.x + b * local.y + n * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let u = gen_f32(&mut rng);
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_uniform_hemisphere_is_upper() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let d = uniform_hemisphere(gen_f32(&mut rng), gen_f32(&mut rng));
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_to_world_preserves_hemisphere() {
        let mut rng = StdRng::seed_from_u64(13);
        let normals = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, -3.0).normalize()];
        for n in normals {
            for _ in 0..100 {
                let local = uniform_hemisphere(gen_f32(&mut rng), gen_f32(&mut rng));
                let world = to_world(local, n);
                assert!(world.dot(n) >= -1e-5, "sample below surface for n={n:?}");
            }
        }
    }
}
