// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
pub mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_reexport() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.dot(Vec3::X), 1.0);
        assert_eq!(v.cross(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_mat4_vector_apply() {
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }
}
