//! Model/view/projection builders and the viewport mapping.
//!
//! The rasterizer composes `projection * view * model`, divides by w, then
//! maps NDC into screen space with [`viewport_transform`].

use crate::{Mat4, Vec3, Vec4};

/// Near plane distance used by the viewport depth remap.
pub const Z_NEAR: f32 = 0.1;
/// Far plane distance used by the viewport depth remap.
pub const Z_FAR: f32 = 50.0;

/// Model transform: rotation about the Z axis by `angle_deg` degrees.
pub fn model_matrix(angle_deg: f32) -> Mat4 {
    Mat4::from_rotation_z(angle_deg.to_radians())
}

/// View transform: translate the world so the eye sits at the origin.
pub fn view_matrix(eye_pos: Vec3) -> Mat4 {
    Mat4::from_translation(-eye_pos)
}

/// Perspective projection with GL-style NDC (z in [-1, 1]).
///
/// The camera looks down -Z; `near` and `far` are positive distances.
pub fn projection_matrix(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_deg.to_radians(), aspect, near, far)
}

/// Map an NDC vertex into screen space.
///
/// x and y go from [-1, 1] to [0, width] and [0, height]; z is remapped
/// from NDC onto [Z_NEAR, Z_FAR] so smaller depth values are nearer.
/// The w component is passed through for perspective-correct interpolation.
pub fn viewport_transform(v: Vec4, width: f32, height: f32) -> Vec4 {
    let f1 = (Z_FAR - Z_NEAR) / 2.0;
    let f2 = (Z_FAR + Z_NEAR) / 2.0;
    Vec4::new(
        0.5 * width * (v.x + 1.0),
        0.5 * height * (v.y + 1.0),
        v.z * f1 + f2,
        v.w,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_round_trip() {
        // Any clip-space point with x,y in [-1,1] must land in
        // [0,w] x [0,h] with z in [Z_NEAR, Z_FAR].
        let (w, h) = (700.0, 700.0);
        for &(x, y, z) in &[
            (-1.0, -1.0, -1.0),
            (1.0, 1.0, 1.0),
            (0.0, 0.0, 0.0),
            (-0.25, 0.75, 0.5),
        ] {
            let s = viewport_transform(Vec4::new(x, y, z, 1.0), w, h);
            assert!(s.x >= 0.0 && s.x <= w);
            assert!(s.y >= 0.0 && s.y <= h);
            assert!(s.z >= Z_NEAR && s.z <= Z_FAR);
        }
    }

    #[test]
    fn test_viewport_corners() {
        let s = viewport_transform(Vec4::new(-1.0, -1.0, -1.0, 1.0), 640.0, 480.0);
        assert_eq!(s.x, 0.0);
        assert_eq!(s.y, 0.0);
        assert!((s.z - Z_NEAR).abs() < 1e-5);

        let s = viewport_transform(Vec4::new(1.0, 1.0, 1.0, 1.0), 640.0, 480.0);
        assert_eq!(s.x, 640.0);
        assert_eq!(s.y, 480.0);
        assert!((s.z - Z_FAR).abs() < 1e-4);
    }

    #[test]
    fn test_projection_near_far_to_ndc() {
        let proj = projection_matrix(45.0, 1.0, Z_NEAR, Z_FAR);

        // A point on the near plane maps to z = -1, far plane to z = +1.
        let near = proj * Vec4::new(0.0, 0.0, -Z_NEAR, 1.0);
        assert!((near.z / near.w - (-1.0)).abs() < 1e-4);

        let far = proj * Vec4::new(0.0, 0.0, -Z_FAR, 1.0);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let v = view_matrix(eye);
        let p = v * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert_eq!(p, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_model_matrix_rotation() {
        let m = model_matrix(90.0);
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }
}
