//! Ray-object intersection record.

use std::sync::Arc;

use glimmer_math::{Vec2, Vec3};

use crate::Material;

/// Everything an integrator needs to know about a hit.
///
/// A miss is the default record: `happened` is false and `distance`
/// is +infinity, so "nearest hit" comparisons work without a branch.
#[derive(Clone)]
pub struct Intersection {
    pub happened: bool,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit
    pub normal: Vec3,
    /// Texture coordinates at the hit
    pub uv: Vec2,
    /// Ray parameter of the hit; +inf on a miss
    pub distance: f32,
    /// Radiance emitted by the hit surface
    pub emit: Vec3,
    /// Diffuse colour of the surface at the hit
    pub diffuse_color: Vec3,
    /// Material of the hit object
    pub material: Option<Arc<Material>>,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            happened: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            distance: f32::INFINITY,
            emit: Vec3::ZERO,
            diffuse_color: Vec3::ZERO,
            material: None,
        }
    }
}

impl Intersection {
    /// A record that hit nothing.
    pub fn miss() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_has_infinite_distance() {
        let miss = Intersection::miss();
        assert!(!miss.happened);
        assert_eq!(miss.distance, f32::INFINITY);
        assert!(miss.material.is_none());
    }
}
