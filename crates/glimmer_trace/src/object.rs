//! The capability trait every scene primitive implements.

use std::sync::Arc;

use glimmer_math::{Aabb, Ray, Vec2, Vec3};
use rand::RngCore;

use crate::Intersection;

/// Normal and texture coordinates at a point on a surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceProperties {
    pub normal: Vec3,
    pub st: Vec2,
}

/// A renderable scene primitive.
///
/// Objects are shared (`Arc`) between the scene's object list and the
/// BVH leaves; they are immutable once the scene is built, so the trait
/// requires `Send + Sync` for the parallel render path.
pub trait Object: Send + Sync {
    /// Nearest intersection along the ray, or a miss record.
    fn intersect(&self, ray: &Ray) -> Intersection;

    /// Normal and texture coordinates at `point` (with the primitive's
    /// parametric coordinates `uv` where it has them).
    fn surface_properties(&self, point: Vec3, uv: Vec2) -> SurfaceProperties;

    /// Total surface area, used for light sampling.
    fn area(&self) -> f32;

    /// Does this object emit light?
    fn has_emit(&self) -> bool;

    /// Draw a uniform point on the surface; returns the sample (with
    /// `emit` filled in) and the density 1/area.
    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32);

    /// Diffuse colour at texture coordinates `uv` (nearest lookup only).
    fn eval_diffuse_color(&self, uv: Vec2) -> Vec3;

    /// Axis-aligned bounding box.
    fn bounds(&self) -> Aabb;
}

/// The shared-ownership handle the scene and BVH pass around.
pub type ObjectRef = Arc<dyn Object>;
