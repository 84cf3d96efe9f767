//! Glimmer tracer - CPU ray and path tracing.
//!
//! Two integrators over a shared scene representation:
//!
//! - **Whitted** (`whitted::cast_ray`): recursive reflection/refraction
//!   with Phong direct lighting
//! - **Path** (`path::cast_ray`): unidirectional Monte Carlo with
//!   next-event estimation and Russian-roulette termination
//!
//! Scenes hold `Arc`-shared objects; a BVH built once over the object
//! list accelerates every intersection query.

mod bvh;
mod intersection;
mod light;
mod material;
mod mesh_triangle;
mod object;
pub mod path;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod triangle;
pub mod whitted;

pub use bvh::Bvh;
pub use intersection::Intersection;
pub use light::{AreaLight, Light, PointLight};
pub use material::{fresnel, reflect, refract, Material, MaterialKind};
pub use mesh_triangle::MeshTriangle;
pub use object::{Object, ObjectRef, SurfaceProperties};
pub use renderer::{render_path, render_path_parallel, render_whitted, RenderError};
pub use scene::Scene;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math types the public API speaks in.
pub use glimmer_math::{Aabb, Interval, Ray, Vec2, Vec3};

/// Shadow/self-intersection bias shared by both integrators.
pub const EPSILON: f32 = 1.6e-4;
