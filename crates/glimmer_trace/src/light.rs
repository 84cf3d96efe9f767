//! Light sources for the Whitted integrator.

use glimmer_math::Vec3;

/// A point light with position and RGB intensity.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: Vec3,
}

/// A rectangular area light spanned by two edge vectors.
///
/// The Whitted integrator skips these; emissive scene objects play the
/// area-light role for the path integrator.
#[derive(Debug, Clone)]
pub struct AreaLight {
    pub position: Vec3,
    pub intensity: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

/// The closed set of light kinds a scene can hold.
#[derive(Debug, Clone)]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}

impl Light {
    pub fn point(position: Vec3, intensity: Vec3) -> Self {
        Light::Point(PointLight {
            position,
            intensity,
        })
    }
}
