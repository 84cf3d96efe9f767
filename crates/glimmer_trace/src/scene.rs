//! Scene: object list, light list, and the BVH handle.

use glimmer_math::{Ray, Vec3};
use rand::RngCore;

use crate::object::ObjectRef;
use crate::sampling::gen_f32;
use crate::{Bvh, Intersection, Light};

/// A renderable scene.
///
/// The scene exclusively owns the BVH and the light list; objects are
/// `Arc`-shared with the BVH leaves and live as long as the scene.
pub struct Scene {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub background_color: Vec3,
    /// Recursion cap for the Whitted integrator
    pub max_depth: u32,
    /// Continuation probability for the path integrator
    pub russian_roulette: f32,

    objects: Vec<ObjectRef>,
    lights: Vec<Light>,
    bvh: Option<Bvh>,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fov: 40.0,
            background_color: Vec3::new(0.235294, 0.67451, 0.843137),
            max_depth: 5,
            russian_roulette: 0.8,
            objects: Vec::new(),
            lights: Vec::new(),
            bvh: None,
        }
    }

    pub fn add_object(&mut self, object: ObjectRef) {
        self.objects.push(object);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Build the acceleration structure; call once after the last
    /// `add_object` and before rendering.
    pub fn build_bvh(&mut self) {
        self.bvh = Some(Bvh::build(self.objects.clone()));
    }

    /// Nearest intersection in the scene. An empty scene (or one whose
    /// BVH was never built) always misses, which renders as background.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match &self.bvh {
            Some(bvh) => bvh.intersect(ray),
            None => Intersection::miss(),
        }
    }

    /// Sample a point on the emissive surfaces, uniform by area.
    ///
    /// Returns the sample (with its emitted radiance) and the density
    /// `1 / total emissive area`, or None when nothing emits.
    pub fn sample_light(&self, rng: &mut dyn RngCore) -> Option<(Intersection, f32)> {
        let emit_area_sum: f32 = self
            .objects
            .iter()
            .filter(|o| o.has_emit())
            .map(|o| o.area())
            .sum();
        if emit_area_sum <= 0.0 {
            return None;
        }

        let p = gen_f32(rng) * emit_area_sum;
        let mut running = 0.0;
        for object in &self.objects {
            if !object.has_emit() {
                continue;
            }
            running += object.area();
            if p <= running {
                let (sample, _) = object.sample(rng);
                return Some((sample, 1.0 / emit_area_sum));
            }
        }
        None
    }
}
