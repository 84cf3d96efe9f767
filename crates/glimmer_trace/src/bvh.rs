//! Bounding Volume Hierarchy over scene primitives.
//!
//! Built once per scene with a longest-axis median split; leaves hold
//! exactly one primitive and every node caches the union AABB of its
//! subtree, so traversal prunes whole subtrees on a single slab test.

use glimmer_math::{Aabb, Interval, Ray};

use crate::object::ObjectRef;
use crate::Intersection;

enum BvhNode {
    Leaf {
        object: ObjectRef,
        bbox: Aabb,
    },
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

/// The acceleration structure handle a scene owns.
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    /// Build over the given objects (median split on the longest axis
    /// of the centroid bounds).
    pub fn build(objects: Vec<ObjectRef>) -> Self {
        if objects.is_empty() {
            return Self { root: None };
        }
        log::info!("generating BVH over {} objects", objects.len());
        Self {
            root: Some(BvhNode::build(objects)),
        }
    }

    /// Nearest intersection along the ray, or a miss.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match &self.root {
            Some(root) => root.intersect(ray),
            None => Intersection::miss(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match &self.root {
            Some(root) => root.bbox(),
            None => Aabb::EMPTY,
        }
    }
}

impl BvhNode {
    fn build(mut objects: Vec<ObjectRef>) -> Self {
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounds()));

        match objects.len() {
            1 => {
                let object = objects.remove(0);
                let bbox = object.bounds();
                BvhNode::Leaf { object, bbox }
            }
            2 => {
                let right = objects.remove(1);
                let left = objects.remove(0);
                BvhNode::Branch {
                    left: Box::new(Self::build(vec![left])),
                    right: Box::new(Self::build(vec![right])),
                    bbox: bounds,
                }
            }
            n => {
                // split where the primitive centroids spread the most
                let centroid_bounds = objects
                    .iter()
                    .fold(Aabb::EMPTY, |acc, o| acc.grow(o.bounds().centroid()));
                let axis = centroid_bounds.longest_axis();

                objects.sort_unstable_by(|a, b| {
                    let a_c = a.bounds().centroid()[axis];
                    let b_c = b.bounds().centroid()[axis];
                    a_c.partial_cmp(&b_c).unwrap_or(std::cmp::Ordering::Equal)
                });

                let right_objects = objects.split_off(n / 2);
                BvhNode::Branch {
                    left: Box::new(Self::build(objects)),
                    right: Box::new(Self::build(right_objects)),
                    bbox: bounds,
                }
            }
        }
    }

    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn intersect(&self, ray: &Ray) -> Intersection {
        if !self.bbox().hit(ray, Interval::new(0.0, f32::INFINITY)) {
            return Intersection::miss();
        }
        match self {
            BvhNode::Leaf { object, .. } => object.intersect(ray),
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.intersect(ray);
                let hit_right = right.intersect(ray);
                if hit_left.distance < hit_right.distance {
                    hit_left
                } else {
                    hit_right
                }
            }
        }
    }
}
