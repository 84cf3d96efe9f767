use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box, stored as one [`Interval`] per axis.
///
/// This is the bounding volume used by the BVH; the slab test reports
/// the entry/exit parameter range so callers can prune traversal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// The smallest AABB enclosing two others.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Grow this AABB to also enclose a single point.
    pub fn grow(&self, p: Vec3) -> Self {
        let point = Aabb {
            x: Interval::new(p.x, p.x),
            y: Interval::new(p.y, p.y),
            z: Interval::new(p.z, p.z),
        };
        Aabb::surrounding(self, &point)
    }

    /// The interval for axis n (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Ray-slab intersection.
    ///
    /// Returns the entry/exit parameter range where the ray overlaps the
    /// box, restricted to `ray_t`, or None on a miss.
    pub fn intersect(&self, r: &Ray, mut ray_t: Interval) -> Option<Interval> {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let orig = r.origin[axis];
            let adinv = 1.0 / r.direction[axis];

            let mut t0 = (slab.min - orig) * adinv;
            let mut t1 = (slab.max - orig) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return None;
            }
        }
        Some(ray_t)
    }

    /// Boolean form of [`Aabb::intersect`].
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        self.intersect(r, ray_t).is_some()
    }

    /// Pad flat axes so the slab test stays well-conditioned.
    fn pad_to_minimums(&mut self) {
        let delta = 0.0001;
        if self.x.size() < delta {
            self.x = self.x.expand(delta);
        }
        if self.y.size() < delta {
            self.y = self.y.expand(delta);
        }
        if self.z.size() < delta {
            self.z = self.z.expand(delta);
        }
    }

    /// The index of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// The center point of the box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(5.0, 0.0, -1.0), Vec3::new(-5.0, 2.0, 1.0));
        assert_eq!(aabb.x.min, -5.0);
        assert_eq!(aabb.x.max, 5.0);
        assert_eq!(aabb.z.min, -1.0);
    }

    #[test]
    fn test_slab_entry_exit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let t = aabb.intersect(&ray, Interval::new(0.0, 100.0)).unwrap();
        assert!((t.min - 4.0).abs() < 1e-4);
        assert!((t.max - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_slab_miss() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Offset to the side
        let ray = Ray::new(Vec3::new(10.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_surrounding_and_grow() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_points(Vec3::splat(2.0), Vec3::splat(3.0));
        let s = Aabb::surrounding(&a, &b);
        assert_eq!(s.x.max, 3.0);

        let g = a.grow(Vec3::new(-4.0, 0.5, 0.5));
        assert_eq!(g.x.min, -4.0);
    }

    #[test]
    fn test_longest_axis_and_centroid() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 2.0));
        assert_eq!(aabb.longest_axis(), 1);
        assert_eq!(aabb.centroid(), Vec3::new(0.5, 5.0, 1.0));
    }
}
