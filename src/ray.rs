//! This module defines a Ray structure and an intersection algorithm
//! for axis aligned bounding boxes.

use crate::aabb::Aabb;
use crate::stats;
use crate::{Point3, Real, Vector3};

/// A struct which defines a ray and some of its cached values.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The ray origin.
    pub origin: Point3,

    /// The ray direction. Does not need to be unit length; the parameter t
    /// reported by [`Ray::intersection_t`] is in units of `direction`.
    pub direction: Vector3,

    /// Inverse (1/x) ray direction. Cached for use in [`Aabb`] intersections.
    pub inv_direction: Vector3,
}

impl Ray {
    /// Creates a new [`Ray`] from an `origin` and a `direction`.
    ///
    /// # Examples
    /// ```
    /// use intrusive_bvh::ray::Ray;
    /// use intrusive_bvh::{Point3, Vector3};
    ///
    /// let origin = Point3::new(0.0, 0.0, 0.0);
    /// let direction = Vector3::new(1.0, 0.0, 0.0);
    /// let ray = Ray::new(origin, direction);
    ///
    /// assert_eq!(ray.origin, origin);
    /// assert_eq!(ray.direction, direction);
    /// ```
    pub fn new(origin: Point3, direction: Vector3) -> Ray {
        Ray {
            origin,
            direction,
            inv_direction: direction.map(|x| 1.0 / x),
        }
    }

    /// Returns the point `origin + t * direction`.
    pub fn at(&self, t: Real) -> Point3 {
        self.origin + self.direction * t
    }

    /// Tests the intersection of this [`Ray`] with an [`Aabb`] using the slab
    /// method and returns the parameter t at which the ray enters the box.
    ///
    /// An origin inside the box yields `0.0`; a miss yields a negative
    /// sentinel. A ray running parallel to a slab whose origin lies outside
    /// that slab misses, as does a ray with a zero direction vector.
    ///
    /// # Examples
    /// ```
    /// use intrusive_bvh::aabb::Aabb;
    /// use intrusive_bvh::ray::Ray;
    /// use intrusive_bvh::{Point3, Vector3};
    ///
    /// let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    /// let aabb = Aabb::with_bounds(Point3::new(2.0, -1.0, -1.0), Point3::new(3.0, 1.0, 1.0));
    ///
    /// assert_eq!(ray.intersection_t(&aabb), 2.0);
    /// ```
    pub fn intersection_t(&self, aabb: &Aabb) -> Real {
        stats::record_ray_vs_aabb();

        const MISS: Real = -1.0;

        if self.direction == Vector3::zeros() {
            return MISS;
        }

        let mut t_entry = Real::NEG_INFINITY;
        let mut t_exit = Real::INFINITY;

        for axis in 0..3 {
            if self.direction[axis] == 0.0 {
                // Parallel to this slab; the origin must lie within it.
                if self.origin[axis] < aabb.min[axis] || self.origin[axis] > aabb.max[axis] {
                    return MISS;
                }
                continue;
            }

            let mut t1 = (aabb.min[axis] - self.origin[axis]) * self.inv_direction[axis];
            let mut t2 = (aabb.max[axis] - self.origin[axis]) * self.inv_direction[axis];
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_entry = t_entry.max(t1);
            t_exit = t_exit.min(t2);
            if t_entry > t_exit {
                return MISS;
            }
        }

        if t_exit < 0.0 {
            return MISS;
        }

        t_entry.max(0.0)
    }
}
