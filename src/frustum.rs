//! View frustums as six inward-pointing planes, with a three-state AABB
//! classification for hierarchical culling.

use crate::aabb::Aabb;
use crate::stats;
use crate::{Matrix4, Point3, Real, Vector3};

/// A plane in normal-distance form. Points with a non-negative signed
/// distance lie on the inner side of the plane.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Plane normal, pointing towards the inner half-space.
    pub normal: Vector3,

    /// Distance term; the plane is the set of points p with
    /// `normal.dot(p) + d == 0`.
    pub d: Real,
}

impl Plane {
    /// Creates a [`Plane`] from the coefficients of
    /// `a*x + b*y + c*z + d >= 0`, normalizing the normal.
    pub fn from_coefficients(a: Real, b: Real, c: Real, d: Real) -> Plane {
        let normal = Vector3::new(a, b, c);
        let length = normal.norm();
        Plane {
            normal: normal / length,
            d: d / length,
        }
    }

    /// Signed distance of `p` to the plane; positive on the inner side.
    pub fn signed_distance(&self, p: &Point3) -> Real {
        self.normal.dot(&p.coords) + self.d
    }
}

/// The result of classifying an [`Aabb`] against a [`Frustum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// Completely outside at least one plane.
    Outside,

    /// Neither completely outside nor completely inside.
    Intersecting,

    /// Completely inside all six planes.
    Inside,
}

/// A view frustum described by six inward-pointing planes, in the order
/// left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// The bounding planes, normals pointing inwards.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Creates a [`Frustum`] from six inward-pointing planes.
    pub fn from_planes(planes: [Plane; 6]) -> Frustum {
        Frustum { planes }
    }

    /// Extracts the six clip planes from a view-projection matrix
    /// (OpenGL clip-space conventions, matching
    /// [`Matrix4::new_perspective`]).
    ///
    /// # Examples
    /// ```
    /// use intrusive_bvh::aabb::Aabb;
    /// use intrusive_bvh::frustum::{Containment, Frustum};
    /// use intrusive_bvh::{Matrix4, Point3, Vector3};
    ///
    /// let view = Matrix4::look_at_rh(
    ///     &Point3::new(0.0, 0.0, 10.0),
    ///     &Point3::new(0.0, 0.0, 0.0),
    ///     &Vector3::new(0.0, 1.0, 0.0),
    /// );
    /// let proj = Matrix4::new_perspective(1.0, 60f32.to_radians(), 0.1, 100.0);
    /// let frustum = Frustum::from_matrix(&(proj * view));
    ///
    /// let aabb = Aabb::with_bounds(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
    /// assert_eq!(frustum.classify(&aabb), Containment::Inside);
    /// ```
    pub fn from_matrix(view_proj: &Matrix4) -> Frustum {
        let m = view_proj;
        let row = |i: usize| {
            (m[(i, 0)], m[(i, 1)], m[(i, 2)], m[(i, 3)])
        };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Frustum {
            planes: [
                // Left, right
                Plane::from_coefficients(r3.0 + r0.0, r3.1 + r0.1, r3.2 + r0.2, r3.3 + r0.3),
                Plane::from_coefficients(r3.0 - r0.0, r3.1 - r0.1, r3.2 - r0.2, r3.3 - r0.3),
                // Bottom, top
                Plane::from_coefficients(r3.0 + r1.0, r3.1 + r1.1, r3.2 + r1.2, r3.3 + r1.3),
                Plane::from_coefficients(r3.0 - r1.0, r3.1 - r1.1, r3.2 - r1.2, r3.3 - r1.3),
                // Near, far
                Plane::from_coefficients(r3.0 + r2.0, r3.1 + r2.1, r3.2 + r2.2, r3.3 + r2.3),
                Plane::from_coefficients(r3.0 - r2.0, r3.1 - r2.1, r3.2 - r2.2, r3.3 - r2.3),
            ],
        }
    }

    /// Classifies an [`Aabb`] against the frustum using the p/n-vertex test:
    /// per plane, only the corner farthest along the normal (p-vertex) and
    /// the corner farthest against it (n-vertex) are examined.
    pub fn classify(&self, aabb: &Aabb) -> Containment {
        stats::record_frustum_vs_aabb();

        let mut result = Containment::Inside;
        for plane in &self.planes {
            let p_vertex = Point3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if plane.signed_distance(&p_vertex) < 0.0 {
                return Containment::Outside;
            }

            let n_vertex = Point3::new(
                if plane.normal.x >= 0.0 { aabb.min.x } else { aabb.max.x },
                if plane.normal.y >= 0.0 { aabb.min.y } else { aabb.max.y },
                if plane.normal.z >= 0.0 { aabb.min.z } else { aabb.max.z },
            );
            if plane.signed_distance(&n_vertex) < 0.0 {
                result = Containment::Intersecting;
            }
        }
        result
    }
}
