//! A crate which exports rays, axis-aligned bounding boxes, view frustums and
//! a binary bounding volume hierarchy with an intrusive leaf-object list.
//!
//! ## About
//!
//! This crate accelerates two spatial queries on a large static scene of
//! bounded objects: view-frustum culling (which objects are at least
//! partially visible?) and ray picking (which objects does a ray hit, and
//! which is hit first?). With a [`Bvh`] both queries drop from O(n) to
//! roughly O(log2(n)) at the cost of building the hierarchy once in advance,
//! either top-down over the whole scene or by inserting objects one at a
//! time.
//!
//! The hierarchy never owns the scene objects. It threads an intrusive
//! doubly-linked list through them instead: each object embeds a [`BvhHook`]
//! holding its previous/next neighbours and the leaf that owns it, so an
//! object can always tell which leaf it lives in without a lookup table.
//!
//! ## Example
//!
//! ```
//! use intrusive_bvh::aabb::{Aabb, Bounded};
//! use intrusive_bvh::bvh::{Bvh, BvhBuildConfig};
//! use intrusive_bvh::object::{BvhHook, BvhObject};
//! use intrusive_bvh::ray::Ray;
//! use intrusive_bvh::{Point3, Vector3};
//!
//! struct Prop {
//!     id: u32,
//!     bv: Aabb,
//!     hook: BvhHook,
//! }
//!
//! impl Bounded for Prop {
//!     fn aabb(&self) -> Aabb {
//!         self.bv
//!     }
//! }
//!
//! impl BvhObject for Prop {
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//!
//!     fn hook(&self) -> &BvhHook {
//!         &self.hook
//!     }
//!
//!     fn hook_mut(&mut self) -> &mut BvhHook {
//!         &mut self.hook
//!     }
//! }
//!
//! let mut props: Vec<Prop> = (0..100)
//!     .map(|i| Prop {
//!         id: i,
//!         bv: Aabb::with_bounds(
//!             Point3::new(i as f32 * 2.0, 0.0, 0.0),
//!             Point3::new(i as f32 * 2.0 + 1.0, 1.0, 1.0),
//!         ),
//!         hook: BvhHook::default(),
//!     })
//!     .collect();
//!
//! let mut bvh = Bvh::new();
//! bvh.build_top_down(&mut props, &BvhBuildConfig::default());
//!
//! let ray = Ray::new(Point3::new(-1.0, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
//! let mut hits = Vec::new();
//! let mut tested = Vec::new();
//! let closest = bvh.query_debug(&ray, true, &props, &mut hits, &mut tested);
//! assert_eq!(closest, Some(0));
//! ```

/// A minimal floating value used as a lower bound for approximate
/// containment tests.
pub const EPSILON: f32 = 0.00001;

/// Scalar type used by this crate.
pub type Real = f32;

/// Point math type used by this crate. Type alias for [`nalgebra::Point3`].
pub type Point3 = nalgebra::Point3<Real>;

/// Vector math type used by this crate. Type alias for [`nalgebra::Vector3`].
pub type Vector3 = nalgebra::Vector3<Real>;

/// Matrix math type used by this crate. Type alias for [`nalgebra::Matrix4`].
pub type Matrix4 = nalgebra::Matrix4<Real>;

pub mod aabb;
pub mod axis;
pub mod bvh;
pub mod frustum;
pub mod object;
pub mod ray;
pub mod stats;

#[cfg(test)]
pub mod testbase;

#[doc(inline)]
pub use crate::bvh::{Bvh, BvhBuildConfig};
#[doc(inline)]
pub use crate::object::{BvhHook, BvhObject};
