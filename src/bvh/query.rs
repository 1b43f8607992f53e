//! Frustum and ray queries over a built [`Bvh`].
//!
//! [`Bvh`]: struct.Bvh.html

use crate::bvh::{Bvh, NodeId};
use crate::frustum::{Containment, Frustum};
use crate::object::BvhObject;
use crate::ray::Ray;
use crate::Real;

/// Mutable state threaded through the recursive ray descent.
struct RayQuery<'a, O> {
    ray: &'a Ray,
    closest_only: bool,
    objects: &'a [O],
    all_hits: &'a mut Vec<u32>,
    tested_nodes: &'a mut Vec<NodeId>,
    /// Best (t, id) pair over the whole tree so far.
    closest: Option<(Real, u32)>,
}

impl Bvh {
    /// Returns the ids of all objects whose volumes are not completely
    /// outside `frustum`.
    ///
    /// Subtrees completely inside the frustum are emitted wholesale without
    /// further classification; subtrees completely outside are skipped.
    /// Objects of a partially visible leaf are classified individually.
    /// The order of the returned ids is the traversal order and not
    /// specified.
    pub fn query<O: BvhObject>(&self, frustum: &Frustum, objects: &[O]) -> Vec<u32> {
        let mut ids = Vec::new();
        let Some(root) = self.root else {
            return ids;
        };

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match frustum.classify(&node.bv) {
                Containment::Outside => {}
                Containment::Inside => {
                    self.traverse_level_order_objects_from(id, objects, |object| {
                        ids.push(object.id());
                    });
                }
                Containment::Intersecting => {
                    if node.is_leaf() {
                        let mut cursor = node.first;
                        while let Some(obj) = cursor {
                            let object = &objects[obj.0];
                            if frustum.classify(&object.aabb()) != Containment::Outside {
                                ids.push(object.id());
                            }
                            cursor = object.hook().next;
                        }
                    } else if let [Some(left), Some(right)] = node.children {
                        stack.push(left);
                        stack.push(right);
                    }
                }
            }
        }
        ids
    }

    /// Casts `ray` through the tree, descending into the closer child first.
    ///
    /// Returns the id of the object with the smallest non-negative hit
    /// parameter, or `None` when nothing is hit. `all_hits` receives the ids
    /// of every hit object, or exactly the closest one when `closest_only`
    /// is set; in that mode subtrees that provably cannot beat the current
    /// hit are skipped. Every node whose volume is tested is appended to
    /// `tested_nodes`.
    pub fn query_debug<O: BvhObject>(
        &self,
        ray: &Ray,
        closest_only: bool,
        objects: &[O],
        all_hits: &mut Vec<u32>,
        tested_nodes: &mut Vec<NodeId>,
    ) -> Option<u32> {
        all_hits.clear();
        tested_nodes.clear();

        let root = self.root?;
        let mut query = RayQuery {
            ray,
            closest_only,
            objects,
            all_hits,
            tested_nodes,
            closest: None,
        };

        query.tested_nodes.push(root);
        if ray.intersection_t(&self.node(root).bv) >= 0.0 {
            self.query_ray_node(root, &mut query);
        }

        let (_, id) = query.closest?;
        if closest_only {
            all_hits.clear();
            all_hits.push(id);
        }
        Some(id)
    }

    /// Recursive descent for [`Bvh::query_debug`]. Returns the smallest hit
    /// parameter found in this subtree, `f32::MAX` for a leaf without hits
    /// and a negative sentinel when neither child volume is hit.
    fn query_ray_node<O: BvhObject>(&self, id: NodeId, query: &mut RayQuery<'_, O>) -> Real {
        let node = self.node(id);

        let [Some(left), Some(right)] = node.children else {
            let mut node_t = Real::MAX;
            let mut cursor = node.first;
            while let Some(obj) = cursor {
                let object = &query.objects[obj.0];
                let t = query.ray.intersection_t(&object.aabb());
                if t >= 0.0 {
                    if !query.closest_only {
                        query.all_hits.push(object.id());
                    }
                    node_t = node_t.min(t);
                    if query.closest.map_or(true, |(best_t, _)| t < best_t) {
                        query.closest = Some((t, object.id()));
                    }
                }
                cursor = object.hook().next;
            }
            return node_t;
        };

        query.tested_nodes.push(left);
        let left_t = query.ray.intersection_t(&self.node(left).bv);
        query.tested_nodes.push(right);
        let right_t = query.ray.intersection_t(&self.node(right).bv);

        if left_t < 0.0 && right_t < 0.0 {
            return -1.0;
        }
        if left_t >= 0.0 && right_t >= 0.0 {
            let (near, far, far_t) = if left_t < right_t {
                (left, right, right_t)
            } else {
                (right, left, left_t)
            };

            let mut t = self.query_ray_node(near, query);
            // The farther subtree can only matter when every hit is wanted
            // or the near result does not already beat its entry parameter.
            if !query.closest_only || t < 0.0 || t > far_t {
                t = self.query_ray_node(far, query).min(t);
            }
            t
        } else if left_t >= 0.0 {
            self.query_ray_node(left, query)
        } else {
            self.query_ray_node(right, query)
        }
    }
}
