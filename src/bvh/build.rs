//! Top-down construction of a [`Bvh`] by recursive median splits.
//!
//! [`Bvh`]: struct.Bvh.html

use log::debug;

use crate::aabb::Aabb;
use crate::bvh::{Bvh, NodeId};
use crate::object::{BvhObject, ObjectIndex};
use crate::Real;

/// Rules for [`Bvh`] construction. Not all rules apply to all methods; any
/// satisfied rule keeps a node from being split.
///
/// [`Bvh`]: struct.Bvh.html
#[derive(Debug, Clone, Copy)]
pub struct BvhBuildConfig {
    /// Nodes at this depth from the root are never split.
    pub max_depth: u32,

    /// Nodes holding at most this many objects are not split.
    pub min_objects: u32,

    /// Nodes whose volume does not exceed this are not split.
    pub min_volume: Real,
}

impl Default for BvhBuildConfig {
    fn default() -> BvhBuildConfig {
        BvhBuildConfig {
            max_depth: u32::MAX,
            min_objects: 10,
            min_volume: 0.0,
        }
    }
}

impl Bvh {
    /// Builds the tree top-down over all objects of `objects`.
    ///
    /// Each recursion step wraps its range in a node with the range's tight
    /// bounding volume, then either stops (the node becomes a leaf owning
    /// the range) or sorts the range by volume center along the node's
    /// largest axis, splits it in the middle and recurses on both halves.
    /// Stop conditions are the rules of `config` plus a degenerate-range
    /// guard, so identical volumes cannot recurse forever.
    ///
    /// An empty `objects` slice is a no-op. A non-empty tree is cleared
    /// (detaching all hooks) before the new one is built.
    pub fn build_top_down<O: BvhObject>(&mut self, objects: &mut [O], config: &BvhBuildConfig) {
        if objects.is_empty() {
            return;
        }
        if !self.is_empty() {
            self.clear(objects);
        }

        let mut order: Vec<ObjectIndex> = (0..objects.len()).map(ObjectIndex).collect();
        self.build_range(objects, &mut order, config, None, 0);
        self.object_count = objects.len();

        debug!(
            "top-down build over {} objects: {} nodes, depth {:?}",
            objects.len(),
            self.size(),
            self.depth()
        );
    }

    fn build_range<O: BvhObject>(
        &mut self,
        objects: &mut [O],
        order: &mut [ObjectIndex],
        config: &BvhBuildConfig,
        parent: Option<NodeId>,
        depth: u32,
    ) {
        if order.is_empty() {
            return;
        }

        // Tight volume over the whole range.
        let mut bv = Aabb::empty();
        for index in order.iter() {
            bv.join_mut(&objects[index.0].aabb());
        }

        let node = self.alloc_node(bv);
        match parent {
            Some(parent) => self.attach_child(parent, node),
            None => self.root = Some(node),
        }

        let count = order.len();
        if count as u32 <= config.min_objects
            || bv.volume() <= config.min_volume
            || depth >= config.max_depth
            || count < 2
        {
            for &index in order.iter() {
                self.add_object(node, index, objects);
            }
            return;
        }

        // Median split along the largest axis. The sort is stable, so equal
        // centers keep their pre-sort order.
        let axis = bv.largest_axis();
        order.sort_by(|a, b| {
            objects[a.0].aabb().center()[axis].total_cmp(&objects[b.0].aabb().center()[axis])
        });

        let (near_half, far_half) = order.split_at_mut(count / 2);
        self.build_range(objects, near_half, config, Some(node), depth + 1);
        self.build_range(objects, far_half, config, Some(node), depth + 1);
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[parent.idx()];
        if node.children[0].is_none() {
            node.children[0] = Some(child);
        } else if node.children[1].is_none() {
            node.children[1] = Some(child);
        } else {
            panic!("node already has two children");
        }
    }
}
