//! Incremental insertion guided by a surface-volume cost heuristic.
//!
//! Each insert descends from the root towards the cheapest anchor for the
//! new object, accounting for the volume enlargement it would cause along
//! the way, then either extends an existing leaf in place or wraps the
//! cheapest visited node together with a fresh leaf in a new parent. The
//! tree is never rebalanced; its quality depends on the insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::aabb::Aabb;
use crate::bvh::{Bvh, BvhBuildConfig, NodeId};
use crate::object::{BvhObject, ObjectIndex};
use crate::Real;

/// Two costs within this range count as equally good anchors.
const COST_EPSILON: Real = 1e-3;

/// Costs of routing the new object through one visited node.
#[derive(Debug, Clone, Copy)]
struct NodeCosts {
    node: NodeId,
    /// Depth of `node` below the root.
    level: u32,
    /// Volume of `node` enlarged to cover the new object.
    new_aabb: Aabb,
    new_volume: Real,
    /// Enlargement caused by the new object, `>= 0`.
    delta: Real,
    /// Total enlargement from the root down to and including `node`.
    root_to_node_cost: Real,
    /// Cost of stopping here: wrapping `node` and the object in a fresh
    /// parent, after enlarging everything above.
    root_to_new_parent_cost: Real,
}

impl NodeCosts {
    fn new(bvh: &Bvh, node: NodeId, object_bv: &Aabb, cost_to_node: Real, level: u32) -> NodeCosts {
        let bv = bvh.nodes[node.idx()].bv;
        let new_aabb = bv.join(object_bv);
        let new_volume = new_aabb.volume();
        let delta = new_volume - bv.volume();
        NodeCosts {
            node,
            level,
            new_aabb,
            new_volume,
            delta,
            root_to_node_cost: cost_to_node + delta,
            root_to_new_parent_cost: new_volume + cost_to_node,
        }
    }
}

impl PartialEq for NodeCosts {
    fn eq(&self, other: &NodeCosts) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeCosts {}

impl PartialOrd for NodeCosts {
    fn partial_cmp(&self, other: &NodeCosts) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pop order of the descent queue: deepest level first; among equal levels,
/// the candidate with the smallest enlargement. This walks greedily from
/// the root down one child per level until a leaf is reached.
impl Ord for NodeCosts {
    fn cmp(&self, other: &NodeCosts) -> Ordering {
        self.level
            .cmp(&other.level)
            .then_with(|| other.delta.total_cmp(&self.delta))
    }
}

impl Bvh {
    /// Inserts every object of `objects` in slice order.
    pub fn insert_all<O: BvhObject>(&mut self, objects: &mut [O], config: &BvhBuildConfig) {
        for index in 0..objects.len() {
            self.insert(objects, ObjectIndex(index), config);
        }
    }

    /// Inserts the object at `index` into the tree.
    ///
    /// The descent pops candidates from a priority queue; the popped
    /// sequence forms a root-to-leaf path. Along it the cheapest spot to
    /// create a new parent is remembered. Once the leaf is reached the
    /// object either joins it in place (when doing so is cheaper than any
    /// wrap and one of the `config` rules licenses growing the leaf) or a
    /// new parent is spliced in at the remembered spot, adopting the old
    /// subtree and a fresh single-object leaf.
    pub fn insert<O: BvhObject>(
        &mut self,
        objects: &mut [O],
        index: ObjectIndex,
        config: &BvhBuildConfig,
    ) {
        self.object_count += 1;
        let object_bv = objects[index.0].aabb();

        let Some(root) = self.root else {
            let leaf = self.alloc_node(object_bv);
            self.root = Some(leaf);
            self.add_object(leaf, index, objects);
            return;
        };

        // Descend towards the cheapest leaf, remembering the whole path.
        let mut queue = BinaryHeap::new();
        queue.push(NodeCosts::new(self, root, &object_bv, 0.0, 0));

        let mut path: Vec<NodeCosts> = Vec::new();
        let mut best = 0;

        while let Some(costs) = queue.pop() {
            let best_cost = path
                .get(best)
                .map_or(Real::INFINITY, |b| b.root_to_new_parent_cost);
            if costs.root_to_new_parent_cost <= best_cost + COST_EPSILON {
                best = path.len();
            }
            path.push(costs);

            if self.nodes[costs.node.idx()].is_leaf() {
                break;
            }
            if let [Some(left), Some(right)] = self.nodes[costs.node.idx()].children {
                queue.push(NodeCosts::new(
                    self,
                    left,
                    &object_bv,
                    costs.root_to_node_cost,
                    costs.level + 1,
                ));
                queue.push(NodeCosts::new(
                    self,
                    right,
                    &object_bv,
                    costs.root_to_node_cost,
                    costs.level + 1,
                ));
            }
        }

        // The greedy descent always ends in a leaf.
        let leaf = *path.last().expect("descent visited no nodes");

        if leaf.root_to_node_cost < path[best].root_to_new_parent_cost {
            let extend = if self.leaf_object_count(leaf.node, objects) < config.min_objects as usize
                || leaf.level >= config.max_depth
            {
                true
            } else if leaf.new_volume >= config.min_volume && leaf.delta > 0.0 {
                // The grown leaf would outgrow the volume rule; wrap the
                // leaf itself instead of extending it.
                best = path.len() - 1;
                false
            } else {
                true
            };

            if extend {
                for costs in &path {
                    self.nodes[costs.node.idx()].bv = costs.new_aabb;
                }
                self.add_object(leaf.node, index, objects);
                return;
            }
        }

        // Wrap the node at `best` and a fresh leaf in a new parent.
        let anchor = path[best];

        if self.root == Some(anchor.node) {
            let new_root = self.alloc_node(anchor.new_aabb);
            let new_leaf = self.alloc_node(object_bv);
            self.nodes[new_root.idx()].children = [Some(anchor.node), Some(new_leaf)];
            self.add_object(new_leaf, index, objects);
            self.root = Some(new_root);
            return;
        }

        // Enlarge all strict ancestors of the anchor.
        for costs in &path[..best] {
            self.nodes[costs.node.idx()].bv = costs.new_aabb;
        }

        let parent = path[best - 1].node;
        let slot = if self.nodes[parent.idx()].children[0] == Some(anchor.node) {
            0
        } else {
            1
        };

        let new_parent = self.alloc_node(anchor.new_aabb);
        let new_leaf = self.alloc_node(object_bv);
        self.nodes[new_parent.idx()].children[slot] = Some(anchor.node);
        self.nodes[new_parent.idx()].children[slot ^ 1] = Some(new_leaf);
        self.nodes[parent.idx()].children[slot] = Some(new_parent);
        self.add_object(new_leaf, index, objects);
    }
}
