//! This module defines the [`Bvh`] itself: the node arena, the intrusive
//! per-leaf object lists, traversals, introspection and lifecycle.
//!
//! [`Bvh`]: struct.Bvh.html

use std::collections::VecDeque;

use log::debug;

use crate::aabb::Aabb;
use crate::bvh::{Node, NodeId};
use crate::object::{BvhHook, BvhObject, ObjectIndex};
use crate::EPSILON;

/// A bounding volume hierarchy over the objects of a user-held slice.
///
/// Nodes live in a contiguous arena owned by the tree and are addressed by
/// [`NodeId`]. The objects themselves are always borrowed: operations that
/// touch them take the slice the tree was populated over. Leaves own their
/// objects through an intrusive doubly-linked list threaded through each
/// object's [`BvhHook`].
///
/// [`BvhHook`]: crate::object::BvhHook
#[derive(Debug, Default)]
pub struct Bvh {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: Option<NodeId>,
    pub(crate) object_count: usize,
}

impl Bvh {
    /// Creates a new empty [`Bvh`].
    pub fn new() -> Bvh {
        Bvh {
            nodes: Vec::new(),
            root: None,
            object_count: 0,
        }
    }

    pub(crate) fn alloc_node(&mut self, bv: Aabb) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(bv));
        id
    }

    /// The root node, `None` while the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Borrows a node by id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    /// Returns true while the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total number of nodes, 0 when empty.
    pub fn size(&self) -> usize {
        self.root.map_or(0, |root| self.subtree_size(root))
    }

    /// Depth of the tree: `None` when empty, `Some(0)` for a single-node
    /// root.
    pub fn depth(&self) -> Option<usize> {
        self.root.map(|root| self.subtree_depth(root))
    }

    /// Number of objects currently tracked by the tree.
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Longest path from the node `id` down to a descendant leaf.
    pub fn subtree_depth(&self, id: NodeId) -> usize {
        match self.node(id).children {
            [Some(left), Some(right)] => {
                1 + self.subtree_depth(left).max(self.subtree_depth(right))
            }
            _ => 0,
        }
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        match self.node(id).children {
            [Some(left), Some(right)] => 1 + self.subtree_size(left) + self.subtree_size(right),
            _ => 1,
        }
    }

    /// Number of objects owned by the node `id` itself (not its
    /// descendants); always 0 for internal nodes.
    pub fn leaf_object_count<O: BvhObject>(&self, id: NodeId, objects: &[O]) -> usize {
        let mut count = 0;
        let mut cursor = self.node(id).first;
        while let Some(obj) = cursor {
            count += 1;
            cursor = objects[obj.0].hook().next;
        }
        count
    }

    /// Detaches every tracked object's [`BvhHook`] and releases every node,
    /// restoring the tree to the empty state.
    ///
    /// `objects` must be the slice the tree was populated over.
    ///
    /// [`BvhHook`]: crate::object::BvhHook
    pub fn clear<O: BvhObject>(&mut self, objects: &mut [O]) {
        for node in 0..self.nodes.len() {
            let mut cursor = self.nodes[node].first;
            while let Some(obj) = cursor {
                let hook = objects[obj.0].hook_mut();
                // Capture the follower before resetting the link block.
                cursor = hook.next;
                *hook = BvhHook::default();
            }
        }
        self.nodes.clear();
        self.root = None;
        self.object_count = 0;
        debug!("cleared bvh");
    }

    /// Visits every node reachable from the root in level order.
    pub fn traverse_level_order(&self, f: impl FnMut(NodeId)) {
        if let Some(root) = self.root {
            self.traverse_level_order_from(root, f);
        }
    }

    /// Visits every node of the subtree rooted at `start` in level order.
    pub fn traverse_level_order_from(&self, start: NodeId, mut f: impl FnMut(NodeId)) {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            for child in self.node(id).children.into_iter().flatten() {
                queue.push_back(child);
            }
            f(id);
        }
    }

    /// Visits every object reachable from the root, leaf by leaf in level
    /// order.
    pub fn traverse_level_order_objects<O: BvhObject>(
        &self,
        objects: &[O],
        f: impl FnMut(&O),
    ) {
        if let Some(root) = self.root {
            self.traverse_level_order_objects_from(root, objects, f);
        }
    }

    /// Visits every object of the subtree rooted at `start`, leaf by leaf in
    /// level order.
    pub fn traverse_level_order_objects_from<O: BvhObject>(
        &self,
        start: NodeId,
        objects: &[O],
        mut f: impl FnMut(&O),
    ) {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            for child in node.children.into_iter().flatten() {
                queue.push_back(child);
            }
            if !node.is_leaf() {
                continue;
            }

            let mut cursor = node.first;
            while let Some(obj) = cursor {
                // Capture the follower first so the callback may relink the
                // current object.
                cursor = objects[obj.0].hook().next;
                f(&objects[obj.0]);
            }
        }
    }

    /// Appends the object at `obj` to the list of the leaf `leaf`.
    ///
    /// A no-op when the leaf already owns the object. An object owned by
    /// another leaf is unlinked first; its neighbours and, when it was the
    /// head or tail, the old owner's `first`/`last` are patched around it.
    pub(crate) fn add_object<O: BvhObject>(
        &mut self,
        leaf: NodeId,
        obj: ObjectIndex,
        objects: &mut [O],
    ) {
        let hook = *objects[obj.0].hook();
        if hook.owner == Some(leaf) {
            return;
        }

        if let Some(old_owner) = hook.owner {
            match hook.prev {
                Some(prev) => objects[prev.0].hook_mut().next = hook.next,
                None => self.nodes[old_owner.idx()].first = hook.next,
            }
            match hook.next {
                Some(next) => objects[next.0].hook_mut().prev = hook.prev,
                None => self.nodes[old_owner.idx()].last = hook.prev,
            }
        }

        // Append at the tail.
        let old_last = self.nodes[leaf.idx()].last;
        {
            let hook = objects[obj.0].hook_mut();
            hook.prev = old_last;
            hook.next = None;
            hook.owner = Some(leaf);
        }
        if let Some(last) = old_last {
            objects[last.0].hook_mut().next = Some(obj);
        }
        let node = &mut self.nodes[leaf.idx()];
        node.last = Some(obj);
        if node.first.is_none() {
            node.first = Some(obj);
        }
    }

    /// Checks the structural invariants of the tree: every internal node has
    /// exactly two children and owns no objects, every parent volume
    /// contains its children's, every leaf owns at least one object whose
    /// volume it contains, the intrusive lists are consistent in both
    /// directions, every arena node is reachable from the root, and the
    /// cached object count matches the lists.
    pub fn is_consistent<O: BvhObject>(&self, objects: &[O]) -> bool {
        let Some(root) = self.root else {
            return self.nodes.is_empty() && self.object_count == 0;
        };

        let mut ok = true;
        let mut visited_nodes = 0;
        let mut listed_objects = 0;
        let mut seen = vec![false; objects.len()];

        self.traverse_level_order_from(root, |id| {
            visited_nodes += 1;
            let node = self.node(id);

            if node.is_leaf() {
                ok &= node.children[1].is_none();
                ok &= node.first.is_some() && node.last.is_some();

                let mut prev = None;
                let mut cursor = node.first;
                while let Some(obj) = cursor {
                    let Some(object) = objects.get(obj.0) else {
                        ok = false;
                        break;
                    };
                    let hook = object.hook();
                    ok &= hook.owner == Some(id);
                    ok &= hook.prev == prev;
                    ok &= node.bv.approx_contains_aabb_eps(&object.aabb(), EPSILON);
                    if seen[obj.0] {
                        // Reached twice; bail out instead of looping.
                        ok = false;
                        break;
                    }
                    seen[obj.0] = true;
                    listed_objects += 1;
                    prev = cursor;
                    cursor = hook.next;
                }
                ok &= node.last == prev;
            } else {
                ok &= node.first.is_none() && node.last.is_none();
                for child in node.children {
                    match child {
                        Some(child) => {
                            ok &= node.bv.approx_contains_aabb_eps(&self.node(child).bv, EPSILON);
                        }
                        None => ok = false,
                    }
                }
            }
        });

        ok && visited_nodes == self.nodes.len() && listed_objects == self.object_count
    }
}
