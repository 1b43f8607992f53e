//! The contract between user scene objects and the hierarchy.
//!
//! The hierarchy never owns or copies scene objects. The caller keeps them
//! in a slice and hands that slice to every operation; objects are referred
//! to by their position in it. In exchange, each object embeds a [`BvhHook`]
//! — a block of intrusive link fields the hierarchy threads its per-leaf
//! object lists through. The hierarchy mutates only the hook; bounds and ids
//! are read, never written.

use crate::aabb::Bounded;
use crate::bvh::NodeId;

/// Position of an object inside the slice the [`Bvh`] operates over.
///
/// [`Bvh`]: crate::bvh::Bvh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIndex(pub usize);

/// The intrusive link block every object participating in a [`Bvh`] embeds.
///
/// A default-constructed hook is detached. While the object belongs to a
/// tree, `owner` names the leaf holding it and `prev`/`next` chain the
/// objects of that leaf. [`Bvh::clear`] restores every hook to the detached
/// state.
///
/// [`Bvh`]: crate::bvh::Bvh
/// [`Bvh::clear`]: crate::bvh::Bvh::clear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhHook {
    pub(crate) prev: Option<ObjectIndex>,
    pub(crate) next: Option<ObjectIndex>,
    pub(crate) owner: Option<NodeId>,
}

impl BvhHook {
    /// The leaf owning this object, if it belongs to a tree.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// The previous object in the owning leaf's list.
    pub fn prev(&self) -> Option<ObjectIndex> {
        self.prev
    }

    /// The next object in the owning leaf's list.
    pub fn next(&self) -> Option<ObjectIndex> {
        self.next
    }

    /// Returns true while the object belongs to a tree.
    pub fn is_linked(&self) -> bool {
        self.owner.is_some()
    }
}

/// A trait implemented by objects a [`Bvh`] can be built over.
///
/// Implementors provide a world-space bounding volume (via [`Bounded`]), a
/// caller-chosen identifier reported by queries, and access to the embedded
/// [`BvhHook`]. The id is opaque to the hierarchy; queries echo it back.
///
/// [`Bvh`]: crate::bvh::Bvh
pub trait BvhObject: Bounded {
    /// The identifier reported for this object by queries.
    fn id(&self) -> u32;

    /// The embedded link block.
    fn hook(&self) -> &BvhHook;

    /// Mutable access to the embedded link block.
    fn hook_mut(&mut self) -> &mut BvhHook;
}
