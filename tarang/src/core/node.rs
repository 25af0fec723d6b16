//! Grid node with lock-protected search state.
//!
//! A [`Node`] has two kinds of data:
//! - Immutable after generation: its coordinate and blocked flag.
//! - Search state shared by every front: cost, parent link and owner.
//!
//! The search state is held in atomics so nodes can be shared across worker
//! threads without `unsafe`. Atomicity alone does not make a claim correct:
//! the check-then-set of a claim must run under the coarse-cell lock that
//! covers the node (see [`HierarchicalMap::lock_for`](crate::HierarchicalMap::lock_for)).

use std::sync::atomic::{AtomicU32, Ordering};

use super::point::GridCoord;

/// Sentinel for "no node" in packed index slots.
const NO_NODE: u32 = u32::MAX;

/// Cost of a node that has never been reached.
pub const INFINITE_COST: u32 = u32::MAX;

/// Index of a node in its grid's dense node array.
///
/// Parent links and owner references are stored as indices into the same
/// grid, never as pointers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Position in the node array.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

#[inline]
fn unpack(raw: u32) -> Option<NodeIndex> {
    (raw != NO_NODE).then_some(NodeIndex(raw))
}

#[inline]
fn pack(index: Option<NodeIndex>) -> u32 {
    index.map_or(NO_NODE, |i| i.0)
}

/// One grid cell.
#[derive(Debug)]
pub struct Node {
    coord: GridCoord,
    blocked: bool,
    /// Path cost from the owning front's start (only ever decreases)
    cost: AtomicU32,
    /// Node this one was reached from
    parent: AtomicU32,
    /// Start node of the front that claims this node
    owner: AtomicU32,
}

impl Node {
    /// Create a free, unclaimed node.
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            blocked: false,
            cost: AtomicU32::new(INFINITE_COST),
            parent: AtomicU32::new(NO_NODE),
            owner: AtomicU32::new(NO_NODE),
        }
    }

    /// Cell coordinate.
    #[inline]
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Is this cell an obstacle?
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Set the occupancy flag. Only possible before the grid is shared.
    #[inline]
    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// Current best cost, [`INFINITE_COST`] if never reached.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn set_cost(&self, cost: u32) {
        self.cost.store(cost, Ordering::Release);
    }

    /// Node this one was reached from.
    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        unpack(self.parent.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn set_parent(&self, parent: Option<NodeIndex>) {
        self.parent.store(pack(parent), Ordering::Release);
    }

    /// Start node of the front currently claiming this node.
    ///
    /// Used only for identity comparison between fronts.
    #[inline]
    pub fn owner(&self) -> Option<NodeIndex> {
        unpack(self.owner.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn set_owner(&self, owner: Option<NodeIndex>) {
        self.owner.store(pack(owner), Ordering::Release);
    }

    /// Clear cost, parent and owner.
    pub fn reset(&self) {
        self.set_cost(INFINITE_COST);
        self.set_parent(None);
        self.set_owner(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unclaimed() {
        let node = Node::new(GridCoord::new(3, 4));
        assert_eq!(node.coord(), GridCoord::new(3, 4));
        assert!(!node.is_blocked());
        assert_eq!(node.cost(), INFINITE_COST);
        assert_eq!(node.parent(), None);
        assert_eq!(node.owner(), None);
    }

    #[test]
    fn test_state_roundtrip_and_reset() {
        let node = Node::new(GridCoord::new(0, 0));
        node.set_cost(7);
        node.set_parent(Some(NodeIndex(12)));
        node.set_owner(Some(NodeIndex(0)));

        assert_eq!(node.cost(), 7);
        assert_eq!(node.parent(), Some(NodeIndex(12)));
        assert_eq!(node.owner(), Some(NodeIndex(0)));

        node.reset();
        assert_eq!(node.cost(), INFINITE_COST);
        assert_eq!(node.parent(), None);
        assert_eq!(node.owner(), None);
    }
}
