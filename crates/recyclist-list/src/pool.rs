#![forbid(unsafe_code)]

//! Fixed-capacity pool of reusable render nodes.
//!
//! Nodes are created lazily up to the capacity and never destroyed. Each
//! node keeps a stable [`NodeId`] for its whole life; only the record index
//! it is bound to changes when it is recycled. The visual order of attached
//! nodes is a deque, so moving a node between the two edges is O(1).
//!
//! # Invariants
//!
//! 1. `attached + parked == created <= capacity`.
//! 2. Every attached node is bound; every parked node is unbound.
//! 3. A node appears at most once across the visual order and the parked list.

use std::collections::VecDeque;

/// Stable identity of a render node.
///
/// The id survives recycling, so anything keyed by it on the host side
/// (listeners, hit regions) stays valid when the node shows another record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }

    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Which end of the visual order a node is placed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Head,
    Tail,
}

/// How a node came to be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attach {
    /// A brand-new node.
    Created,
    /// A parked node taken back into the visual order.
    Reused,
}

#[derive(Debug, Clone)]
pub struct NodePool {
    capacity: usize,
    /// Bound record index per created node, indexed by `NodeId`.
    bindings: Vec<Option<usize>>,
    /// Attached nodes in visual order (head = topmost).
    order: VecDeque<NodeId>,
    /// Detached nodes waiting for the next fill, popped from the back.
    parked: Vec<NodeId>,
}

impl NodePool {
    /// Create an empty pool.
    ///
    /// A zero capacity is raised to one; capacities beyond the `NodeId`
    /// range are lowered to `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, u32::MAX as usize);
        Self {
            capacity,
            bindings: Vec::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
            parked: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of nodes ever created.
    #[inline]
    #[must_use]
    pub fn created(&self) -> usize {
        self.bindings.len()
    }

    /// Number of nodes in the visual order.
    #[inline]
    #[must_use]
    pub fn attached(&self) -> usize {
        self.order.len()
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Record index bound to `node`, `None` if parked or unknown.
    #[must_use]
    pub fn binding(&self, node: NodeId) -> Option<usize> {
        self.bindings.get(node.slot()).copied().flatten()
    }

    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.order.front().copied()
    }

    #[must_use]
    pub fn tail(&self) -> Option<NodeId> {
        self.order.back().copied()
    }

    /// Attached nodes with their bound index, in visual order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.binding(id).map(|index| (id, index)))
    }

    /// Bind `index` to a parked or new node at the tail.
    ///
    /// Returns `None` when the pool is already full.
    pub fn attach_tail(&mut self, index: usize) -> Option<(NodeId, Attach)> {
        if self.is_full() {
            return None;
        }
        let (id, how) = match self.parked.pop() {
            Some(id) => (id, Attach::Reused),
            None => {
                let id = NodeId(u32::try_from(self.bindings.len()).ok()?);
                self.bindings.push(None);
                (id, Attach::Created)
            }
        };
        self.bindings[id.slot()] = Some(index);
        self.order.push_back(id);
        Some((id, how))
    }

    /// Rebind the head node to `index` and move it to the tail.
    pub fn recycle_head_to_tail(&mut self, index: usize) -> Option<NodeId> {
        let id = self.order.pop_front()?;
        self.bindings[id.slot()] = Some(index);
        self.order.push_back(id);
        Some(id)
    }

    /// Rebind the tail node to `index` and move it to the head.
    pub fn recycle_tail_to_head(&mut self, index: usize) -> Option<NodeId> {
        let id = self.order.pop_back()?;
        self.bindings[id.slot()] = Some(index);
        self.order.push_front(id);
        Some(id)
    }

    /// Unbind every attached node and park it.
    ///
    /// Returns the detached ids in their former visual order. The next fill
    /// re-attaches them head first.
    pub fn detach_all(&mut self) -> Vec<NodeId> {
        let detached: Vec<NodeId> = self.order.drain(..).collect();
        for &id in detached.iter().rev() {
            self.bindings[id.slot()] = None;
            self.parked.push(id);
        }
        detached
    }
}
