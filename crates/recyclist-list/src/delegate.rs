#![forbid(unsafe_code)]

//! Pointer interaction delegated from the whole list to bound records.
//!
//! The host registers one listener per gesture on the list container and
//! forwards the hit chain of each pointer event. The delegate resolves the
//! chain to the nearest node carrying a record and notifies the single
//! subscriber of that gesture.
//!
//! Repeated events inside the same node collapse into one notification. The
//! remembered target is a [`NodeId`], not the record, so a node that gets
//! recycled while the pointer rests on it is not announced again.

use std::fmt;

use crate::pool::{NodeId, NodePool};

/// One element of a pointer hit chain, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A field cell inside a node. Carries no record itself.
    Field { column: u16 },
    /// A node container.
    Node(NodeId),
    /// Leading padding or other space outside any node.
    Padding,
}

/// Remembers which node was last announced.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    target: Option<NodeId>,
    notifications: u64,
}

impl HoverTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a hit chain against the pool.
    ///
    /// Returns the node and its bound record index when this is a new
    /// target; `None` when the chain has no bound node or the node is the
    /// one already announced.
    pub fn resolve(&mut self, chain: &[HitTarget], pool: &NodePool) -> Option<(NodeId, usize)> {
        let (node, index) = chain.iter().find_map(|target| match *target {
            HitTarget::Node(node) => pool.binding(node).map(|index| (node, index)),
            HitTarget::Field { .. } | HitTarget::Padding => None,
        })?;
        if self.target == Some(node) {
            return None;
        }
        self.target = Some(node);
        self.notifications = self.notifications.saturating_add(1);
        Some((node, index))
    }

    /// Forget the target because the pointer left the list.
    ///
    /// Returns the node that was hovered, if any.
    pub fn leave(&mut self) -> Option<NodeId> {
        self.target.take()
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Hover notifications emitted so far (diagnostic).
    #[inline]
    #[must_use]
    pub fn notification_count(&self) -> u64 {
        self.notifications
    }
}

type HoverFn<R> = Box<dyn FnMut(&R)>;
type LeaveFn = Box<dyn FnMut()>;

/// Single-subscriber callback slots.
pub(crate) struct Subscribers<R> {
    pub(crate) hover: Option<HoverFn<R>>,
    pub(crate) leave: Option<LeaveFn>,
}

impl<R> Default for Subscribers<R> {
    fn default() -> Self {
        Self {
            hover: None,
            leave: None,
        }
    }
}

impl<R> fmt::Debug for Subscribers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("hover", &self.hover.is_some())
            .field("leave", &self.leave.is_some())
            .finish()
    }
}
