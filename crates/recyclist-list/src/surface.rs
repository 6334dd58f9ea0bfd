#![forbid(unsafe_code)]

//! The render-surface seam.
//!
//! The list never lays out pixels. It tells a [`RenderSurface`] which node
//! shows which record, where nodes move in the visual order, and how much
//! leading space stands in for recycled-away content. The surface owns the
//! actual containers, keyed by [`NodeId`].

use std::collections::{HashMap, VecDeque};

use crate::Record;
use crate::pool::{Edge, NodeId};

/// Receiver of layout instructions.
pub trait RenderSurface<R> {
    /// A node joined the tail of the visual order, bound to `record`.
    fn attach(&mut self, node: NodeId, index: usize, record: &R);

    /// An attached node now shows `record` and moved to `edge`.
    ///
    /// The node always comes from the opposite edge, so implementations can
    /// move it in constant time. Only the displayed fields change; the
    /// container keeps its identity.
    fn rebind(&mut self, node: NodeId, index: usize, record: &R, edge: Edge);

    /// A node left the visual order. It may be attached again later.
    fn detach(&mut self, node: NodeId);

    /// Leading space before the first attached node.
    fn set_offset(&mut self, offset: f64);

    /// Reset the scroll position of the containing viewport.
    fn scroll_to_top(&mut self);
}

/// Discards every instruction.
impl<R> RenderSurface<R> for () {
    fn attach(&mut self, _node: NodeId, _index: usize, _record: &R) {}
    fn rebind(&mut self, _node: NodeId, _index: usize, _record: &R, _edge: Edge) {}
    fn detach(&mut self, _node: NodeId) {}
    fn set_offset(&mut self, _offset: f64) {}
    fn scroll_to_top(&mut self) {}
}

/// One instruction as seen by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Attach { node: NodeId, index: usize, key: u64 },
    Rebind { node: NodeId, index: usize, key: u64, edge: Edge },
    Detach { node: NodeId },
    SetOffset(f64),
    ScrollToTop,
}

/// Surface that logs every instruction and mirrors the resulting layout.
///
/// Useful for tests and for hosts that apply instructions in batches.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    order: VecDeque<NodeId>,
    bound: HashMap<NodeId, usize>,
    offset: f64,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every instruction received so far.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the instruction log, leaving the mirrored layout intact.
    pub fn drain_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Record indices shown, in visual order.
    #[must_use]
    pub fn shown(&self) -> Vec<usize> {
        self.order
            .iter()
            .filter_map(|node| self.bound.get(node).copied())
            .collect()
    }

    /// Attached nodes, in visual order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        self.order.iter().copied().collect()
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

impl<R: Record> RenderSurface<R> for RecordingSurface {
    fn attach(&mut self, node: NodeId, index: usize, record: &R) {
        self.order.push_back(node);
        self.bound.insert(node, index);
        self.ops.push(SurfaceOp::Attach {
            node,
            index,
            key: record.key(),
        });
    }

    fn rebind(&mut self, node: NodeId, index: usize, record: &R, edge: Edge) {
        let moved = match edge {
            Edge::Head => self.order.pop_back(),
            Edge::Tail => self.order.pop_front(),
        };
        debug_assert_eq!(moved, Some(node), "rebound node not at the opposite edge");
        match edge {
            Edge::Head => self.order.push_front(node),
            Edge::Tail => self.order.push_back(node),
        }
        self.bound.insert(node, index);
        self.ops.push(SurfaceOp::Rebind {
            node,
            index,
            key: record.key(),
            edge,
        });
    }

    fn detach(&mut self, node: NodeId) {
        self.order.retain(|&n| n != node);
        self.bound.remove(&node);
        self.ops.push(SurfaceOp::Detach { node });
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.ops.push(SurfaceOp::SetOffset(offset));
    }

    fn scroll_to_top(&mut self) {
        self.ops.push(SurfaceOp::ScrollToTop);
    }
}
