#![forbid(unsafe_code)]

//! The recycling list.
//!
//! [`RecyclingList`] ties the record store, the node pool, the load lock and
//! the hover tracker together and drives a [`RenderSurface`]. Everything runs
//! on the caller's thread: the host forwards scroll metrics and pointer hit
//! chains, runs the page fetches it is handed, and passes the results back.
//!
//! # Compaction
//!
//! With `h` the item height and `offset` the leading space:
//!
//! ```text
//! content  = offset + attached * h
//! bottom   : scroll_top + viewport > content - threshold
//!            recycle floor((scroll_top - offset) / h) head nodes to the tail
//! top      : scroll_top < offset - threshold
//!            recycle ceil((offset - scroll_top) / h) tail nodes to the head
//! ```
//!
//! Both counts are clamped to the records available in that direction. The
//! offset is held in rows, so it is always `first * h` for the latest `h`
//! even when the host reports a new item height. It is pushed to the surface
//! once per batch.
//!
//! # Loading
//!
//! A bottom compaction that leaves the window on the last stored record asks
//! for the next page, unless a load is in flight or the data is exhausted.
//! Compaction itself keeps running while a page is outstanding.

use recyclist_core::geometry::Extent;
use recyclist_core::{debug, debug_span, trace, warn};

use crate::config::ListConfig;
use crate::delegate::{HitTarget, HoverTracker, Subscribers};
use crate::error::FetchResult;
use crate::load::{LoadLock, LoadRequest, PageQuery};
use crate::pool::{Attach, Edge, NodeId, NodePool};
use crate::store::{RecordStore, Window};
use crate::surface::RenderSurface;

/// Scroll geometry reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top of the content.
    pub scroll_top: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
    /// Height of one record's node. Uniform across the list.
    pub item_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(scroll_top: f64, viewport_height: f64, item_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            item_height,
        }
    }

    /// Finite values, a positive item height and a non-negative viewport.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.scroll_top.is_finite()
            && self.viewport_height.is_finite()
            && self.viewport_height >= 0.0
            && self.item_height.is_finite()
            && self.item_height > 0.0
    }
}

/// What a scroll event did.
#[derive(Debug, Default)]
pub struct ScrollOutcome {
    /// Nodes moved from the head to the tail.
    pub to_tail: usize,
    /// Nodes moved from the tail to the head.
    pub to_head: usize,
    /// Next page to fetch, if one was started.
    pub load: Option<LoadRequest>,
}

impl ScrollOutcome {
    /// Total nodes recycled.
    #[inline]
    #[must_use]
    pub fn recycled(&self) -> usize {
        self.to_tail + self.to_head
    }
}

/// A windowed list that renders a bounded number of nodes.
pub struct RecyclingList<R, S> {
    config: ListConfig,
    store: RecordStore<R>,
    pool: NodePool,
    surface: S,
    last_metrics: Option<ScrollMetrics>,
    lock: LoadLock,
    exhausted: bool,
    filter: Option<Extent>,
    generation: u64,
    hover: HoverTracker,
    subscribers: Subscribers<R>,
}

impl<R, S: RenderSurface<R> + std::fmt::Debug> std::fmt::Debug for RecyclingList<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecyclingList")
            .field("config", &self.config)
            .field("records", &self.store.len())
            .field("window", &self.store.window())
            .field("pool", &self.pool)
            .field("surface", &self.surface)
            .field("visual_offset", &self.visual_offset())
            .field("loading", &self.lock.is_held())
            .field("exhausted", &self.exhausted)
            .field("generation", &self.generation)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

impl<R, S: RenderSurface<R>> RecyclingList<R, S> {
    #[must_use]
    pub fn new(config: ListConfig, surface: S) -> Self {
        let pool = NodePool::new(config.capacity);
        Self {
            config,
            store: RecordStore::new(),
            pool,
            surface,
            last_metrics: None,
            lock: LoadLock::new(),
            exhausted: false,
            filter: None,
            generation: 0,
            hover: HoverTracker::new(),
            subscribers: Subscribers::default(),
        }
    }

    // --- Accessors ---

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &RecordStore<R> {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    #[inline]
    #[must_use]
    pub fn window(&self) -> Window {
        self.store.window()
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Leading space standing in for records before the window.
    ///
    /// Always `first * item_height` for the last reported item height.
    #[inline]
    #[must_use]
    pub fn visual_offset(&self) -> f64 {
        self.last_metrics.map_or(0.0, |m| self.offset_for(m.item_height))
    }

    #[inline]
    fn offset_for(&self, item_height: f64) -> f64 {
        self.store.window().first() as f64 * item_height
    }

    /// Total height of offset plus attached nodes.
    #[must_use]
    pub fn content_height(&self, item_height: f64) -> f64 {
        self.offset_for(item_height) + self.pool.attached() as f64 * item_height
    }

    /// Whether a "load more" page is outstanding.
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock.is_held()
    }

    /// Whether the provider returned an empty page for the current context.
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    #[must_use]
    pub fn filter(&self) -> Option<Extent> {
        self.filter
    }

    /// Query context counter, bumped by every viewport change.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record bound to `node`, if it is attached.
    #[must_use]
    pub fn node_record(&self, node: NodeId) -> Option<&R> {
        self.pool.binding(node).and_then(|index| self.store.get(index))
    }

    #[inline]
    #[must_use]
    pub fn hover_target(&self) -> Option<NodeId> {
        self.hover.target()
    }

    // --- Subscriptions ---

    /// Replace the hover subscriber.
    pub fn on_hover<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&R) + 'static,
    {
        self.subscribers.hover = Some(Box::new(f));
        self
    }

    /// Replace the leave subscriber.
    pub fn on_leave<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut() + 'static,
    {
        self.subscribers.leave = Some(Box::new(f));
        self
    }

    // --- Records ---

    /// Append records, attach nodes for them while the pool has room, and
    /// re-run bottom compaction against the last known scroll position.
    ///
    /// Returns the number of records added.
    pub fn append(&mut self, records: impl IntoIterator<Item = R>) -> usize {
        let added = self.store.append(records);
        if added == 0 {
            return 0;
        }
        let attached = self.fill();
        if attached > 0 {
            debug!(attached, total = self.store.len(), "nodes attached for new records");
        }
        if let Some(metrics) = self.last_metrics
            && self.is_past_bottom(&metrics)
        {
            self.compact_bottom(&metrics);
        }
        added
    }

    /// Drop every record and return to the initial empty state.
    ///
    /// Nodes are parked for reuse, the offset and the exhausted flag reset,
    /// and the surface is scrolled to the top. An outstanding load keeps its
    /// lock until it completes. Calling this twice is the same as once.
    pub fn clear(&mut self) {
        let detached = self.pool.detach_all();
        for &node in &detached {
            self.surface.detach(node);
        }
        self.store.reset();
        self.exhausted = false;
        self.hover.leave();
        if let Some(metrics) = self.last_metrics.as_mut() {
            metrics.scroll_top = 0.0;
        }
        self.surface.set_offset(0.0);
        self.surface.scroll_to_top();
        debug!(detached = detached.len(), "list cleared");
    }

    // --- Scrolling ---

    /// React to a scroll event.
    ///
    /// Unusable metrics (non-finite values, a non-positive item height) are
    /// ignored.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> ScrollOutcome {
        let mut outcome = ScrollOutcome::default();
        if !metrics.is_usable() {
            trace!(?metrics, "ignoring unusable scroll metrics");
            return outcome;
        }
        let previous = self.last_metrics.replace(metrics);
        if self.pool.attached() == 0 {
            return outcome;
        }
        // The offset is kept in rows; a new item height only rescales it.
        if previous.is_some_and(|p| p.item_height != metrics.item_height)
            && self.store.window().first() > 0
        {
            self.surface.set_offset(self.visual_offset());
            debug!(
                item_height = metrics.item_height,
                offset = self.visual_offset(),
                "item height changed"
            );
        }

        let _span = debug_span!(
            "list_scroll",
            scroll_top = metrics.scroll_top,
            first = self.store.window().first()
        )
        .entered();

        if self.is_past_bottom(&metrics) {
            outcome.to_tail = self.compact_bottom(&metrics);
            if self.store.window_at_end() && !self.exhausted {
                outcome.load = self.begin_load();
            }
        }
        // A pool shorter than the viewport is always "past the bottom", so
        // the top edge is still checked when nothing moved down.
        if outcome.to_tail == 0
            && metrics.scroll_top < self.offset_for(metrics.item_height) - self.config.threshold
        {
            outcome.to_head = self.compact_top(&metrics);
        }
        outcome
    }

    fn is_past_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.scroll_top + metrics.viewport_height
            > self.content_height(metrics.item_height) - self.config.threshold
    }

    /// Attach nodes at the tail for stored records past the window.
    fn fill(&mut self) -> usize {
        let mut attached = 0;
        while self.store.window().end() < self.store.len() {
            let index = self.store.window().end();
            let Some((node, how)) = self.pool.attach_tail(index) else {
                break;
            };
            self.store.window_mut().grow_tail();
            if let Some(record) = self.store.get(index) {
                self.surface.attach(node, index, record);
            }
            if how == Attach::Reused {
                trace!(node = node.id(), index, "parked node reused");
            }
            attached += 1;
        }
        attached
    }

    fn compact_bottom(&mut self, metrics: &ScrollMetrics) -> usize {
        let h = metrics.item_height;
        let units = ((metrics.scroll_top - self.offset_for(h)) / h).floor();
        if units < 1.0 {
            return 0;
        }
        let ahead = self.store.len() - self.store.window().end();
        let wanted = if units >= ahead as f64 {
            ahead
        } else {
            units as usize
        };

        let mut moved = 0;
        while moved < wanted {
            let index = self.store.window().end();
            let Some(node) = self.pool.recycle_head_to_tail(index) else {
                break;
            };
            self.store.window_mut().shift_forward();
            if let Some(record) = self.store.get(index) {
                self.surface.rebind(node, index, record, Edge::Tail);
            }
            moved += 1;
        }
        if moved > 0 {
            self.surface.set_offset(self.offset_for(h));
            debug!(
                moved,
                first = self.store.window().first(),
                offset = self.offset_for(h),
                "compacted toward tail"
            );
        }
        moved
    }

    fn compact_top(&mut self, metrics: &ScrollMetrics) -> usize {
        let h = metrics.item_height;
        let units = ((self.offset_for(h) - metrics.scroll_top) / h).ceil();
        if units < 1.0 {
            return 0;
        }
        let behind = self.store.window().first();
        let wanted = if units >= behind as f64 {
            behind
        } else {
            units as usize
        };

        let mut moved = 0;
        while moved < wanted {
            let Some(index) = self.store.window().first().checked_sub(1) else {
                break;
            };
            let Some(node) = self.pool.recycle_tail_to_head(index) else {
                break;
            };
            self.store.window_mut().shift_back();
            if let Some(record) = self.store.get(index) {
                self.surface.rebind(node, index, record, Edge::Head);
            }
            moved += 1;
        }
        if moved > 0 {
            self.surface.set_offset(self.offset_for(h));
            debug!(
                moved,
                first = self.store.window().first(),
                offset = self.offset_for(h),
                "compacted toward head"
            );
        }
        moved
    }

    // --- Loading ---

    fn begin_load(&mut self) -> Option<LoadRequest> {
        let Some(guard) = self.lock.try_acquire() else {
            trace!("load already in flight");
            return None;
        };
        let query = PageQuery {
            start: self.store.len(),
            page_size: self.config.page_size,
            filter: self.filter,
            generation: self.generation,
        };
        debug!(start = query.start, page_size = query.page_size, "requesting next page");
        Some(LoadRequest::new(query, guard))
    }

    /// Settle a "load more" request.
    ///
    /// Records are appended whatever context they were fetched under. An
    /// empty page for the current context marks the data exhausted. The load
    /// lock is released in every case. Returns the number of records added,
    /// or the provider's error.
    pub fn complete_load(
        &mut self,
        request: LoadRequest,
        result: FetchResult<Vec<R>>,
    ) -> FetchResult<usize> {
        let (query, _guard) = request.into_parts();
        let current = query.generation == self.generation;
        match result {
            Ok(records) => {
                if !current {
                    warn!(
                        start = query.start,
                        generation = query.generation,
                        "page from a superseded query"
                    );
                }
                if records.is_empty() {
                    if current {
                        self.exhausted = true;
                        debug!(start = query.start, "no more records");
                    }
                    return Ok(0);
                }
                Ok(self.append(records))
            }
            Err(err) => {
                warn!(start = query.start, error = %err, "page fetch failed");
                Err(err)
            }
        }
    }

    /// Start a new query context for `filter`.
    ///
    /// The list keeps its content until [`complete_refresh`] receives the
    /// first page of the new context.
    ///
    /// [`complete_refresh`]: Self::complete_refresh
    pub fn change_viewport(&mut self, filter: Option<Extent>) -> PageQuery {
        self.generation = self.generation.wrapping_add(1);
        self.filter = filter;
        debug!(generation = self.generation, "viewport changed");
        PageQuery {
            start: 0,
            page_size: self.config.page_size,
            filter,
            generation: self.generation,
        }
    }

    /// Replace the content with the first page of a refresh.
    ///
    /// On success the list is cleared and refilled. On failure the current
    /// content stays. Returns the number of records added.
    pub fn complete_refresh(
        &mut self,
        query: &PageQuery,
        result: FetchResult<Vec<R>>,
    ) -> FetchResult<usize> {
        match result {
            Ok(records) => {
                if query.generation != self.generation {
                    warn!(generation = query.generation, "refresh from a superseded query");
                }
                self.clear();
                if records.is_empty() {
                    self.exhausted = true;
                    return Ok(0);
                }
                Ok(self.append(records))
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, keeping current records");
                Err(err)
            }
        }
    }

    // --- Pointer ---

    /// Forward a pointer-over hit chain.
    ///
    /// Returns `true` when the hover subscriber was notified.
    pub fn pointer_over(&mut self, chain: &[HitTarget]) -> bool {
        let Some((_, index)) = self.hover.resolve(chain, &self.pool) else {
            return false;
        };
        trace!(index, "hover target changed");
        match (self.store.get(index), self.subscribers.hover.as_mut()) {
            (Some(record), Some(notify)) => {
                notify(record);
                true
            }
            _ => false,
        }
    }

    /// The pointer left the list container.
    pub fn pointer_leave(&mut self) {
        self.hover.leave();
        if let Some(notify) = self.subscribers.leave.as_mut() {
            notify();
        }
    }
}
