#![forbid(unsafe_code)]

//! Windowed list virtualization with node recycling.
//!
//! A [`RecyclingList`] holds an unbounded, append-only sequence of records
//! but keeps at most [`ListConfig::capacity`] render nodes attached. As the
//! host scrolls, nodes leaving one edge of the window are rebound to records
//! entering the other, and a leading offset stands in for the records
//! scrolled past. Reaching the last stored record hands the host a
//! [`LoadRequest`] for the next page.
//!
//! # Example
//!
//! ```
//! use recyclist_list::{ListConfig, RecordingSurface, RecyclingList, ScrollMetrics};
//!
//! let config = ListConfig::new().with_capacity(3).with_page_size(10);
//! let mut list: RecyclingList<u64, _> = RecyclingList::new(config, RecordingSurface::new());
//! list.append(0..10);
//! assert_eq!(list.window().range(), 0..3);
//!
//! list.on_scroll(ScrollMetrics::new(20.0, 40.0, 20.0));
//! assert_eq!(list.window().range(), 1..4);
//! assert_eq!(list.visual_offset(), 20.0);
//! ```

pub mod config;
pub mod delegate;
pub mod engine;
pub mod error;
pub mod load;
pub mod pool;
pub mod store;
pub mod surface;

pub use config::ListConfig;
pub use delegate::{HitTarget, HoverTracker};
pub use engine::{RecyclingList, ScrollMetrics, ScrollOutcome};
pub use error::{FetchError, FetchResult};
pub use load::{DataProvider, LoadGuard, LoadLock, LoadRequest, PageQuery};
pub use pool::{Attach, Edge, NodeId, NodePool};
pub use store::{RecordStore, Window};
pub use surface::{RecordingSurface, RenderSurface, SurfaceOp};

/// A record that can be told apart from its neighbours.
///
/// The key only feeds diagnostics and recording surfaces; the list itself
/// addresses records by index.
pub trait Record {
    fn key(&self) -> u64;
}

impl Record for u32 {
    fn key(&self) -> u64 {
        u64::from(*self)
    }
}

impl Record for u64 {
    fn key(&self) -> u64 {
        *self
    }
}

impl Record for usize {
    fn key(&self) -> u64 {
        *self as u64
    }
}
