#![forbid(unsafe_code)]

//! A headless map view: the current extent, debounced extent changes, and
//! the feature highlight driven by list hover.

use std::time::{Duration, Instant};

use recyclist::{Debouncer, Extent, Point};

/// Center of the initial view, longitude and latitude.
pub const HOME_CENTER: Point = Point::new(-122.59, 45.16);
/// Size of the initial view in degrees.
pub const HOME_SIZE: (f64, f64) = (1.2, 0.8);

/// Population mapped to the smallest marker.
const MIN_POP: f64 = 0.0;
/// Population mapped to the largest marker.
const MAX_POP: f64 = 500_000.0;
const MIN_MARKER: f64 = 10.0;
const MAX_MARKER: f64 = 25.0;

/// Marker size for a city, linear in population and clamped.
#[must_use]
pub fn marker_size(pop2000: u64) -> f64 {
    let t = ((pop2000 as f64 - MIN_POP) / (MAX_POP - MIN_POP)).clamp(0.0, 1.0);
    MIN_MARKER + t * (MAX_MARKER - MIN_MARKER)
}

/// A feature highlighted on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub objectid: u32,
}

#[derive(Debug)]
pub struct MapView {
    extent: Extent,
    changes: Debouncer<Extent>,
    highlight: Option<Highlight>,
    highlights_set: u32,
}

impl MapView {
    #[must_use]
    pub fn new(extent: Extent, quiescence: Duration) -> Self {
        Self {
            extent,
            changes: Debouncer::new(quiescence),
            highlight: None,
            highlights_set: 0,
        }
    }

    /// The view the demo starts from.
    #[must_use]
    pub fn home(quiescence: Duration) -> Self {
        Self::new(
            Extent::from_center(HOME_CENTER, HOME_SIZE.0, HOME_SIZE.1),
            quiescence,
        )
    }

    #[inline]
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Pan by a fraction of the current width and height.
    pub fn pan(&mut self, fx: f64, fy: f64, now: Instant) {
        let dx = self.extent.width() * fx;
        let dy = self.extent.height() * fy;
        self.set_extent(self.extent.translated(dx, dy), now);
    }

    /// Zoom around the center; factors below 1 zoom in.
    pub fn zoom(&mut self, factor: f64, now: Instant) {
        self.set_extent(self.extent.scaled(factor), now);
    }

    fn set_extent(&mut self, extent: Extent, now: Instant) {
        self.extent = extent;
        self.changes.push(extent, now);
    }

    /// The settled extent, once the view has been still long enough.
    pub fn poll_extent(&mut self, now: Instant) -> Option<Extent> {
        self.changes.poll(now)
    }

    /// Time until a pending extent settles.
    #[must_use]
    pub fn settle_in(&self, now: Instant) -> Option<Duration> {
        self.changes.remaining(now)
    }

    /// Extent changes swallowed by the debouncer so far.
    #[must_use]
    pub fn coalesced_changes(&self) -> u64 {
        self.changes.coalesced_count()
    }

    /// Highlight one feature, replacing the previous highlight.
    pub fn highlight(&mut self, objectid: u32) {
        self.highlight = Some(Highlight { objectid });
        self.highlights_set = self.highlights_set.saturating_add(1);
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    #[inline]
    #[must_use]
    pub fn highlighted(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Highlights set over the session.
    #[must_use]
    pub fn highlight_count(&self) -> u32 {
        self.highlights_set
    }
}
