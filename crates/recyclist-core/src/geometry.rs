#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! [`Extent`] is the spatial filter attached to every page query: an
//! axis-aligned box in map units (longitude/latitude for the demo layer).
//! Edges are inclusive so a feature lying exactly on the border of two
//! adjacent extents matches both.

/// A point in map units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box used as a spatial filter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// West edge (inclusive).
    pub xmin: f64,
    /// South edge (inclusive).
    pub ymin: f64,
    /// East edge (inclusive).
    pub xmax: f64,
    /// North edge (inclusive).
    pub ymax: f64,
}

impl Extent {
    /// Create an extent from two corners, normalizing their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            xmin: x1.min(x2),
            ymin: y1.min(y2),
            xmax: x1.max(x2),
            ymax: y1.max(y2),
        }
    }

    /// Create an extent of the given size centered on `center`.
    ///
    /// Negative sizes are treated as zero.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let half_w = width.max(0.0) / 2.0;
        let half_h = height.max(0.0) / 2.0;
        Self {
            xmin: center.x - half_w,
            ymin: center.y - half_h,
            xmax: center.x + half_w,
            ymax: center.y + half_h,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.xmin + self.width() / 2.0,
            self.ymin + self.height() / 2.0,
        )
    }

    /// Check if the extent covers no area.
    ///
    /// Extents with NaN edges are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.xmax > self.xmin && self.ymax > self.ymin)
    }

    /// Check if a point lies inside the extent (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.xmin && point.x <= self.xmax && point.y >= self.ymin && point.y <= self.ymax
    }

    /// Compute the overlap with another extent, returning `None` if disjoint.
    pub fn intersection_opt(&self, other: &Extent) -> Option<Extent> {
        let xmin = self.xmin.max(other.xmin);
        let ymin = self.ymin.max(other.ymin);
        let xmax = self.xmax.min(other.xmax);
        let ymax = self.ymax.min(other.ymax);

        if xmin <= xmax && ymin <= ymax {
            Some(Extent {
                xmin,
                ymin,
                xmax,
                ymax,
            })
        } else {
            None
        }
    }

    /// Smallest extent containing both.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            xmin: self.xmin.min(other.xmin),
            ymin: self.ymin.min(other.ymin),
            xmax: self.xmax.max(other.xmax),
            ymax: self.ymax.max(other.ymax),
        }
    }

    /// Shift the extent by `(dx, dy)` map units (a pan).
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Extent {
        Extent {
            xmin: self.xmin + dx,
            ymin: self.ymin + dy,
            xmax: self.xmax + dx,
            ymax: self.ymax + dy,
        }
    }

    /// Scale the extent around its center (a zoom).
    ///
    /// A factor below 1 zooms in. Non-positive or non-finite factors leave
    /// the extent unchanged.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Extent {
        if !(factor.is_finite() && factor > 0.0) {
            return *self;
        }
        Extent::from_center(self.center(), self.width() * factor, self.height() * factor)
    }
}
