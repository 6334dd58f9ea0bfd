#![forbid(unsafe_code)]

//! Recyclist public facade crate.
//!
//! Re-exports the list engine and the core primitives, and offers a
//! lightweight prelude for hosts.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use recyclist_core::debounce::{DEFAULT_QUIESCENCE, Debouncer};
pub use recyclist_core::geometry::{Extent, Point};

// --- List re-exports -------------------------------------------------------

pub use recyclist_list::{
    DataProvider, Edge, FetchError, FetchResult, HitTarget, ListConfig, LoadRequest, NodeId,
    PageQuery, Record, RecordingSurface, RecyclingList, RenderSurface, ScrollMetrics,
    ScrollOutcome, SurfaceOp, Window,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Recyclist hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while reading data or writing output.
    Io(std::io::Error),
    /// A page fetch failed.
    Fetch(FetchError),
    /// Malformed input data or arguments.
    Data(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Data(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Fetch(err) => Some(err),
            Self::Data(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

/// Standard result type for Recyclist hosts.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DataProvider, Debouncer, Error, Extent, FetchError, HitTarget, ListConfig, PageQuery,
        Point, Record, RecyclingList, RenderSurface, Result, ScrollMetrics,
    };

    pub use crate::{core, list};
}

pub use recyclist_core as core;
pub use recyclist_list as list;
