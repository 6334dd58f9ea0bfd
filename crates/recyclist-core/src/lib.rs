#![forbid(unsafe_code)]

//! Core: logging facade, spatial extents, and rate limiting of host signals.

pub mod debounce;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
