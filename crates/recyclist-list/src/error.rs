#![forbid(unsafe_code)]

//! Errors reported by data providers.
//!
//! None of these are fatal to the list: a failed page leaves the window as it
//! was and the next scroll to the edge asks again.

use std::fmt;

/// Failure of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The provider could not be reached.
    Unavailable(String),
    /// The provider did not answer in time.
    Timeout,
    /// The provider rejected the query (bad offset, bad extent).
    InvalidQuery(String),
    /// Any other provider-side failure.
    Provider(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Unavailable(msg) => write!(f, "provider unavailable: {msg}"),
            FetchError::Timeout => write!(f, "provider timed out"),
            FetchError::InvalidQuery(msg) => write!(f, "invalid page query: {msg}"),
            FetchError::Provider(msg) => write!(f, "provider error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Result type for page fetches.
pub type FetchResult<T> = Result<T, FetchError>;
