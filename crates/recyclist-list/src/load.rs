#![forbid(unsafe_code)]

//! Load coordination: page queries, the load lock, and the provider seam.
//!
//! At most one "load more" fetch is in flight. The lock is taken when a
//! [`LoadRequest`] is handed out and released when the request's
//! [`LoadGuard`] is dropped, which happens when the request is completed,
//! whatever the outcome, or when the host abandons it. A failed or lost
//! fetch therefore never leaves the list locked.
//!
//! The guard is `Send`, so hosts are free to run the fetch on a worker
//! thread and hand the request back to the list when the page arrives.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use recyclist_core::geometry::Extent;

use crate::error::FetchResult;

/// Parameters of one page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Offset of the first record requested.
    pub start: usize,
    /// Maximum number of records requested.
    pub page_size: usize,
    /// Spatial filter, `None` for the unfiltered dataset.
    pub filter: Option<Extent>,
    /// Query context the fetch was issued under.
    pub generation: u64,
}

/// Source of pages.
///
/// Implementations may block; the list itself never calls a provider, hosts
/// do, on whatever thread suits them.
pub trait DataProvider<R> {
    fn fetch(&self, query: &PageQuery) -> FetchResult<Vec<R>>;
}

impl<R, P: DataProvider<R> + ?Sized> DataProvider<R> for &P {
    fn fetch(&self, query: &PageQuery) -> FetchResult<Vec<R>> {
        (**self).fetch(query)
    }
}

impl<R, P: DataProvider<R> + ?Sized> DataProvider<R> for Arc<P> {
    fn fetch(&self, query: &PageQuery) -> FetchResult<Vec<R>> {
        (**self).fetch(query)
    }
}

/// Mutual-exclusion flag for "load more" fetches.
#[derive(Debug, Clone, Default)]
pub struct LoadLock {
    held: Arc<AtomicBool>,
}

impl LoadLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock, or `None` if a load is already in flight.
    pub fn try_acquire(&self) -> Option<LoadGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard {
                held: Arc::clone(&self.held),
            })
    }

    #[inline]
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases the [`LoadLock`] when dropped.
#[must_use = "dropping the guard releases the load lock"]
pub struct LoadGuard {
    held: Arc<AtomicBool>,
}

impl fmt::Debug for LoadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadGuard").finish_non_exhaustive()
    }
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}

/// A "load more" fetch the host must run and hand back.
///
/// Owns the load lock until it is passed to
/// [`RecyclingList::complete_load`](crate::RecyclingList::complete_load) or
/// dropped.
#[derive(Debug)]
pub struct LoadRequest {
    query: PageQuery,
    _guard: LoadGuard,
}

impl LoadRequest {
    pub(crate) fn new(query: PageQuery, guard: LoadGuard) -> Self {
        Self {
            query,
            _guard: guard,
        }
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> &PageQuery {
        &self.query
    }

    /// Run the fetch against `provider` on the current thread.
    pub fn fetch<R>(&self, provider: &impl DataProvider<R>) -> FetchResult<Vec<R>> {
        provider.fetch(&self.query)
    }

    /// Split into the query and the guard still holding the lock.
    pub(crate) fn into_parts(self) -> (PageQuery, LoadGuard) {
        (self.query, self._guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    fn query() -> PageQuery {
        PageQuery {
            start: 10,
            page_size: 10,
            filter: None,
            generation: 0,
        }
    }

    #[test]
    fn lock_is_exclusive() {
        let lock = LoadLock::new();
        let guard = lock.try_acquire();
        assert!(guard.is_some());
        assert!(lock.is_held());
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(!lock.is_held());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn request_releases_on_drop() {
        let lock = LoadLock::new();
        let guard = lock.try_acquire().expect("free lock");
        let request = LoadRequest::new(query(), guard);
        assert!(lock.is_held());
        assert_eq!(request.query().start, 10);
        drop(request);
        assert!(!lock.is_held());
    }

    #[test]
    fn guard_crosses_threads() {
        let lock = LoadLock::new();
        let request = LoadRequest::new(query(), lock.try_acquire().expect("free lock"));
        let handle = std::thread::spawn(move || request.into_parts().0);
        let query = handle.join().expect("worker finished");
        assert_eq!(query.page_size, 10);
        assert!(!lock.is_held());
    }

    struct Fixed;

    impl DataProvider<u32> for Fixed {
        fn fetch(&self, query: &PageQuery) -> FetchResult<Vec<u32>> {
            if query.start > 100 {
                return Err(FetchError::InvalidQuery("start".into()));
            }
            Ok((query.start as u32..(query.start + query.page_size) as u32).collect())
        }
    }

    #[test]
    fn fetch_through_references() {
        let lock = LoadLock::new();
        let request = LoadRequest::new(query(), lock.try_acquire().expect("free lock"));
        let shared = Arc::new(Fixed);
        let via_arc: FetchResult<Vec<u32>> = request.fetch(&shared);
        assert_eq!(via_arc.map(|v| v.len()), Ok(10));
        let via_ref: FetchResult<Vec<u32>> = request.fetch(&&Fixed);
        assert_eq!(via_ref.map(|v| v[0]), Ok(10));
    }
}
