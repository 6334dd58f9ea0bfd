#![forbid(unsafe_code)]

//! Append-only record storage and the window of bound indices.

use std::ops::Range;

/// A contiguous range of record indices that currently have a bound node.
///
/// Stored as `first` plus `count` so the empty window needs no sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    first: usize,
    count: usize,
}

impl Window {
    /// Index of the first bound record.
    #[inline]
    #[must_use]
    pub fn first(&self) -> usize {
        self.first
    }

    /// Index of the last bound record, `None` when nothing is bound.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.count.checked_sub(1).map(|n| self.first + n)
    }

    /// Number of bound records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Half-open index range (`first..=last` as `first..last + 1`).
    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.first..self.first + self.count
    }

    /// Index one past the last bound record.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.first + self.count
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range().contains(&index)
    }

    pub(crate) fn grow_tail(&mut self) {
        self.count += 1;
    }

    pub(crate) fn shift_forward(&mut self) {
        self.first += 1;
    }

    pub(crate) fn shift_back(&mut self) {
        self.first -= 1;
    }
}

/// Ordered, append-only sequence of fetched records.
///
/// Indices are dense and stable: once appended, a record keeps its index
/// until the next [`reset`](RecordStore::reset).
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    window: Window,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RecordStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            window: Window::default(),
        }
    }

    /// Append records to the end. Leaves the window alone.
    ///
    /// Returns the number of records added.
    pub fn append(&mut self, records: impl IntoIterator<Item = R>) -> usize {
        let before = self.records.len();
        self.records.extend(records);
        self.records.len() - before
    }

    /// Drop every record and empty the window.
    pub fn reset(&mut self) {
        self.records.clear();
        self.window = Window::default();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    #[inline]
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// Whether the window ends at the last stored record.
    #[must_use]
    pub fn window_at_end(&self) -> bool {
        !self.window.is_empty() && self.window.end() == self.records.len()
    }

    /// Records currently covered by the window, in order.
    pub fn windowed(&self) -> &[R] {
        &self.records[self.window.range()]
    }

    /// Iterate over every stored record.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_indices_stable() {
        let mut store = RecordStore::new();
        assert_eq!(store.append(vec![10, 11]), 2);
        assert_eq!(store.append(vec![12]), 1);
        assert_eq!(store.get(0), Some(&10));
        assert_eq!(store.get(2), Some(&12));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn append_empty_is_noop() {
        let mut store: RecordStore<u8> = RecordStore::new();
        assert_eq!(store.append(Vec::new()), 0);
        assert!(store.is_empty());
        assert!(store.window().is_empty());
    }

    #[test]
    fn append_does_not_touch_window() {
        let mut store = RecordStore::new();
        store.append(0..5);
        store.window_mut().grow_tail();
        store.append(5..8);
        assert_eq!(store.window().range(), 0..1);
    }

    #[test]
    fn reset_clears_records_and_window() {
        let mut store = RecordStore::new();
        store.append(0..4);
        store.window_mut().grow_tail();
        store.window_mut().grow_tail();
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.window(), Window::default());

        store.reset();
        assert!(store.is_empty());
    }

    #[test]
    fn window_bounds() {
        let mut w = Window::default();
        assert_eq!(w.last(), None);
        assert!(w.is_empty());

        w.grow_tail();
        w.grow_tail();
        w.grow_tail();
        assert_eq!((w.first(), w.last()), (0, Some(2)));

        w.shift_forward();
        assert_eq!((w.first(), w.last()), (1, Some(3)));
        assert!(w.contains(3));
        assert!(!w.contains(0));

        w.shift_back();
        assert_eq!(w.range(), 0..3);
        assert_eq!(w.end(), 3);
    }

    #[test]
    fn window_at_end_tracks_store_length() {
        let mut store = RecordStore::new();
        assert!(!store.window_at_end());
        store.append(0..2);
        store.window_mut().grow_tail();
        assert!(!store.window_at_end());
        store.window_mut().grow_tail();
        assert!(store.window_at_end());
        assert_eq!(store.windowed(), &[0, 1]);
    }
}
