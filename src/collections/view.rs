use std::collections::btree_map;
use std::iter::FusedIterator;

use crate::interval::Interval;

/// A borrowed run of consecutive entries of a [`DisjointRangeMap`], in key
/// order.
///
/// Spans are how the query algorithms compose without copying; the public
/// API always materializes them into owned containers or vectors. A span
/// borrows the map, so it cannot outlive a structural mutation.
///
/// [`DisjointRangeMap`]: super::DisjointRangeMap
#[derive(Debug)]
pub(crate) struct Span<'a, N, V>(Option<btree_map::Range<'a, Interval<N>, V>>);

impl<'a, N, V> Clone for Span<'a, N, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, N: 'a, V: 'a> Span<'a, N, V> {
    pub(crate) fn empty() -> Self {
        Self(None)
    }

    pub(crate) fn new(range: btree_map::Range<'a, Interval<N>, V>) -> Self {
        Self(Some(range))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.clone().next().is_none()
    }

    pub(crate) fn keys(self) -> impl DoubleEndedIterator<Item = &'a Interval<N>> {
        self.map(|(k, _)| k)
    }

    pub(crate) fn values(self) -> impl DoubleEndedIterator<Item = &'a V> {
        self.map(|(_, v)| v)
    }
}

impl<'a, N, V> Iterator for Span<'a, N, V> {
    type Item = (&'a Interval<N>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.as_mut()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.0 {
            Some(range) => range.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl<'a, N, V> DoubleEndedIterator for Span<'a, N, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.as_mut()?.next_back()
    }
}

impl<'a, N, V> FusedIterator for Span<'a, N, V> {}
