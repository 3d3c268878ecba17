use std::collections::btree_map;
use std::fmt;
use std::ops::{Sub, SubAssign};

use crate::error::Result;
use crate::interval::{Coordinate, Interval};

use super::DisjointRangeMap;

/// An ordered set of pairwise disjoint, non-empty [`Interval`]s.
///
/// All navigation is done by the underlying [`DisjointRangeMap`], so the
/// set has the same insertion rules and query costs.
#[derive(Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DisjointRangeSet<N>(DisjointRangeMap<N, ()>);

impl<N> Default for DisjointRangeSet<N> {
    #[inline(always)]
    fn default() -> Self {
        Self(DisjointRangeMap::default())
    }
}

impl<N: fmt::Debug> fmt::Debug for DisjointRangeSet<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.entries.keys()).finish()
    }
}

impl<N> IntoIterator for DisjointRangeSet<N> {
    type Item = Interval<N>;
    type IntoIter = btree_map::IntoKeys<Interval<N>, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.entries.into_keys()
    }
}

impl<'a, N> IntoIterator for &'a DisjointRangeSet<N> {
    type Item = &'a Interval<N>;
    type IntoIter = btree_map::Keys<'a, Interval<N>, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.entries.keys()
    }
}

impl<N: Coordinate> DisjointRangeSet<N> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set by [`add`](Self::add)ing each range in turn.
    pub fn try_from_ranges<I, K>(ranges: I) -> Result<Self, N>
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = K>,
    {
        DisjointRangeMap::try_from_entries(ranges.into_iter().map(|k| (k, ()))).map(Self)
    }

    /// Adds `range`, returning false if exactly that range was already
    /// present. Empty and overlapping ranges are refused, as by
    /// [`DisjointRangeMap::put`].
    #[inline(always)]
    pub fn add<K: Into<Interval<N>>>(&mut self, range: K) -> Result<bool, N> {
        self.0.put(range, ()).map(|previous| previous.is_none())
    }

    /// Adds `range` after removing every range it intersects; the removed
    /// ranges are returned.
    #[inline(always)]
    pub fn add_forcefully<K: Into<Interval<N>>>(&mut self, range: K) -> Result<DisjointRangeSet<N>, N> {
        self.0.put_forcefully(range, ()).map(Self)
    }

    /// Adds every range, or none of them if any would be refused.
    #[inline(always)]
    pub fn add_all<I, K>(&mut self, ranges: I) -> Result<(), N>
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = K>,
    {
        self.0.put_all(ranges.into_iter().map(|k| (k, ())))
    }

    /// Adds the ranges that are non-empty and don't intersect anything
    /// already present, skipping the rest.
    #[inline(always)]
    pub fn add_all_non_intersecting<I, K>(&mut self, ranges: I)
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = K>,
    {
        self.0.put_all_non_intersecting(ranges.into_iter().map(|k| (k, ())))
    }

    #[inline(always)]
    pub fn remove<K: Into<Interval<N>>>(&mut self, range: K) -> bool {
        self.0.remove(range).is_some()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// True if exactly `range` is in the set.
    #[inline(always)]
    pub fn contains<K: Into<Interval<N>>>(&self, range: K) -> bool {
        self.0.contains_key(range)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline(always)]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Interval<N>> {
        self.0.keys()
    }

    #[inline(always)]
    pub fn first(&self) -> Option<&Interval<N>> {
        self.0.first_key_value().map(|(k, _)| k)
    }

    #[inline(always)]
    pub fn last(&self) -> Option<&Interval<N>> {
        self.0.last_key_value().map(|(k, _)| k)
    }

    /// `[first.start, last.end]`, or [`Interval::empty`] for an empty set.
    #[inline(always)]
    pub fn bounding_range(&self) -> Interval<N> {
        self.0.bounding_range()
    }

    /// The underlying map, with a `()` value per range.
    #[inline(always)]
    pub fn as_map(&self) -> &DisjointRangeMap<N, ()> {
        &self.0
    }

    #[inline(always)]
    pub fn range_containing(&self, position: N) -> Option<&Interval<N>> {
        self.0.key_containing(position)
    }

    /// The single range enclosing `range`, if there is one.
    #[inline(always)]
    pub fn enclosing<K: Into<Interval<N>>>(&self, range: K) -> Option<&Interval<N>> {
        self.0.key_enclosing(range)
    }

    /// True if a single range encloses `range`: `{ [1,5], [6,10] }` encloses
    /// `[3,5]` but not `[3,6]`.
    #[inline(always)]
    pub fn encloses<K: Into<Interval<N>>>(&self, range: K) -> bool {
        self.0.encloses(range)
    }

    #[inline(always)]
    pub fn intersects<K: Into<Interval<N>>>(&self, range: K) -> bool {
        self.0.intersects(range)
    }

    /// A copy of the ranges lying entirely within `range`.
    #[inline(always)]
    pub fn ranges_enclosed_by<K: Into<Interval<N>>>(&self, range: K) -> DisjointRangeSet<N> {
        Self(self.0.enclosed_by(range))
    }

    /// A copy of the ranges intersecting `range`.
    #[inline(always)]
    pub fn ranges_intersected_by<K: Into<Interval<N>>>(&self, range: K) -> DisjointRangeSet<N> {
        Self(self.0.intersected_by(range))
    }

    /// A copy of this set with `subtrahend` removed, cutting the ranges it
    /// partially covers.
    #[inline(always)]
    pub fn minus<K: Into<Interval<N>>>(&self, subtrahend: K) -> DisjointRangeSet<N> {
        Self(self.0.minus(subtrahend))
    }

    /// Removes `subtrahend` from this set, cutting the ranges it partially
    /// covers:
    ///
    /// ```text
    /// { [0,4], [6,10], [12,16], [18,22], [24,28] }  -  [7,20]  =  { [0,4], [6,6], [21,22], [24,28] }
    /// ```
    #[inline(always)]
    pub fn minus_assign<K: Into<Interval<N>>>(&mut self, subtrahend: K) {
        self.0.minus_assign(subtrahend)
    }

    /// The gaps of this set within `bound`, clipped to it.
    ///
    /// ```text
    /// { [0,4], [8,100] }.invert([-100,200])                         = { [-100,-1], [5,7], [101,200] }
    /// { [0,4], [6,10], [14,16], [18,20], [26,28] }.invert([7,23]) = { [11,13], [17,17], [21,23] }
    /// ```
    pub fn invert<K: Into<Interval<N>>>(&self, bound: K) -> DisjointRangeSet<N> {
        let bound = bound.into();
        let mut inverse = Self::new();
        if bound.is_empty() {
            return inverse;
        }
        inverse.0.entries.insert(bound, ());
        for range in self.0.internal_intersected_by(&bound).keys() {
            inverse.minus_assign(*range);
        }
        inverse
    }

    /// The gaps of this set over every value of `N`.
    #[inline(always)]
    pub fn complement(&self) -> DisjointRangeSet<N> {
        self.invert(Interval::full())
    }

    /// The parts of this set's ranges that fall inside a range of `mask`.
    #[inline(always)]
    pub fn masked_by(&self, mask: &DisjointRangeSet<N>) -> DisjointRangeSet<N> {
        Self(self.0.masked_by(mask))
    }

    /// Both sets' ranges split along each other's boundaries.
    #[inline(always)]
    pub fn gcd_alignment(&self, other: &DisjointRangeSet<N>) -> DisjointRangeSet<N> {
        Self(self.0.gcd_alignment(&other.0, |_, _| ()))
    }

    /// Aligns this set with `map`; pieces covered by a key of `map` take its
    /// value and pieces only in this set take `fill`.
    pub fn gcd_alignment_with_map<U: Clone>(&self, map: &DisjointRangeMap<N, U>, fill: U) -> DisjointRangeMap<N, U> {
        self.0
            .gcd_alignment(map, |_, value| value.cloned().unwrap_or_else(|| fill.clone()))
    }
}

impl<N: Coordinate, K: Into<Interval<N>>> SubAssign<K> for DisjointRangeSet<N> {
    fn sub_assign(&mut self, subtrahend: K) {
        self.minus_assign(subtrahend)
    }
}

impl<N: Coordinate, K: Into<Interval<N>>> Sub<K> for &'_ DisjointRangeSet<N> {
    type Output = DisjointRangeSet<N>;

    fn sub(self, subtrahend: K) -> Self::Output {
        self.minus(subtrahend)
    }
}
