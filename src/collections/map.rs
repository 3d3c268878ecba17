//! [`DisjointRangeMap`]: an ordered map whose interval keys never overlap.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::ops::Bound;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::interval::{Coordinate, Interval};

use super::view::Span;

/// An ordered map keyed by pairwise disjoint, non-empty [`Interval`]s.
///
/// Keys are kept in interval order inside a [`BTreeMap`], so every lookup
/// below is a handful of `O(log n)` navigations plus the size of its result.
///
/// Strict insertion ([`put`](Self::put) and friends) refuses empty keys and
/// keys that overlap a different stored key. The escape hatches are named
/// for what they do: [`put_forcefully`](Self::put_forcefully) evicts the
/// overlapping entries and [`put_all_non_intersecting`](Self::put_all_non_intersecting)
/// skips them.
///
/// The map is not internally synchronized.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DisjointRangeMap<N, V> {
    pub(crate) entries: BTreeMap<Interval<N>, V>,
}

impl<N, V> Default for DisjointRangeMap<N, V> {
    fn default() -> Self {
        DisjointRangeMap {
            entries: BTreeMap::new(),
        }
    }
}

impl<N: fmt::Debug, V: fmt::Debug> fmt::Debug for DisjointRangeMap<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<N, V> IntoIterator for DisjointRangeMap<N, V> {
    type Item = (Interval<N>, V);
    type IntoIter = btree_map::IntoIter<Interval<N>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, N, V> IntoIterator for &'a DisjointRangeMap<N, V> {
    type Item = (&'a Interval<N>, &'a V);
    type IntoIter = btree_map::Iter<'a, Interval<N>, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sorts before every interval that starts at `position`.
fn earliest_at<N: Coordinate>(position: N) -> Interval<N> {
    Interval::new(position, N::min_value())
}

/// Sorts after every interval that starts at `position`.
fn latest_at<N: Coordinate>(position: N) -> Interval<N> {
    Interval::new(position, N::max_value())
}

impl<N: Coordinate, V> DisjointRangeMap<N, V> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a map by [`put`](Self::put)ting each entry in turn, failing on
    /// the first empty or overlapping key.
    pub fn try_from_entries<I, K>(entries: I) -> Result<Self, N>
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (key, value) in entries {
            map.put(key, value)?;
        }
        Ok(map)
    }

    /// Builds a map from the entries whose keys are non-empty and don't
    /// intersect any earlier entry; the rest are dropped.
    pub fn from_entries_non_intersecting<I, K>(entries: I) -> Self
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        map.put_all_non_intersecting(entries);
        map
    }

    /// Inserts `key -> value`, returning the value previously stored under
    /// exactly `key`.
    ///
    /// Fails with [`Error::InvalidKey`] if `key` is empty and with
    /// [`Error::OverlapConflict`] if it intersects any other stored key. The
    /// map is unchanged on failure.
    pub fn put<K: Into<Interval<N>>>(&mut self, key: K, value: V) -> Result<Option<V>, N> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::InvalidKey { key });
        }
        if !self.entries.contains_key(&key) {
            self.check_disjoint(&key)?;
        }
        Ok(self.entries.insert(key, value))
    }

    /// Inserts `key -> value` after removing every entry whose key
    /// intersects it. The removed entries are returned.
    pub fn put_forcefully<K: Into<Interval<N>>>(
        &mut self,
        key: K,
        value: V,
    ) -> Result<DisjointRangeMap<N, V>, N> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::InvalidKey { key });
        }

        let doomed: Vec<Interval<N>> = self.internal_intersected_by(&key).keys().copied().collect();
        let mut displaced = DisjointRangeMap::new();
        for k in doomed {
            if let Some(v) = self.entries.remove(&k) {
                displaced.entries.insert(k, v);
            }
        }
        if !displaced.is_empty() {
            debug!(%key, displaced = displaced.len(), "displaced intersecting entries");
        }

        self.entries.insert(key, value);
        Ok(displaced)
    }

    /// Returns the value stored under exactly `key` if there is one, without
    /// touching it. Otherwise behaves like [`put`](Self::put) and returns
    /// `None`.
    pub fn put_if_absent<K: Into<Interval<N>>>(&mut self, key: K, value: V) -> Result<Option<&V>, N> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Ok(self.entries.get(&key));
        }
        self.put(key, value)?;
        Ok(None)
    }

    /// Puts every entry, or none of them.
    ///
    /// Each entry is checked with [`put`](Self::put) semantics against the
    /// map and against the entries before it in `entries`. The first failure
    /// is returned and the map is left untouched.
    pub fn put_all<I, K>(&mut self, entries: I) -> Result<(), N>
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut staged = DisjointRangeMap::new();
        for (key, value) in entries {
            let key = key.into();
            if key.is_empty() {
                return Err(Error::InvalidKey { key });
            }
            if !self.entries.contains_key(&key) {
                self.check_disjoint(&key)?;
            }
            staged.put(key, value)?;
        }
        self.entries.append(&mut staged.entries);
        Ok(())
    }

    /// Puts each entry whose key is non-empty and intersects nothing already
    /// in the map. Other entries are skipped silently.
    pub fn put_all_non_intersecting<I, K>(&mut self, entries: I)
    where
        K: Into<Interval<N>>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            let key = key.into();
            if key.is_empty() || self.intersects(key) {
                trace!(%key, "skipping empty or intersecting entry");
                continue;
            }
            self.entries.insert(key, value);
        }
    }

    /// Removes the entry stored under exactly `key`.
    pub fn remove<K: Into<Interval<N>>>(&mut self, key: K) -> Option<V> {
        self.entries.remove(&key.into())
    }

    pub fn clear(&mut self) {
        self.entries.clear()
    }

    pub fn get<K: Into<Interval<N>>>(&self, key: K) -> Option<&V> {
        self.entries.get(&key.into())
    }

    pub fn contains_key<K: Into<Interval<N>>>(&self, key: K) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Interval<N>, &V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &Interval<N>> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.entries.values()
    }

    pub fn first_key_value(&self) -> Option<(&Interval<N>, &V)> {
        self.entries.iter().next()
    }

    pub fn last_key_value(&self) -> Option<(&Interval<N>, &V)> {
        self.entries.iter().next_back()
    }

    /// `[first.start, last.end]`, or [`Interval::empty`] for an empty map.
    pub fn bounding_range(&self) -> Interval<N> {
        match (self.first_key_value(), self.last_key_value()) {
            (Some((first, _)), Some((last, _))) => Interval::new(first.start(), last.end()),
            _ => Interval::empty(),
        }
    }

    /// The entry whose key contains `position`.
    pub fn entry_containing(&self, position: N) -> Option<(&Interval<N>, &V)> {
        self.entries
            .range(..=latest_at(position))
            .next_back()
            .filter(|(k, _)| k.end() >= position)
    }

    pub fn key_containing(&self, position: N) -> Option<&Interval<N>> {
        self.entry_containing(position).map(|(k, _)| k)
    }

    pub fn value_containing(&self, position: N) -> Option<&V> {
        self.entry_containing(position).map(|(_, v)| v)
    }

    /// The entry whose key alone encloses `range`. Abutting keys that only
    /// cover `range` together don't count, and an empty `range` is enclosed
    /// by nothing.
    pub fn entry_enclosing<K: Into<Interval<N>>>(&self, range: K) -> Option<(&Interval<N>, &V)> {
        let range = range.into();
        if range.is_empty() {
            return None;
        }
        self.entry_containing(range.start())
            .filter(|(k, _)| k.contains(range.end()))
    }

    pub fn key_enclosing<K: Into<Interval<N>>>(&self, range: K) -> Option<&Interval<N>> {
        self.entry_enclosing(range).map(|(k, _)| k)
    }

    pub fn value_enclosing<K: Into<Interval<N>>>(&self, range: K) -> Option<&V> {
        self.entry_enclosing(range).map(|(_, v)| v)
    }

    /// True if a single key encloses `range`.
    pub fn encloses<K: Into<Interval<N>>>(&self, range: K) -> bool {
        self.entry_enclosing(range).is_some()
    }

    /// True if any key intersects `range`.
    pub fn intersects<K: Into<Interval<N>>>(&self, range: K) -> bool {
        !self.internal_intersected_by(&range.into()).is_empty()
    }

    /// A copy of the entries whose keys intersect `range`.
    pub fn intersected_by<K: Into<Interval<N>>>(&self, range: K) -> Self
    where
        V: Clone,
    {
        Self::from_span(self.internal_intersected_by(&range.into()))
    }

    pub fn values_intersected_by<K: Into<Interval<N>>>(&self, range: K) -> Vec<&V> {
        self.internal_intersected_by(&range.into()).values().collect()
    }

    /// A copy of the entries whose keys lie entirely within `range`.
    pub fn enclosed_by<K: Into<Interval<N>>>(&self, range: K) -> Self
    where
        V: Clone,
    {
        Self::from_span(self.internal_enclosed_by(&range.into()))
    }

    pub fn values_enclosed_by<K: Into<Interval<N>>>(&self, range: K) -> Vec<&V> {
        self.internal_enclosed_by(&range.into()).values().collect()
    }

    /// The entries whose keys intersect `r`, borrowed from the map.
    pub(crate) fn internal_intersected_by(&self, r: &Interval<N>) -> Span<'_, N, V> {
        if r.is_empty() {
            return Span::empty();
        }

        // last key starting at or before r ends; nothing intersects unless it reaches r
        let end_key = match self.floor_key(&latest_at(r.end())) {
            Some(k) if k.end() >= r.start() => *k,
            _ => return Span::empty(),
        };

        // last key starting at or before r starts, skipped if it ends before r
        let start_key = match self.floor_key(r) {
            None => self.entries.keys().next(),
            Some(k) if k.end() < r.start() => self.higher_key(k),
            Some(k) => Some(k),
        };

        match start_key {
            Some(start_key) => self.span(*start_key, end_key),
            None => Span::empty(),
        }
    }

    /// The entries whose keys lie entirely within `r`, borrowed from the map.
    pub(crate) fn internal_enclosed_by(&self, r: &Interval<N>) -> Span<'_, N, V> {
        // first key starting at or after r starts
        let start_key = match self.ceiling_key(&earliest_at(r.start())) {
            Some(k) if k.end() <= r.end() => *k,
            _ => return Span::empty(),
        };

        // last key starting at or before r ends, stepping back if it runs past r
        let mut end_key = match self.floor_key(&latest_at(r.end())) {
            Some(k) => *k,
            None => return Span::empty(),
        };
        if end_key.end() > r.end() {
            end_key = match self.lower_key(&end_key) {
                Some(k) => *k,
                None => return Span::empty(),
            };
        }

        self.span(start_key, end_key)
    }

    pub(crate) fn from_span(span: Span<'_, N, V>) -> Self
    where
        V: Clone,
    {
        DisjointRangeMap {
            entries: span.map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    fn check_disjoint(&self, key: &Interval<N>) -> Result<(), N> {
        let conflicts: Vec<Interval<N>> = self.internal_intersected_by(key).keys().copied().collect();
        if conflicts.is_empty() {
            Ok(())
        } else {
            trace!(%key, ?conflicts, "rejecting overlapping key");
            Err(Error::OverlapConflict {
                key: *key,
                conflicts,
            })
        }
    }

    fn span(&self, first: Interval<N>, last: Interval<N>) -> Span<'_, N, V> {
        if first > last {
            Span::empty()
        } else {
            Span::new(self.entries.range(first..=last))
        }
    }

    fn floor_key(&self, key: &Interval<N>) -> Option<&Interval<N>> {
        self.entries.range(..=*key).next_back().map(|(k, _)| k)
    }

    fn ceiling_key(&self, key: &Interval<N>) -> Option<&Interval<N>> {
        self.entries.range(*key..).next().map(|(k, _)| k)
    }

    fn higher_key(&self, key: &Interval<N>) -> Option<&Interval<N>> {
        self.entries
            .range((Bound::Excluded(*key), Bound::Unbounded))
            .next()
            .map(|(k, _)| k)
    }

    fn lower_key(&self, key: &Interval<N>) -> Option<&Interval<N>> {
        self.entries.range(..*key).next_back().map(|(k, _)| k)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn values() -> DisjointRangeMap<i32, &'static str> {
        let mut map = DisjointRangeMap::new();
        map.put(4..=4, "c").unwrap();
        map.put(0..=2, "a").unwrap();
        map.put(11..=12, "e").unwrap();
        map.put(3..=3, "b").unwrap();
        map.put(8..=9, "d").unwrap();
        map
    }

    /// The entries of `values()` stored under the given keys.
    fn subset(keys: &[(i32, i32)]) -> DisjointRangeMap<i32, &'static str> {
        let all = values();
        let mut map = DisjointRangeMap::new();
        for &(start, end) in keys {
            map.put(start..=end, *all.get(start..=end).unwrap()).unwrap();
        }
        map
    }

    fn numbered() -> DisjointRangeMap<i32, i32> {
        DisjointRangeMap::try_from_entries(vec![(1..=3, 1), (4..=5, 2), (8..=9, 3), (11..=12, 4)])
            .unwrap()
    }

    #[test]
    fn test_basic() {
        let mut map = values();
        assert_eq!(Some((&Interval::new(0, 2), &"a")), map.first_key_value());
        assert_eq!(Some((&Interval::new(11, 12), &"e")), map.last_key_value());
        assert_eq!(
            r#"{0..=2: "a", 3..=3: "b", 4..=4: "c", 8..=9: "d", 11..=12: "e"}"#,
            format!("{:?}", map)
        );
        assert_eq!(5, map.len());
        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_put() {
        let mut map = values();

        assert_eq!(Ok(None), map.put(13..=14, "x"));
        assert_eq!(Some(&"x"), map.get(13..=14));

        assert_eq!(Ok(Some("x")), map.put(13..=14, "z"));
        assert_eq!(Some(&"z"), map.get(13..=14));

        assert_eq!(
            Err(Error::OverlapConflict {
                key: Interval::new(14, 15),
                conflicts: vec![Interval::new(13, 14)],
            }),
            map.put(14..=15, "y")
        );
    }

    #[test]
    fn test_put_empty_key() {
        let mut map = values();
        assert_eq!(
            Err(Error::InvalidKey {
                key: Interval::empty()
            }),
            map.put(Interval::empty(), "z")
        );
        assert!(matches!(map.put(5..=4, "z"), Err(Error::InvalidKey { .. })));
    }

    #[test]
    fn test_put_overlapping_leaves_map_unchanged() {
        let mut map = values();
        let before = map.clone();

        match map.put(5..=8, "z") {
            Err(Error::OverlapConflict { conflicts, .. }) => {
                assert_eq!(vec![Interval::new(8, 9)], conflicts)
            }
            other => panic!("expected an overlap conflict, got {:?}", other),
        }
        assert_eq!(before, map);

        match map.put(3..=13, "z") {
            Err(Error::OverlapConflict { conflicts, .. }) => assert_eq!(4, conflicts.len()),
            other => panic!("expected an overlap conflict, got {:?}", other),
        }
        assert_eq!(before, map);
    }

    #[test]
    fn test_put_if_absent() {
        let mut map = values();

        assert_eq!(Ok(None), map.put_if_absent(13..=14, "x"));
        assert_eq!(Some(&"x"), map.get(13..=14));

        assert_eq!(Ok(Some(&"x")), map.put_if_absent(13..=14, "z"));
        assert_eq!(Some(&"x"), map.get(13..=14));

        assert!(matches!(
            map.put_if_absent(14..=15, "y"),
            Err(Error::OverlapConflict { .. })
        ));
        assert!(matches!(
            map.put_if_absent(Interval::empty(), "y"),
            Err(Error::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_put_all_is_all_or_nothing() {
        let mut map = values();
        let before = map.clone();

        // the third entry overlaps the first one in the batch
        let result = map.put_all(vec![(20..=25, "p"), (13..=14, "q"), (24..=26, "r")]);
        assert!(matches!(result, Err(Error::OverlapConflict { .. })));
        assert_eq!(before, map);

        let result = map.put_all(vec![(20..=25, "p"), (9..=10, "q")]);
        assert!(matches!(result, Err(Error::OverlapConflict { .. })));
        assert_eq!(before, map);

        let result = map.put_all(vec![(20..=25, "p"), (30..=29, "q")]);
        assert!(matches!(result, Err(Error::InvalidKey { .. })));
        assert_eq!(before, map);

        // replacing an existing key is allowed, as with put
        map.put_all(vec![(20..=25, "p"), (3..=3, "B"), (20..=25, "P")])
            .unwrap();
        assert_eq!(6, map.len());
        assert_eq!(Some(&"B"), map.get(3..=3));
        assert_eq!(Some(&"P"), map.get(20..=25));
    }

    #[test]
    fn test_put_all_non_intersecting() {
        let mut map = numbered();
        map.put_all_non_intersecting(vec![
            (Interval::new(24, 29), 5),
            (Interval::empty(), 6),
            (Interval::new(5, 4), 7),
            (Interval::new(1, 2), 8),
            (Interval::new(4, 4), 9),
            (Interval::new(8, 9), 10),
            (Interval::new(2, 3), 11),
            (Interval::new(3, 4), 12),
            (Interval::new(10, 10), 13),
            (Interval::new(3, 8), 14),
        ]);

        let expected = DisjointRangeMap::try_from_entries(vec![
            (1..=3, 1),
            (4..=5, 2),
            (8..=9, 3),
            (10..=10, 13),
            (11..=12, 4),
            (24..=29, 5),
        ])
        .unwrap();
        assert_eq!(expected, map);
    }

    #[test]
    fn test_remove() {
        let mut map = values();
        assert!(!map.contains_key(13..=18));
        assert_eq!(None, map.remove(13..=18));

        assert!(map.contains_key(3..=3));
        assert_eq!(Some("b"), map.remove(3..=3));
        assert!(!map.contains_key(3..=3));

        // removal is exact, never by overlap
        assert_eq!(None, map.remove(0..=1));
        assert!(map.contains_key(0..=2));
    }

    #[test]
    fn test_value_containing() {
        let map = values();
        assert_eq!(Some(&"a"), map.value_containing(1));
        assert_eq!(Some(&"c"), map.value_containing(4));
        assert_eq!(Some(&"d"), map.value_containing(8));
        assert_eq!(Some(&"d"), map.value_containing(9));
        assert_eq!(None, map.value_containing(10));
        assert_eq!(None, map.value_containing(13));
        assert_eq!(None, map.value_containing(-1));
        assert_eq!(Some(&Interval::new(11, 12)), map.key_containing(12));
    }

    #[test]
    fn test_containing_at_the_limits() {
        let mut map = DisjointRangeMap::new();
        map.put(i64::MIN..=i64::MIN, "lo").unwrap();
        map.put(i64::MAX..=i64::MAX, "hi").unwrap();
        assert_eq!(Some(&"lo"), map.value_containing(i64::MIN));
        assert_eq!(Some(&"hi"), map.value_containing(i64::MAX));
        assert_eq!(None, map.value_containing(0));
        assert_eq!(vec![&"lo", &"hi"], map.values_intersected_by(Interval::full()));
        assert_eq!(vec![&"lo", &"hi"], map.values_enclosed_by(Interval::full()));
    }

    #[test]
    fn test_encloses() {
        let map = numbered();
        assert!(!map.encloses(24..=29));
        assert!(!map.encloses(Interval::empty()));
        assert!(!map.encloses(5..=4));
        assert!(map.encloses(1..=2));
        assert!(map.encloses(4..=4));
        assert!(map.encloses(8..=9));
        assert!(map.encloses(2..=3));
        assert!(!map.encloses(3..=4));
    }

    #[test]
    fn test_enclosing_needs_a_single_key() {
        let map = DisjointRangeMap::try_from_entries(vec![(1..=5, 'a'), (6..=10, 'b')]).unwrap();
        assert!(map.encloses(3..=5));
        assert!(!map.encloses(3..=6));
    }

    #[test]
    fn test_value_enclosing() {
        let map = numbered();
        assert_eq!(None, map.value_enclosing(24..=29));
        assert_eq!(None, map.value_enclosing(Interval::empty()));
        assert_eq!(None, map.value_enclosing(5..=4));
        assert_eq!(Some(&1), map.value_enclosing(1..=2));
        assert_eq!(Some(&2), map.value_enclosing(4..=4));
        assert_eq!(Some(&3), map.value_enclosing(8..=9));
        assert_eq!(Some(&1), map.value_enclosing(2..=3));
        assert_eq!(None, map.value_enclosing(3..=4));
        assert_eq!(Some(&Interval::new(1, 3)), map.key_enclosing(2..=3));
    }

    #[test]
    fn test_intersects() {
        let map = numbered();
        assert!(!map.intersects(24..=29));
        assert!(!map.intersects(Interval::empty()));
        assert!(!map.intersects(5..=4));
        assert!(!map.intersects(6..=7));
        assert!(map.intersects(1..=2));
        assert!(map.intersects(4..=4));
        assert!(map.intersects(8..=9));
        assert!(map.intersects(2..=3));
        assert!(map.intersects(3..=4));
        assert!(map.intersects(3..=8));
    }

    #[test]
    fn test_values_intersected_by() {
        let map = numbered();
        assert!(map.values_intersected_by(24..=29).is_empty());
        assert!(map.values_intersected_by(Interval::empty()).is_empty());
        assert!(map.values_intersected_by(5..=4).is_empty());
        assert_eq!(vec![&1], map.values_intersected_by(1..=2));
        assert_eq!(vec![&2], map.values_intersected_by(4..=4));
        assert_eq!(vec![&3], map.values_intersected_by(8..=9));
        assert_eq!(vec![&1], map.values_intersected_by(2..=3));
        assert_eq!(vec![&1, &2], map.values_intersected_by(3..=4));
        assert_eq!(vec![&1, &2, &3], map.values_intersected_by(3..=8));
    }

    #[test]
    fn test_intersected_by() {
        let map = subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]);
        assert_eq!(subset(&[]), map.intersected_by(0..=0));
        assert_eq!(subset(&[(3, 3)]), map.intersected_by(0..=3));
        assert_eq!(subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]), map.intersected_by(0..=13));
        assert_eq!(subset(&[(8, 9), (11, 12)]), map.intersected_by(5..=11));
        assert_eq!(subset(&[(8, 9), (11, 12)]), map.intersected_by(9..=11));
        assert_eq!(subset(&[(4, 4), (8, 9)]), map.intersected_by(4..=9));
        assert_eq!(subset(&[]), map.intersected_by(14..=19));

        let single = |start: i32, end: i32| DisjointRangeMap::try_from_entries(vec![(start..=end, "abc")]).unwrap();
        assert_eq!(single(0, 9), single(0, 9).intersected_by(3..=6));
        assert_eq!(single(3, 6), single(3, 6).intersected_by(0..=9));
        assert_eq!(single(0, 9), single(0, 9).intersected_by(0..=6));
        assert_eq!(single(3, 6), single(3, 6).intersected_by(3..=9));
        assert_eq!(single(3, 6), single(3, 6).intersected_by(3..=6));
        assert_eq!(single(3, 6), single(3, 6).intersected_by(6..=6));
        assert!(single(3, 6).intersected_by(7..=7).is_empty());
        assert!(single(3, 6).intersected_by(2..=2).is_empty());
    }

    #[test]
    fn test_intersected_by_is_a_copy() {
        let map = values();
        let mut view = map.intersected_by(9..=11);
        assert_eq!(subset(&[(8, 9), (11, 12)]), view);
        assert_eq!(Some("d"), view.remove(8..=9));
        assert!(map.contains_key(8..=9));
    }

    #[test]
    fn test_enclosed_by() {
        let map = subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]);
        assert_eq!(subset(&[]), map.enclosed_by(0..=0));
        assert_eq!(subset(&[(3, 3)]), map.enclosed_by(0..=3));
        assert_eq!(subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]), map.enclosed_by(0..=13));
        assert_eq!(subset(&[(8, 9)]), map.enclosed_by(5..=11));
        assert_eq!(subset(&[]), map.enclosed_by(9..=11));
        assert_eq!(subset(&[(4, 4), (8, 9)]), map.enclosed_by(4..=9));
        assert_eq!(subset(&[]), map.enclosed_by(14..=19));
        assert_eq!(subset(&[]), map.enclosed_by(5..=4));

        let single = |start: i32, end: i32| DisjointRangeMap::try_from_entries(vec![(start..=end, "abc")]).unwrap();
        assert!(single(0, 9).enclosed_by(3..=6).is_empty());
        assert_eq!(single(3, 6), single(3, 6).enclosed_by(0..=9));

        // not a live view
        let mut view = map.enclosed_by(4..=9);
        assert_eq!(Some("d"), view.remove(8..=9));
        assert_eq!(subset(&[(4, 4)]), view);
        assert!(map.contains_key(8..=9));
    }

    #[test]
    fn test_values_enclosed_by() {
        let map = subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]);
        assert!(map.values_enclosed_by(0..=0).is_empty());
        assert_eq!(vec![&"b"], map.values_enclosed_by(0..=3));
        assert_eq!(vec![&"b", &"c", &"d", &"e"], map.values_enclosed_by(0..=13));
        assert_eq!(vec![&"d"], map.values_enclosed_by(5..=11));
        assert!(map.values_enclosed_by(9..=11).is_empty());
        assert_eq!(vec![&"c", &"d"], map.values_enclosed_by(4..=9));
        assert!(map.values_enclosed_by(14..=19).is_empty());
    }

    #[test]
    fn test_scenario_queries() {
        let map = values();
        assert_eq!(subset(&[(4, 4), (8, 9)]), map.enclosed_by(4..=9));
        assert_eq!(subset(&[(8, 9), (11, 12)]), map.intersected_by(9..=11));
    }

    fn check_put_forcefully(original: &DisjointRangeMap<i32, &'static str>, key: Interval<i32>) {
        let mut map = original.clone();
        let intersection = original.intersected_by(key);
        let mut expected = original.clone();
        for k in intersection.keys() {
            expected.remove(*k);
        }
        expected.put(key, "x").unwrap();

        assert_eq!(Ok(intersection), map.put_forcefully(key, "x"));
        assert_eq!(expected, map);
    }

    #[test]
    fn test_put_forcefully() {
        let original = subset(&[(3, 3), (4, 4), (8, 9), (11, 12)]);
        for &(start, end) in &[(0, 0), (0, 3), (0, 13), (5, 11), (9, 11), (4, 9), (14, 19)] {
            check_put_forcefully(&original, Interval::new(start, end));
        }

        let single = |start: i32, end: i32| DisjointRangeMap::try_from_entries(vec![(start..=end, "abc")]).unwrap();
        check_put_forcefully(&single(0, 9), Interval::new(3, 6));
        check_put_forcefully(&single(3, 6), Interval::new(0, 9));
        check_put_forcefully(&single(0, 9), Interval::new(0, 6));
        check_put_forcefully(&single(3, 6), Interval::new(3, 9));

        let mut map = values();
        assert!(matches!(
            map.put_forcefully(Interval::empty(), "x"),
            Err(Error::InvalidKey { .. })
        ));
        assert_eq!(values(), map);
    }

    #[test]
    fn test_bounding_range() {
        assert!(DisjointRangeMap::<i32, &str>::new().bounding_range().is_empty());
        let map = DisjointRangeMap::try_from_entries(vec![(3..=19, "test")]).unwrap();
        assert_eq!(Interval::new(3, 19), map.bounding_range());
        let map = DisjointRangeMap::try_from_entries(vec![(27..=145, "uh"), (3..=19, "test")]).unwrap();
        assert_eq!(Interval::new(3, 145), map.bounding_range());
    }

    #[test]
    fn test_round_trip_through_entries() {
        let map = values();
        let flat: Vec<(Interval<i32>, &str)> = map.clone().into_iter().collect();
        assert_eq!(
            vec![
                (Interval::new(0, 2), "a"),
                (Interval::new(3, 3), "b"),
                (Interval::new(4, 4), "c"),
                (Interval::new(8, 9), "d"),
                (Interval::new(11, 12), "e"),
            ],
            flat
        );
        assert_eq!(Ok(map), DisjointRangeMap::try_from_entries(flat));
    }

    #[test]
    fn test_from_entries() {
        assert!(matches!(
            DisjointRangeMap::try_from_entries(vec![(0..=4, 'a'), (4..=6, 'b')]),
            Err(Error::OverlapConflict { .. })
        ));
        let map = DisjointRangeMap::from_entries_non_intersecting(vec![(0..=4, 'a'), (4..=6, 'b'), (5..=6, 'c')]);
        assert_eq!(vec![&'a', &'c'], map.values().collect::<Vec<_>>());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Put(Interval<i16>, u8),
        PutForcefully(Interval<i16>, u8),
        PutIfAbsent(Interval<i16>, u8),
        Remove(Interval<i16>),
    }

    fn arbitrary_interval() -> impl Strategy<Value = Interval<i16>> {
        // a narrow domain so operations collide often; some intervals are empty
        (-40i16..40, -2i16..12).prop_map(|(start, len)| Interval::new(start, start + len))
    }

    fn arbitrary_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (arbitrary_interval(), any::<u8>()).prop_map(|(k, v)| Op::Put(k, v)),
            (arbitrary_interval(), any::<u8>()).prop_map(|(k, v)| Op::PutForcefully(k, v)),
            (arbitrary_interval(), any::<u8>()).prop_map(|(k, v)| Op::PutIfAbsent(k, v)),
            arbitrary_interval().prop_map(Op::Remove),
        ]
    }

    fn assert_disjoint<V>(map: &DisjointRangeMap<i16, V>) {
        let keys: Vec<_> = map.keys().collect();
        for k in &keys {
            assert!(!k.is_empty());
        }
        for pair in keys.windows(2) {
            assert!(pair[0].end() < pair[1].start(), "{:?} overlaps {:?}", pair[0], pair[1]);
        }
    }

    fn naive_intersected_by(map: &DisjointRangeMap<i16, u8>, r: &Interval<i16>) -> Vec<Interval<i16>> {
        map.keys().filter(|k| k.intersects(r)).copied().collect()
    }

    fn naive_enclosed_by(map: &DisjointRangeMap<i16, u8>, r: &Interval<i16>) -> Vec<Interval<i16>> {
        map.keys().filter(|k| r.encloses(k)).copied().collect()
    }

    proptest! {
        #[test]
        fn prop_mutations_keep_keys_disjoint(ops in prop::collection::vec(arbitrary_op(), 0..64)) {
            let mut map = DisjointRangeMap::new();
            for op in ops {
                let before = map.clone();
                match op {
                    Op::Put(k, v) => {
                        if map.put(k, v).is_err() {
                            prop_assert_eq!(&before, &map);
                        }
                    }
                    Op::PutForcefully(k, v) => {
                        if let Ok(displaced) = map.put_forcefully(k, v) {
                            for key in displaced.keys() {
                                prop_assert!(key.intersects(&k));
                            }
                            prop_assert_eq!(Some(&v), map.get(k));
                        }
                    }
                    Op::PutIfAbsent(k, v) => {
                        let _ = map.put_if_absent(k, v);
                    }
                    Op::Remove(k) => {
                        map.remove(k);
                    }
                }
                assert_disjoint(&map);
            }
        }

        #[test]
        fn prop_queries_match_linear_scans(
            entries in prop::collection::vec((arbitrary_interval(), any::<u8>()), 0..32),
            query in arbitrary_interval(),
            position in -45i16..55,
        ) {
            let map = DisjointRangeMap::from_entries_non_intersecting(entries);

            let intersected: Vec<_> = map.intersected_by(query).keys().copied().collect();
            prop_assert_eq!(naive_intersected_by(&map, &query), intersected);

            let enclosed: Vec<_> = map.enclosed_by(query).keys().copied().collect();
            prop_assert_eq!(naive_enclosed_by(&map, &query), enclosed);

            let containing = map.keys().find(|k| k.contains(position));
            prop_assert_eq!(containing, map.key_containing(position));

            let enclosing = map.keys().find(|k| k.encloses(&query));
            prop_assert_eq!(enclosing, map.key_enclosing(query));
        }
    }
}
