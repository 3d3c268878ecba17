use std::collections::BTreeMap;
use std::ops::{Sub, SubAssign};

use tracing::trace;

use crate::interval::{Coordinate, Interval};

use super::{DisjointRangeMap, DisjointRangeSet};

impl<N: Coordinate, V> DisjointRangeMap<N, V> {
    /// A copy of this map without the entries whose keys intersect any key
    /// of `subtrahend`.
    pub fn minus_intersected_by<U>(&self, subtrahend: &DisjointRangeMap<N, U>) -> Self
    where
        V: Clone,
    {
        DisjointRangeMap {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !subtrahend.intersects(*k))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        }
    }

    /// A copy of this map without the entries whose keys are enclosed by a
    /// single key of `subtrahend`.
    pub fn minus_enclosed_by<U>(&self, subtrahend: &DisjointRangeMap<N, U>) -> Self
    where
        V: Clone,
    {
        DisjointRangeMap {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !subtrahend.encloses(*k))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        }
    }

    /// [`minus_enclosed_by`](Self::minus_enclosed_by) against the ranges of
    /// a set.
    pub fn minus_enclosed_by_set(&self, subtrahend: &DisjointRangeSet<N>) -> Self
    where
        V: Clone,
    {
        self.minus_enclosed_by(subtrahend.as_map())
    }

    /// Keeps only the parts of each key that fall inside a range of `mask`.
    ///
    /// Keys enclosed by a mask range survive as they are, keys crossing mask
    /// boundaries are cut (possibly into several entries sharing the value)
    /// and keys outside the mask disappear.
    pub fn masked_by(&self, mask: &DisjointRangeSet<N>) -> Self
    where
        V: Clone,
    {
        let mut entries = BTreeMap::new();
        for (key, value) in &self.entries {
            for mask_range in mask.as_map().internal_intersected_by(key).keys() {
                entries.insert(mask_range.intersect(key), value.clone());
            }
        }
        DisjointRangeMap { entries }
    }

    /// A copy of this map with `subtrahend` removed; see
    /// [`minus_assign`](Self::minus_assign).
    pub fn minus<K: Into<Interval<N>>>(&self, subtrahend: K) -> Self
    where
        V: Clone,
    {
        let mut difference = self.clone();
        difference.minus_assign(subtrahend);
        difference
    }

    /// Removes every value of `subtrahend` from the map. Keys it partially
    /// covers are cut down to the parts outside it, each keeping the value.
    ///
    /// ```text
    /// { [0,4], [6,10], [12,16], [18,22], [24,28] }  -  [7,20]  =  { [0,4], [6,6], [21,22], [24,28] }
    ///                                   { [0,28] }  -  [7,20]  =  { [0,6], [21,28] }
    /// ```
    pub fn minus_assign<K: Into<Interval<N>>>(&mut self, subtrahend: K)
    where
        V: Clone,
    {
        let subtrahend = subtrahend.into();
        let hit: Vec<Interval<N>> = self
            .internal_intersected_by(&subtrahend)
            .keys()
            .copied()
            .collect();

        for key in hit {
            let value = match self.entries.remove(&key) {
                Some(value) => value,
                None => continue,
            };
            let mut fragments = key.subtract(&subtrahend);
            if !fragments.is_empty() {
                trace!(%key, %subtrahend, ?fragments, "cutting key");
            }
            if let Some(last) = fragments.pop() {
                for fragment in fragments {
                    self.entries.insert(fragment, value.clone());
                }
                self.entries.insert(last, value);
            }
        }
    }

    /// Splits both maps along each other's key boundaries (their greatest
    /// common divisor).
    ///
    /// Every piece of the result lies within at most one key of each map and
    /// gets `combine(this_value, other_value)`, with `None` for the side that
    /// has no key there. The result covers exactly the union of both maps'
    /// keys.
    pub fn gcd_alignment<U, W, F>(&self, other: &DisjointRangeMap<N, U>, mut combine: F) -> DisjointRangeMap<N, W>
    where
        F: FnMut(Option<&V>, Option<&U>) -> W,
    {
        let mut entries = BTreeMap::new();

        // intersections, plus whatever is left of each key of the other map
        for (other_key, other_value) in &other.entries {
            let mut remainder = vec![*other_key];
            for (this_key, this_value) in self.internal_intersected_by(other_key) {
                let shared = this_key.intersect(other_key);
                entries.insert(shared, combine(Some(this_value), Some(other_value)));
                remainder = cut(remainder, &shared);
            }
            for leftover in remainder {
                entries.insert(leftover, combine(None, Some(other_value)));
            }
        }

        // whatever is left of each key of this map
        for (this_key, this_value) in &self.entries {
            let mut remainder = vec![*this_key];
            for other_key in other.internal_intersected_by(this_key).keys() {
                remainder = cut(remainder, &this_key.intersect(other_key));
            }
            for leftover in remainder {
                entries.insert(leftover, combine(Some(this_value), None));
            }
        }

        DisjointRangeMap { entries }
    }

    /// [`gcd_alignment`](Self::gcd_alignment) keeping both sides' values.
    pub fn gcd_alignment_pairs<U>(&self, other: &DisjointRangeMap<N, U>) -> DisjointRangeMap<N, (Option<V>, Option<U>)>
    where
        V: Clone,
        U: Clone,
    {
        self.gcd_alignment(other, |this, other| (this.cloned(), other.cloned()))
    }
}

fn cut<N: Coordinate>(pieces: Vec<Interval<N>>, removed: &Interval<N>) -> Vec<Interval<N>> {
    pieces.iter().flat_map(|piece| piece.subtract(removed)).collect()
}

impl<N: Coordinate, V: Clone, K: Into<Interval<N>>> SubAssign<K> for DisjointRangeMap<N, V> {
    fn sub_assign(&mut self, subtrahend: K) {
        self.minus_assign(subtrahend)
    }
}

impl<N: Coordinate, V: Clone, K: Into<Interval<N>>> Sub<K> for &'_ DisjointRangeMap<N, V> {
    type Output = DisjointRangeMap<N, V>;

    fn sub(self, subtrahend: K) -> Self::Output {
        self.minus(subtrahend)
    }
}
