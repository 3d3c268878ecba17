use std::fmt;
use std::hash::Hash;
use std::ops::{Range, RangeInclusive};

use num_traits::PrimInt;

/// Integer types usable as interval coordinates.
pub trait Coordinate: PrimInt + Hash + fmt::Debug + fmt::Display {}

impl<N> Coordinate for N where N: PrimInt + Hash + fmt::Debug + fmt::Display {}

/// An inclusive integer interval `[start, end]`.
///
/// An interval is empty when `start > end`. Intervals are ordered by start,
/// then by end; that is the key order of every container in this crate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval<N> {
    start: N,
    end: N,
}

impl<N: Coordinate> From<RangeInclusive<N>> for Interval<N> {
    fn from(range: RangeInclusive<N>) -> Self {
        let (start, end) = range.into_inner();
        Self::new(start, end)
    }
}

impl<N: Coordinate> From<Range<N>> for Interval<N> {
    fn from(range: Range<N>) -> Self {
        if range.end <= range.start {
            Self::empty()
        } else {
            Self::new(range.start, range.end - N::one())
        }
    }
}

impl<N: Coordinate> From<&'_ Interval<N>> for Interval<N> {
    fn from(interval: &Interval<N>) -> Self {
        *interval
    }
}

impl<N: fmt::Display> fmt::Display for Interval<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

impl<N: fmt::Debug> fmt::Debug for Interval<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..={:?}", self.start, self.end)
    }
}

impl<N: Coordinate> Interval<N> {
    pub fn new(start: N, end: N) -> Self {
        Self { start, end }
    }

    pub fn point(value: N) -> Self {
        Self::new(value, value)
    }

    /// The canonical empty interval, `[1, 0]`.
    pub fn empty() -> Self {
        Self::new(N::one(), N::zero())
    }

    /// Every value of `N`.
    pub fn full() -> Self {
        Self::new(N::min_value(), N::max_value())
    }

    pub fn start(&self) -> N {
        self.start
    }

    pub fn end(&self) -> N {
        self.end
    }

    pub fn into_inner(self) -> (N, N) {
        (self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of values in the interval.
    ///
    /// Exact for every coordinate type up to 64 bits. Only the full range of
    /// a 128-bit type has more values than `u128` holds, and reports
    /// `u128::MAX`.
    pub fn len(&self) -> u128 {
        if self.is_empty() {
            0
        } else {
            // end >= start, so the two's complement difference is exact
            wide(self.end)
                .wrapping_sub(wide(self.start))
                .saturating_add(1)
        }
    }

    /// Translates both endpoints up by `offset`, or `None` if either would
    /// overflow `N`.
    pub fn shift(&self, offset: N) -> Option<Self> {
        Some(Self::new(
            self.start.checked_add(&offset)?,
            self.end.checked_add(&offset)?,
        ))
    }

    /// Translates both endpoints down by `offset`, or `None` if either would
    /// overflow `N`.
    pub fn shift_back(&self, offset: N) -> Option<Self> {
        Some(Self::new(
            self.start.checked_sub(&offset)?,
            self.end.checked_sub(&offset)?,
        ))
    }

    pub fn contains(&self, point: N) -> bool {
        self.start <= point && point <= self.end
    }

    /// True if both intervals share at least one value. Empty intervals
    /// intersect nothing.
    pub fn intersects(&self, other: &Interval<N>) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start <= other.end
            && other.start <= self.end
    }

    /// The values shared by both intervals; empty when they don't intersect.
    pub fn intersect(&self, other: &Interval<N>) -> Interval<N> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// The smallest interval covering both.
    pub fn enclose(&self, other: &Interval<N>) -> Interval<N> {
        if other.is_empty() {
            *self
        } else if self.is_empty() {
            *other
        } else {
            Self::new(self.start.min(other.start), self.end.max(other.end))
        }
    }

    /// True if every value of `other` is also in `self`. Empty intervals
    /// enclose nothing and are enclosed by nothing.
    pub fn encloses(&self, other: &Interval<N>) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start <= other.start
            && self.end >= other.end
    }

    /// The zero, one or two non-empty pieces of `self` left after removing
    /// every value of `other`, in ascending order.
    pub fn subtract(&self, other: &Interval<N>) -> Vec<Interval<N>> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.intersects(other) {
            return vec![*self];
        }

        let mut pieces = Vec::with_capacity(2);
        // other.start > self.start >= MIN, so the decrement cannot underflow
        if self.start < other.start {
            pieces.push(Self::new(self.start, other.start - N::one()));
        }
        if self.end > other.end {
            pieces.push(Self::new(other.end + N::one(), self.end));
        }
        pieces
    }

    /// Splits into `[start, offset - 1]` and `[offset, end]`, provided both
    /// halves are non-empty.
    pub fn split_before(&self, offset: N) -> Option<(Interval<N>, Interval<N>)> {
        if self.start < offset && offset <= self.end {
            Some((
                Self::new(self.start, offset - N::one()),
                Self::new(offset, self.end),
            ))
        } else {
            None
        }
    }
}

/// `value` as a two's complement `u128`; order-preserving differences
/// between values of the same type come out exact.
fn wide<N: Coordinate>(value: N) -> u128 {
    match value.to_i128() {
        Some(signed) => signed as u128,
        None => value.to_u128().unwrap_or(u128::MAX),
    }
}
