//! Ordered containers of pairwise disjoint integer intervals.
//!
//! [`DisjointRangeMap`] maps non-overlapping [`Interval`]s to values and
//! [`DisjointRangeSet`] stores non-overlapping intervals on their own. Both
//! answer containment, enclosure and intersection queries against an
//! arbitrary interval by navigating an ordered tree, and both support
//! interval subtraction, masking and alignment against each other.
//!
//! ```
//! use disjoint_ranges::{DisjointRangeMap, Interval};
//!
//! let mut map = DisjointRangeMap::new();
//! map.put(0..=9, "a")?;
//! map.put(20..=29, "b")?;
//! assert!(map.put(5..=24, "c").is_err());
//!
//! assert_eq!(Some(&"b"), map.value_containing(25));
//! map -= 5..=24;
//! assert_eq!(
//!     vec![Interval::new(0, 4), Interval::new(25, 29)],
//!     map.keys().copied().collect::<Vec<_>>()
//! );
//! # Ok::<(), disjoint_ranges::Error<i32>>(())
//! ```

mod interval;
pub use interval::{Coordinate, Interval};

mod error;
pub use error::{Error, Result};

pub mod collections;
pub use collections::{DisjointRangeMap, DisjointRangeSet};

pub mod codec;
pub use codec::IntervalFormat;
#[cfg(feature = "serde_derive")]
pub use codec::{FormatSeed, Formatted};
