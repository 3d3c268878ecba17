use thiserror::Error;

use crate::interval::{Coordinate, Interval};

/// Errors reported by the strict operations of the range containers and by
/// the textual interval format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<N: Coordinate> {
    /// An empty interval was given where a non-empty key is required.
    #[error("empty interval {key} is not a valid key")]
    InvalidKey { key: Interval<N> },

    /// The key intersects stored keys without being equal to any of them.
    ///
    /// `conflicts` holds the stored keys it intersects, in ascending order.
    #[error("interval {key} intersects already present intervals {conflicts:?}")]
    OverlapConflict {
        key: Interval<N>,
        conflicts: Vec<Interval<N>>,
    },

    /// A string could not be read as an interval.
    #[error("unable to parse {input:?} as an interval: {reason}")]
    Parse { input: String, reason: String },

    /// An interval cannot be written in the requested textual form.
    #[error("interval {key} cannot be written with an exclusive end")]
    Unrepresentable { key: Interval<N> },
}

pub type Result<T, N> = std::result::Result<T, Error<N>>;
