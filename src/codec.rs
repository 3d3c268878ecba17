//! Textual form of intervals, and serde support behind the `serde_derive`
//! feature.
//!
//! An interval is written as its two endpoints joined by a delimiter. With
//! the default [`IntervalFormat`], `[1, 9]` is `"1_9"`. The serde
//! implementations use that default form: an [`Interval`] is a string, a
//! [`DisjointRangeSet`] a sequence of strings and a [`DisjointRangeMap`] a
//! map keyed by strings. [`IntervalFormat::serialized`] and
//! [`IntervalFormat::seed`] write and read the same shapes in any other
//! format.
//!
//! [`DisjointRangeSet`]: crate::DisjointRangeSet
//! [`DisjointRangeMap`]: crate::DisjointRangeMap

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::interval::{Coordinate, Interval};

/// How intervals are written as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_derive", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde_derive", serde(default))]
pub struct IntervalFormat {
    /// Separates the start from the end.
    pub delimiter: String,
    /// Whether the written end is the last value of the interval (`1_9`) or
    /// one past it (`1..10`).
    pub inclusive_end: bool,
}

impl Default for IntervalFormat {
    fn default() -> Self {
        Self::new("_", true)
    }
}

impl IntervalFormat {
    pub fn new<S: Into<String>>(delimiter: S, inclusive_end: bool) -> Self {
        Self {
            delimiter: delimiter.into(),
            inclusive_end,
        }
    }

    /// `start..end` with an exclusive end, so `[1, 9]` is `"1..10"`.
    pub fn half_open() -> Self {
        Self::new("..", false)
    }

    /// Writes `interval` in this format.
    ///
    /// Fails with [`Error::Unrepresentable`] when the end is exclusive and
    /// the interval ends at `N::max_value()`.
    pub fn format<N: Coordinate>(&self, interval: &Interval<N>) -> Result<String, N> {
        let end = if self.inclusive_end {
            interval.end()
        } else {
            interval
                .end()
                .checked_add(&N::one())
                .ok_or(Error::Unrepresentable { key: *interval })?
        };
        Ok(format!("{}{}{}", interval.start(), self.delimiter, end))
    }

    /// Reads an interval written in this format. The input is split at the
    /// first occurrence of the delimiter.
    pub fn parse<N: Coordinate>(&self, input: &str) -> Result<Interval<N>, N> {
        let fail = |reason: String| Error::Parse {
            input: input.to_owned(),
            reason,
        };

        let split = input.find(self.delimiter.as_str()).ok_or_else(|| {
            fail(format!(
                "missing delimiter {:?}, expected something like \"1{}3\"",
                self.delimiter, self.delimiter
            ))
        })?;
        let endpoint = |text: &str| {
            N::from_str_radix(text, 10).map_err(|_| fail(format!("{:?} is not an integer", text)))
        };
        let start = endpoint(&input[..split])?;
        let end = endpoint(&input[split + self.delimiter.len()..])?;

        if self.inclusive_end {
            Ok(Interval::new(start, end))
        } else {
            // nothing ends before N::min_value()
            Ok(end
                .checked_sub(&N::one())
                .map_or_else(Interval::empty, |last| Interval::new(start, last)))
        }
    }
}

/// Parses the default format, `"3_7"`.
impl<N: Coordinate> FromStr for Interval<N> {
    type Err = Error<N>;

    fn from_str(s: &str) -> Result<Self, N> {
        IntervalFormat::default().parse(s)
    }
}

#[cfg(feature = "serde_derive")]
pub use self::serde_impls::{FormatSeed, Formatted};

#[cfg(feature = "serde_derive")]
mod serde_impls {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
    use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

    use super::IntervalFormat;
    use crate::collections::{DisjointRangeMap, DisjointRangeSet};
    use crate::interval::{Coordinate, Interval};

    /// Serializes the wrapped interval, set or map with a given
    /// [`IntervalFormat`]; see [`IntervalFormat::serialized`].
    pub struct Formatted<'a, T: ?Sized> {
        format: &'a IntervalFormat,
        value: &'a T,
    }

    /// Deserializes an interval, set or map written with a given
    /// [`IntervalFormat`]; see [`IntervalFormat::seed`].
    pub struct FormatSeed<'a, T> {
        format: &'a IntervalFormat,
        marker: PhantomData<fn() -> T>,
    }

    impl IntervalFormat {
        /// Wraps `value` so that it serializes in this format rather than
        /// the default one.
        pub fn serialized<'a, T: ?Sized>(&'a self, value: &'a T) -> Formatted<'a, T> {
            Formatted { format: self, value }
        }

        /// A [`DeserializeSeed`] reading a `T` written in this format.
        pub fn seed<T>(&self) -> FormatSeed<'_, T> {
            FormatSeed {
                format: self,
                marker: PhantomData,
            }
        }
    }

    impl<N: Coordinate> Serialize for Formatted<'_, Interval<N>> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let text = self
                .format
                .format(self.value)
                .map_err(<S::Error as ser::Error>::custom)?;
            serializer.serialize_str(&text)
        }
    }

    impl<N: Coordinate> Serialize for Formatted<'_, DisjointRangeSet<N>> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut seq = serializer.serialize_seq(Some(self.value.len()))?;
            for range in self.value {
                seq.serialize_element(&self.format.serialized(range))?;
            }
            seq.end()
        }
    }

    impl<N: Coordinate, V: Serialize> Serialize for Formatted<'_, DisjointRangeMap<N, V>> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let mut map = serializer.serialize_map(Some(self.value.len()))?;
            for (key, value) in self.value {
                map.serialize_entry(&self.format.serialized(key), value)?;
            }
            map.end()
        }
    }

    struct IntervalVisitor<'a, N> {
        format: &'a IntervalFormat,
        marker: PhantomData<N>,
    }

    impl<'de, N: Coordinate> Visitor<'de> for IntervalVisitor<'_, N> {
        type Value = Interval<N>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "an interval string such as \"1{}3\"", self.format.delimiter)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            self.format.parse(v).map_err(E::custom)
        }
    }

    impl<'de, N: Coordinate> DeserializeSeed<'de> for FormatSeed<'_, Interval<N>> {
        type Value = Interval<N>;

        fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(IntervalVisitor {
                format: self.format,
                marker: PhantomData,
            })
        }
    }

    struct SetVisitor<'a, N> {
        format: &'a IntervalFormat,
        marker: PhantomData<N>,
    }

    impl<'de, N: Coordinate> Visitor<'de> for SetVisitor<'_, N> {
        type Value = DisjointRangeSet<N>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a sequence of disjoint interval strings")
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut set = DisjointRangeSet::new();
            while let Some(range) = seq.next_element_seed(self.format.seed::<Interval<N>>())? {
                set.add(range).map_err(<A::Error as de::Error>::custom)?;
            }
            Ok(set)
        }
    }

    impl<'de, N: Coordinate> DeserializeSeed<'de> for FormatSeed<'_, DisjointRangeSet<N>> {
        type Value = DisjointRangeSet<N>;

        fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_seq(SetVisitor {
                format: self.format,
                marker: PhantomData,
            })
        }
    }

    struct MapVisitor<'a, N, V> {
        format: &'a IntervalFormat,
        marker: PhantomData<(N, V)>,
    }

    impl<'de, N: Coordinate, V: Deserialize<'de>> Visitor<'de> for MapVisitor<'_, N, V> {
        type Value = DisjointRangeMap<N, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map keyed by disjoint interval strings")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut map = DisjointRangeMap::new();
            while let Some(key) = access.next_key_seed(self.format.seed::<Interval<N>>())? {
                let value = access.next_value::<V>()?;
                map.put(key, value).map_err(<A::Error as de::Error>::custom)?;
            }
            Ok(map)
        }
    }

    impl<'de, N: Coordinate, V: Deserialize<'de>> DeserializeSeed<'de> for FormatSeed<'_, DisjointRangeMap<N, V>> {
        type Value = DisjointRangeMap<N, V>;

        fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_map(MapVisitor {
                format: self.format,
                marker: PhantomData,
            })
        }
    }

    impl<N: Coordinate> Serialize for Interval<N> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            IntervalFormat::default().serialized(self).serialize(serializer)
        }
    }

    impl<'de, N: Coordinate> Deserialize<'de> for Interval<N> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            IntervalFormat::default().seed::<Self>().deserialize(deserializer)
        }
    }

    impl<N: Coordinate> Serialize for DisjointRangeSet<N> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            IntervalFormat::default().serialized(self).serialize(serializer)
        }
    }

    impl<'de, N: Coordinate> Deserialize<'de> for DisjointRangeSet<N> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            IntervalFormat::default().seed::<Self>().deserialize(deserializer)
        }
    }

    impl<N: Coordinate, V: Serialize> Serialize for DisjointRangeMap<N, V> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            IntervalFormat::default().serialized(self).serialize(serializer)
        }
    }

    impl<'de, N: Coordinate, V: Deserialize<'de>> Deserialize<'de> for DisjointRangeMap<N, V> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            IntervalFormat::default().seed::<Self>().deserialize(deserializer)
        }
    }
}
