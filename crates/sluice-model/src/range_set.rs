// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The working set of half-open ranges that flows between pipeline stages.
//!
//! A `RangeSet` never stores empty ranges. Built from validated
//! `(start, length)` pairs it holds exactly the requested values; after a
//! stage has mapped it, fragments coming from different inputs may overlap
//! in the destination space, and `coalesce` merges them back into a sorted,
//! disjoint set (through a `rangemap::RangeSet`) when the caller only cares
//! about the covered values.

use crate::error::EmptyInputError;
use num_traits::PrimInt;
use sluice_core::math::interval::ClosedOpenInterval;

/// A collection of non-empty half-open ranges.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RangeSet<T>
where
    T: PrimInt,
{
    ranges: Vec<ClosedOpenInterval<T>>,
}

impl<T> Default for RangeSet<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RangeSet<T>
where
    T: PrimInt,
{
    /// Creates an empty set.
    #[inline]
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Creates an empty set with room for `capacity` ranges.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
        }
    }

    /// Builds a set from `(start, length)` pairs.
    ///
    /// # Errors
    ///
    /// - `NoRanges` if `pairs` is empty.
    /// - `NonPositiveLength` if any length is `<= 0`.
    /// - `Overflow` if any `start + length` does not fit into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_model::range_set::RangeSet;
    ///
    /// let set = RangeSet::from_pairs([(79, 14), (55, 13)]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.total_len(), 27);
    /// assert!(RangeSet::<i64>::from_pairs([]).is_err());
    /// ```
    pub fn from_pairs<I>(pairs: I) -> Result<Self, EmptyInputError<T>>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let pairs = pairs.into_iter();
        let mut set = Self::with_capacity(pairs.size_hint().0);

        for (index, (start, length)) in pairs.enumerate() {
            if length <= T::zero() {
                return Err(EmptyInputError::NonPositiveLength {
                    index,
                    start,
                    length,
                });
            }
            let range = ClosedOpenInterval::from_start_len(start, length).ok_or(
                EmptyInputError::Overflow {
                    index,
                    start,
                    length,
                },
            )?;
            set.ranges.push(range);
        }

        if set.is_empty() {
            return Err(EmptyInputError::NoRanges);
        }
        Ok(set)
    }

    /// Builds a set from a flat list `start_0 length_0 start_1 length_1 ...`.
    ///
    /// # Errors
    ///
    /// `UnpairedBound` if `bounds` has an odd number of entries, otherwise
    /// the errors of `from_pairs`.
    pub fn from_flat(bounds: &[T]) -> Result<Self, EmptyInputError<T>> {
        if bounds.len() % 2 != 0 {
            return Err(EmptyInputError::UnpairedBound {
                count: bounds.len(),
            });
        }
        Self::from_pairs(bounds.chunks_exact(2).map(|pair| (pair[0], pair[1])))
    }

    /// Builds a set holding one single-value range `[v, v + 1)` per value.
    ///
    /// # Errors
    ///
    /// - `NoValues` if `values` is empty.
    /// - `Overflow` if a value is `T::max_value()`, whose successor is not representable.
    pub fn from_points(values: &[T]) -> Result<Self, EmptyInputError<T>> {
        if values.is_empty() {
            return Err(EmptyInputError::NoValues);
        }
        Self::from_pairs(values.iter().map(|&v| (v, T::one())))
    }

    /// Appends `range`, dropping it if it is empty.
    #[inline]
    pub fn push(&mut self, range: ClosedOpenInterval<T>) {
        if !range.is_empty() {
            self.ranges.push(range);
        }
    }

    /// Returns the number of stored ranges.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if no range is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns the stored ranges in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[ClosedOpenInterval<T>] {
        &self.ranges
    }

    /// Returns an iterator over the stored ranges.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ClosedOpenInterval<T>> {
        self.ranges.iter()
    }

    /// Returns the sum of all range lengths, counting overlapping values once per range.
    ///
    /// Computed in `i128` so that sets spanning most of the `i64` domain do not overflow.
    pub fn total_len(&self) -> i128 {
        self.ranges
            .iter()
            .map(|r| r.len().to_i128().unwrap_or_default())
            .sum()
    }

    /// Returns the smallest value covered by the set.
    ///
    /// The start of a non-empty half-open range is its minimum, so this is
    /// the minimum over all starts.
    #[inline]
    pub fn min_start(&self) -> Option<T> {
        self.ranges.iter().map(|r| r.start()).min()
    }

    /// Returns `true` if some range contains `value`.
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.ranges.iter().any(|r| r.contains_point(value))
    }

    /// Merges every overlapping or touching pair of ranges.
    ///
    /// Afterwards the set is sorted by start and pairwise disjoint, and it
    /// covers exactly the values it covered before.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    /// # use sluice_model::range_set::RangeSet;
    ///
    /// let mut set = RangeSet::from_pairs([(10, 5), (0, 5), (12, 10), (40, 1)]).unwrap();
    /// set.coalesce();
    /// assert_eq!(
    ///     set.as_slice(),
    ///     &[ClosedOpenInterval::new(0, 5), ClosedOpenInterval::new(10, 22), ClosedOpenInterval::new(40, 41)]
    /// );
    /// ```
    pub fn coalesce(&mut self) {
        if self.ranges.len() < 2 {
            return;
        }

        let mut merged: rangemap::RangeSet<T> = rangemap::RangeSet::new();
        for range in self.ranges.drain(..) {
            merged.insert(range.into());
        }
        self.ranges
            .extend(merged.into_iter().map(ClosedOpenInterval::from));
    }

    /// Consuming variant of `coalesce`.
    #[inline]
    pub fn coalesced(mut self) -> Self {
        self.coalesce();
        self
    }
}

impl<T> FromIterator<ClosedOpenInterval<T>> for RangeSet<T>
where
    T: PrimInt,
{
    fn from_iter<I: IntoIterator<Item = ClosedOpenInterval<T>>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<ClosedOpenInterval<T>> for RangeSet<T>
where
    T: PrimInt,
{
    fn extend<I: IntoIterator<Item = ClosedOpenInterval<T>>>(&mut self, iter: I) {
        for range in iter {
            self.push(range);
        }
    }
}

impl<T> IntoIterator for RangeSet<T>
where
    T: PrimInt,
{
    type Item = ClosedOpenInterval<T>;
    type IntoIter = std::vec::IntoIter<ClosedOpenInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a RangeSet<T>
where
    T: PrimInt,
{
    type Item = &'a ClosedOpenInterval<T>;
    type IntoIter = std::slice::Iter<'a, ClosedOpenInterval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl<T> std::fmt::Debug for RangeSet<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ranges.iter()).finish()
    }
}

impl<T> std::fmt::Display for RangeSet<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", range)?;
        }
        write!(f, "}}")
    }
}
