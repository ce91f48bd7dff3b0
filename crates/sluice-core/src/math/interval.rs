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

use num_traits::PrimInt;
use std::{
    cmp::{max, min},
    iter::FusedIterator,
};

/// A half-open interval `[start, end)` over a primitive integer type.
///
/// This is the unit every range in the pipeline is expressed in: mapping
/// rules cover a source interval, range queries carry sets of intervals, and
/// splitting produces intervals again. An interval may be empty
/// (`start == end`); callers that require non-empty spans check `is_empty`.
///
/// # Invariants
///
/// `start_inclusive <= end_exclusive` always holds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

/// An iterator over the integer points of a `ClosedOpenInterval`.
///
/// # Examples
///
/// ```rust
/// # use sluice_core::math::interval::ClosedOpenInterval;
///
/// let iv = ClosedOpenInterval::new(1, 5);
/// let points: Vec<_> = iv.iter().collect();
/// assert_eq!(points, vec![1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct ClosedOpenIntervalIterator<T>
where
    T: PrimInt,
{
    end_exclusive: T,
    current: T,
}

impl<T> Iterator for ClosedOpenIntervalIterator<T>
where
    T: PrimInt,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current < self.end_exclusive {
            let result = self.current;
            self.current = self.current + T::one();
            Some(result)
        } else {
            None
        }
    }
}

impl<T> FusedIterator for ClosedOpenIntervalIterator<T> where T: PrimInt {}

/// The three pieces produced by cutting an interval against a second one.
///
/// `before` holds the points strictly left of the second interval, `inside`
/// the shared points and `after` the points strictly right of it. Empty
/// pieces are `None`, so the present pieces always tile the original
/// interval exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition<T>
where
    T: PrimInt,
{
    pub before: Option<ClosedOpenInterval<T>>,
    pub inside: Option<ClosedOpenInterval<T>>,
    pub after: Option<ClosedOpenInterval<T>>,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(0, 10);
    /// assert_eq!(iv.len(), 10);
    /// ```
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval`, or `None` if `start_inclusive > end_exclusive`.
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        (start_inclusive <= end_exclusive).then_some(Self {
            start_inclusive,
            end_exclusive,
        })
    }

    /// Creates a new `ClosedOpenInterval` without checking the bound order in release builds.
    ///
    /// The caller must ensure `start_inclusive <= end_exclusive`.
    #[inline]
    pub fn new_unchecked(start_inclusive: T, end_exclusive: T) -> Self {
        debug_assert!(
            start_inclusive <= end_exclusive,
            "Invalid interval: start_inclusive must be less than or equal to end_exclusive"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates the interval `[start, start + len)` from a start and a length.
    ///
    /// Returns `None` if `len` is negative or `start + len` overflows `T`.
    /// A zero length yields an empty interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    ///
    /// assert_eq!(ClosedOpenInterval::from_start_len(79, 14), Some(ClosedOpenInterval::new(79, 93)));
    /// assert_eq!(ClosedOpenInterval::from_start_len(5, -1), None);
    /// assert_eq!(ClosedOpenInterval::from_start_len(i64::MAX, 1), None);
    /// ```
    #[inline]
    pub fn from_start_len(start: T, len: T) -> Option<Self> {
        if len < T::zero() {
            return None;
        }
        let end = start.checked_add(&len)?;
        Some(Self::new_unchecked(start, end))
    }

    /// Returns the inclusive start bound of the interval.
    #[inline]
    pub const fn start(&self) -> T {
        self.start_inclusive
    }

    /// Returns the exclusive end bound of the interval.
    #[inline]
    pub const fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns the number of points in the interval (`end - start`).
    #[inline]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    /// Returns `true` if the interval contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if the two intervals share at least one point.
    ///
    /// Touching intervals such as `[0, 10)` and `[10, 20)` do not intersect.
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns `true` if the intervals intersect or touch at a boundary,
    /// i.e. if their union is a single contiguous interval.
    #[inline]
    pub fn intersects_or_adjacent(&self, other: Self) -> bool {
        self.start_inclusive <= other.end_exclusive && other.start_inclusive <= self.end_exclusive
    }

    /// Returns `true` if `value` lies in `[start, end)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    ///
    /// let iv = ClosedOpenInterval::new(10, 20);
    /// assert!(iv.contains_point(10));
    /// assert!(!iv.contains_point(20));
    /// ```
    #[inline]
    pub fn contains_point(&self, value: T) -> bool {
        self.start_inclusive <= value && value < self.end_exclusive
    }

    /// Returns `true` if every point of `other` lies in `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.start_inclusive <= other.start_inclusive && other.end_exclusive <= self.end_exclusive
    }

    /// Returns the shared points of both intervals, or `None` if there are none.
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let new_start = max(self.start_inclusive, other.start_inclusive);
        let new_end = min(self.end_exclusive, other.end_exclusive);
        (new_start < new_end).then(|| Self::new_unchecked(new_start, new_end))
    }

    /// Returns the smallest interval covering both, if they intersect or touch.
    #[inline]
    pub fn union(&self, other: Self) -> Option<Self> {
        self.intersects_or_adjacent(other).then(|| {
            Self::new_unchecked(
                min(self.start_inclusive, other.start_inclusive),
                max(self.end_exclusive, other.end_exclusive),
            )
        })
    }

    /// Cuts `self` against `other` into the part before `other`, the part
    /// shared with `other`, and the part after `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    ///
    /// let range = ClosedOpenInterval::new(5, 15);
    /// let cut = range.partition(ClosedOpenInterval::new(10, 20));
    /// assert_eq!(cut.before, Some(ClosedOpenInterval::new(5, 10)));
    /// assert_eq!(cut.inside, Some(ClosedOpenInterval::new(10, 15)));
    /// assert_eq!(cut.after, None);
    /// ```
    #[inline]
    pub fn partition(&self, other: Self) -> Partition<T> {
        let before_end = min(self.end_exclusive, other.start_inclusive);
        let after_start = max(self.start_inclusive, other.end_exclusive);

        Partition {
            before: (self.start_inclusive < before_end)
                .then(|| Self::new_unchecked(self.start_inclusive, before_end)),
            inside: self.intersection(other),
            after: (after_start < self.end_exclusive)
                .then(|| Self::new_unchecked(after_start, self.end_exclusive)),
        }
    }

    /// Creates an iterator over the points in the interval.
    #[inline]
    pub fn iter(&self) -> ClosedOpenIntervalIterator<T> {
        ClosedOpenIntervalIterator {
            end_exclusive: self.end_exclusive,
            current: self.start_inclusive,
        }
    }
}

impl<T> Default for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn default() -> Self {
        Self::new_unchecked(T::zero(), T::zero())
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedOpenInterval")
            .field("start_inclusive", &self.start_inclusive)
            .field("end_exclusive", &self.end_exclusive)
            .finish()
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> IntoIterator for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    type Item = T;
    type IntoIter = ClosedOpenIntervalIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<std::ops::Range<T>> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::Range<T>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl<T> From<ClosedOpenInterval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(iv: ClosedOpenInterval<T>) -> Self {
        iv.start_inclusive..iv.end_exclusive
    }
}
