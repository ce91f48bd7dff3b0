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

//! # Sorted-Interval Search
//!
//! Binary searches over slices of intervals that are sorted by start and
//! pairwise disjoint. Stage maps keep their rules in this shape so that a
//! point lookup costs `O(log n)` and a range split costs `O(k log n)` for `k`
//! touched rules.
//!
//! The functions are generic over `AsInterval`, so they work on plain
//! `ClosedOpenInterval`s as well as on richer rule types that carry a span.

use crate::math::interval::ClosedOpenInterval;
use num_traits::PrimInt;

/// Types that cover a half-open span of integers.
pub trait AsInterval<T>
where
    T: PrimInt,
{
    /// Returns the span covered by `self`.
    fn as_interval(&self) -> ClosedOpenInterval<T>;
}

impl<T> AsInterval<T> for ClosedOpenInterval<T>
where
    T: PrimInt,
{
    #[inline(always)]
    fn as_interval(&self) -> ClosedOpenInterval<T> {
        *self
    }
}

/// Checks whether the given intervals are disjoint and sorted by start.
///
/// Touching intervals (`[0, 5)` followed by `[5, 10)`) count as disjoint.
#[inline(always)]
pub fn are_disjoint_and_sorted<T, I>(intervals: &[I]) -> bool
where
    T: PrimInt,
    I: AsInterval<T>,
{
    intervals
        .windows(2)
        .all(|w| w[0].as_interval().end() <= w[1].as_interval().start())
}

/// Returns the indices of the first two neighbours that overlap, if any.
///
/// `intervals` must be sorted by start. With sorted input, any overlap in the
/// whole slice implies an overlap between some pair of neighbours, so a
/// single linear pass is enough to validate a stage.
pub fn find_overlapping_neighbours<T, I>(intervals: &[I]) -> Option<(usize, usize)>
where
    T: PrimInt,
    I: AsInterval<T>,
{
    debug_assert!(
        intervals
            .windows(2)
            .all(|w| w[0].as_interval().start() <= w[1].as_interval().start()),
        "called `find_overlapping_neighbours` with intervals that are not sorted by start"
    );

    intervals
        .windows(2)
        .position(|w| w[0].as_interval().intersects(w[1].as_interval()))
        .map(|i| (i, i + 1))
}

/// Returns the number of intervals whose start is `<= key`.
///
/// Equivalently, the index of the first interval starting strictly after
/// `key`. The interval at `result - 1` (if any) is the only candidate that
/// can contain `key`.
///
/// # Invariants
///
/// - `intervals` must be sorted by start in ascending order.
#[inline(always)]
pub fn upper_bound_start<T, I>(intervals: &[I], key: T) -> usize
where
    T: PrimInt,
    I: AsInterval<T>,
{
    debug_assert!(
        are_disjoint_and_sorted(intervals),
        "called `upper_bound_start` with intervals that are not disjoint and sorted"
    );

    let mut lo: usize = 0;
    let mut hi: usize = intervals.len();

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        // SAFETY: lo < hi <= intervals.len(), therefore mid < intervals.len().
        if unsafe { intervals.get_unchecked(mid) }.as_interval().start() <= key {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Returns the index of the interval containing `value`, if any.
///
/// # Examples
///
/// ```rust
/// # use sluice_core::algorithm::find_containing;
/// # use sluice_core::math::interval::ClosedOpenInterval;
///
/// let rules = [ClosedOpenInterval::new(0, 5), ClosedOpenInterval::new(10, 20)];
/// assert_eq!(find_containing(&rules, 12), Some(1));
/// assert_eq!(find_containing(&rules, 7), None);
/// ```
#[inline]
pub fn find_containing<T, I>(intervals: &[I], value: T) -> Option<usize>
where
    T: PrimInt,
    I: AsInterval<T>,
{
    let candidate = upper_bound_start(intervals, value).checked_sub(1)?;
    intervals[candidate]
        .as_interval()
        .contains_point(value)
        .then_some(candidate)
}

/// Returns the index of the leftmost interval sharing a point with `range`.
///
/// Empty ranges overlap nothing.
pub fn first_overlapping<T, I>(intervals: &[I], range: ClosedOpenInterval<T>) -> Option<usize>
where
    T: PrimInt,
    I: AsInterval<T>,
{
    if range.is_empty() {
        return None;
    }

    let idx = upper_bound_start(intervals, range.start());

    // The interval starting at or before `range.start()` may still reach into it.
    if let Some(prev) = idx.checked_sub(1)
        && intervals[prev].as_interval().end() > range.start()
    {
        return Some(prev);
    }

    // Otherwise the next interval is the leftmost one that can.
    (idx < intervals.len() && intervals[idx].as_interval().start() < range.end()).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(s, e)
    }

    #[test]
    fn test_are_disjoint_and_sorted() {
        let empty: Vec<ClosedOpenInterval<IntegerType>> = vec![];
        assert!(are_disjoint_and_sorted(&empty));
        assert!(are_disjoint_and_sorted(&[iv(0, 5), iv(5, 10), iv(12, 20)]));
        assert!(!are_disjoint_and_sorted(&[iv(0, 10), iv(9, 15)]));
        assert!(!are_disjoint_and_sorted(&[iv(10, 20), iv(0, 5)]));
    }

    #[test]
    fn test_find_overlapping_neighbours() {
        assert_eq!(find_overlapping_neighbours(&[iv(0, 5), iv(5, 10)]), None);
        assert_eq!(
            find_overlapping_neighbours(&[iv(0, 5), iv(5, 10), iv(8, 12)]),
            Some((1, 2))
        );
        assert_eq!(find_overlapping_neighbours(&[iv(0, 10), iv(5, 15)]), Some((0, 1)));
    }

    #[test]
    fn test_upper_bound_start() {
        let v = vec![iv(0, 5), iv(5, 10), iv(10, 20)];
        assert_eq!(upper_bound_start(&v, -1), 0);
        assert_eq!(upper_bound_start(&v, 0), 1);
        assert_eq!(upper_bound_start(&v, 4), 1);
        assert_eq!(upper_bound_start(&v, 5), 2);
        assert_eq!(upper_bound_start(&v, 10), 3);
        assert_eq!(upper_bound_start(&v, 100), 3);
    }

    #[test]
    fn test_find_containing() {
        let v = vec![iv(0, 5), iv(10, 20), iv(20, 25)];
        assert_eq!(find_containing(&v, -1), None);
        assert_eq!(find_containing(&v, 0), Some(0));
        assert_eq!(find_containing(&v, 4), Some(0));
        assert_eq!(find_containing(&v, 5), None);
        assert_eq!(find_containing(&v, 19), Some(1));
        assert_eq!(find_containing(&v, 20), Some(2));
        assert_eq!(find_containing(&v, 25), None);
    }

    #[test]
    fn test_find_containing_empty_slice() {
        let v: Vec<ClosedOpenInterval<IntegerType>> = vec![];
        assert_eq!(find_containing(&v, 3), None);
    }

    #[test]
    fn test_first_overlapping() {
        let v = vec![iv(0, 5), iv(10, 20), iv(30, 40)];
        // Starts inside the first interval.
        assert_eq!(first_overlapping(&v, iv(3, 12)), Some(0));
        // Starts in a gap, reaches the second.
        assert_eq!(first_overlapping(&v, iv(5, 11)), Some(1));
        // Lies entirely in a gap.
        assert_eq!(first_overlapping(&v, iv(5, 10)), None);
        assert_eq!(first_overlapping(&v, iv(20, 30)), None);
        // Left of everything, and right of everything.
        assert_eq!(first_overlapping(&v, iv(-10, 0)), None);
        assert_eq!(first_overlapping(&v, iv(-10, 1)), Some(0));
        assert_eq!(first_overlapping(&v, iv(40, 50)), None);
        // Empty ranges overlap nothing.
        assert_eq!(first_overlapping(&v, iv(12, 12)), None);
    }
}
