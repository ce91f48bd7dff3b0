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

//! A single category-to-category stage.
//!
//! A `StageMap` holds the validated rules of one almanac block, sorted by
//! source start and pairwise disjoint. Values not covered by any rule pass
//! through unchanged.
//!
//! Point lookup is a binary search for the only rule that can contain the
//! value. Range mapping runs a worklist per input range: the leftmost rule
//! overlapping a pending piece is located by binary search, the overlap is
//! emitted translated, and the leftovers go back on the worklist. Pieces that
//! overlap nothing are emitted unchanged. The cost per input range depends
//! on the number of rules it touches, never on its length.

use crate::{
    error::MalformedMappingError,
    range_set::RangeSet,
    shift::{MappingRule, ShiftInterval},
};
use num_traits::PrimInt;
use sluice_core::{
    algorithm::{find_containing, find_overlapping_neighbours, first_overlapping},
    math::interval::ClosedOpenInterval,
};
use smallvec::SmallVec;

/// Counts of the fragments a range mapping produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// Fragments translated by some rule.
    pub shifted: usize,
    /// Fragments no rule covered, emitted unchanged.
    pub identity: usize,
}

impl SplitStats {
    /// Returns the total number of emitted fragments.
    #[inline]
    pub fn fragments(&self) -> usize {
        self.shifted + self.identity
    }
}

/// The validated mapping of one stage.
#[derive(Clone, PartialEq, Eq)]
pub struct StageMap<T>
where
    T: PrimInt,
{
    name: Option<String>,
    intervals: Vec<ShiftInterval<T>>,
}

impl<T> StageMap<T>
where
    T: PrimInt,
{
    /// Builds an unnamed stage from raw rules.
    ///
    /// Rules may arrive in any order; they are sorted by source start.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedMappingError` if a rule is invalid on its own
    /// (see `ShiftInterval::try_from_rule`) or if two rules overlap.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_model::shift::MappingRule;
    /// # use sluice_model::stage::StageMap;
    ///
    /// let stage = StageMap::new([MappingRule::new(50, 98, 2), MappingRule::new(52, 50, 48)]).unwrap();
    /// assert_eq!(stage.map_point(79), 81);
    /// assert_eq!(stage.map_point(99), 51);
    /// assert_eq!(stage.map_point(10), 10);
    ///
    /// let overlapping = StageMap::new([MappingRule::new(0, 0, 10), MappingRule::new(100, 5, 10)]);
    /// assert!(overlapping.is_err());
    /// ```
    pub fn new<I>(rules: I) -> Result<Self, MalformedMappingError<T>>
    where
        I: IntoIterator<Item = MappingRule<T>>,
    {
        let mut intervals = rules
            .into_iter()
            .map(ShiftInterval::try_from_rule)
            .collect::<Result<Vec<_>, _>>()?;

        intervals.sort_unstable_by_key(|iv| iv.start());

        if let Some((a, b)) = find_overlapping_neighbours(&intervals) {
            return Err(MalformedMappingError::Overlap {
                first: intervals[a].rule(),
                second: intervals[b].rule(),
            });
        }

        Ok(Self {
            name: None,
            intervals,
        })
    }

    /// Builds a stage labelled with its block header, e.g. `seed-to-soil map:`.
    pub fn named<S, I>(name: S, rules: I) -> Result<Self, MalformedMappingError<T>>
    where
        S: Into<String>,
        I: IntoIterator<Item = MappingRule<T>>,
    {
        let mut stage = Self::new(rules)?;
        stage.name = Some(name.into());
        Ok(stage)
    }

    /// Creates a stage without rules, which maps everything to itself.
    #[inline]
    pub fn identity() -> Self {
        Self {
            name: None,
            intervals: Vec::new(),
        }
    }

    /// Returns the block header this stage was built from, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the `(source, destination)` categories named by the header.
    ///
    /// Headers of the shape `<source>-to-<destination> map:` are recognised;
    /// any other header (or none) yields `None`.
    ///
    /// ```rust
    /// # use sluice_model::stage::StageMap;
    /// let stage = StageMap::<i64>::named("seed-to-soil map:", []).unwrap();
    /// assert_eq!(stage.categories(), Some(("seed", "soil")));
    /// ```
    pub fn categories(&self) -> Option<(&str, &str)> {
        let token = self.name.as_deref()?.split_whitespace().next()?;
        let (source, destination) = token.trim_end_matches(':').split_once("-to-")?;
        (!source.is_empty() && !destination.is_empty()).then_some((source, destination))
    }

    /// Returns the validated rules, sorted by source start.
    #[inline]
    pub fn intervals(&self) -> &[ShiftInterval<T>] {
        &self.intervals
    }

    /// Returns the number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the stage has no rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Maps one value; values outside every rule are returned unchanged.
    #[inline]
    pub fn map_point(&self, value: T) -> T {
        match find_containing(&self.intervals, value) {
            Some(idx) => self.intervals[idx].map_point(value),
            None => value,
        }
    }

    /// Maps every range of `ranges` and returns the resulting fragments.
    ///
    /// For each input range the emitted fragments' pre-images tile the
    /// input range exactly, so the total length is preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    /// # use sluice_model::{range_set::RangeSet, shift::MappingRule, stage::StageMap};
    ///
    /// // [10, 20) -> +5
    /// let stage = StageMap::new([MappingRule::new(15, 10, 10)]).unwrap();
    /// let out = stage.map_ranges(&RangeSet::from_pairs([(5, 10)]).unwrap()).coalesced();
    /// assert_eq!(out.as_slice(), &[ClosedOpenInterval::new(5, 10), ClosedOpenInterval::new(15, 20)]);
    /// ```
    pub fn map_ranges(&self, ranges: &RangeSet<T>) -> RangeSet<T> {
        self.map_ranges_traced(ranges).0
    }

    /// Like `map_ranges`, but also reports how many fragments were shifted
    /// and how many passed through unchanged.
    pub fn map_ranges_traced(&self, ranges: &RangeSet<T>) -> (RangeSet<T>, SplitStats) {
        let mut out = RangeSet::with_capacity(ranges.len());
        let mut stats = SplitStats::default();
        for &range in ranges {
            self.split_into(range, &mut out, &mut stats);
        }
        (out, stats)
    }

    fn split_into(
        &self,
        range: ClosedOpenInterval<T>,
        out: &mut RangeSet<T>,
        stats: &mut SplitStats,
    ) {
        let mut pending: SmallVec<ClosedOpenInterval<T>, 4> = SmallVec::new();
        pending.push(range);

        while let Some(piece) = pending.pop() {
            let overlap = first_overlapping(&self.intervals, piece)
                .and_then(|idx| self.intervals[idx].overlap(piece));

            match overlap {
                Some(cut) => {
                    out.push(cut.mapped);
                    stats.shifted += 1;
                    pending.extend(cut.before);
                    pending.extend(cut.after);
                }
                None => {
                    out.push(piece);
                    stats.identity += 1;
                }
            }
        }
    }
}

impl<T> Default for StageMap<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> std::fmt::Debug for StageMap<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageMap")
            .field("name", &self.name)
            .field("intervals", &self.intervals)
            .finish()
    }
}

impl<T> std::fmt::Display for StageMap<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name().unwrap_or("<unnamed stage>"))?;
        for iv in &self.intervals {
            writeln!(f, "  {}", iv)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    type IntegerType = i64;

    fn iv(s: IntegerType, e: IntegerType) -> ClosedOpenInterval<IntegerType> {
        ClosedOpenInterval::new(s, e)
    }

    fn rule(dest: IntegerType, src: IntegerType, len: IntegerType) -> MappingRule<IntegerType> {
        MappingRule::new(dest, src, len)
    }

    fn ranges(pairs: &[(IntegerType, IntegerType)]) -> RangeSet<IntegerType> {
        RangeSet::from_pairs(pairs.iter().copied()).unwrap()
    }

    /// Maps every value of `input` point by point and checks that the
    /// multiset of results equals the multiset of values covered by `output`.
    fn assert_same_image(
        stage: &StageMap<IntegerType>,
        input: &RangeSet<IntegerType>,
        output: &RangeSet<IntegerType>,
    ) {
        let mut expected: Vec<IntegerType> = input
            .iter()
            .flat_map(|r| r.iter())
            .map(|v| stage.map_point(v))
            .collect();
        let mut actual: Vec<IntegerType> = output.iter().flat_map(|r| r.iter()).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rules_are_sorted() {
        let stage = StageMap::new([rule(0, 50, 5), rule(100, 10, 5), rule(7, 30, 2)]).unwrap();
        let starts: Vec<_> = stage.intervals().iter().map(|s| s.start()).collect();
        assert_eq!(starts, vec![10, 30, 50]);
    }

    #[test]
    fn test_overlapping_rules_are_rejected() {
        let err = StageMap::new([rule(0, 0, 10), rule(100, 5, 10)]).unwrap_err();
        assert_eq!(
            err,
            MalformedMappingError::Overlap {
                first: rule(0, 0, 10),
                second: rule(100, 5, 10),
            }
        );
    }

    #[test]
    fn test_overlap_detected_regardless_of_input_order() {
        let result = StageMap::new([rule(0, 40, 5), rule(0, 0, 10), rule(0, 100, 1), rule(0, 9, 2)]);
        assert!(matches!(result, Err(MalformedMappingError::Overlap { .. })));
    }

    #[test]
    fn test_touching_rules_are_accepted() {
        let stage = StageMap::new([rule(100, 0, 10), rule(200, 10, 10)]).unwrap();
        assert_eq!(stage.map_point(9), 109);
        assert_eq!(stage.map_point(10), 200);
    }

    #[test]
    fn test_invalid_rule_is_rejected() {
        assert_eq!(
            StageMap::new([rule(5, 5, 0)]),
            Err(MalformedMappingError::NonPositiveLength { rule: rule(5, 5, 0) })
        );
    }

    #[test]
    fn test_identity_stage() {
        let stage = StageMap::<IntegerType>::identity();
        assert!(stage.is_empty());
        for v in [-5, 0, 42, IntegerType::MAX] {
            assert_eq!(stage.map_point(v), v);
        }
        let input = ranges(&[(3, 4), (-10, 2)]);
        let (out, stats) = stage.map_ranges_traced(&input);
        assert_eq!(out, input);
        assert_eq!(stats, SplitStats { shifted: 0, identity: 2 });
    }

    #[test]
    fn test_single_interval_shift() {
        // [10, 20) -> +5
        let stage = StageMap::new([rule(15, 10, 10)]).unwrap();
        assert_eq!(stage.map_point(15), 20);
        assert_eq!(stage.map_point(25), 25);

        let input = ranges(&[(5, 10)]);
        let (out, stats) = stage.map_ranges_traced(&input);
        assert_eq!(out.len(), 2);
        assert!(out.as_slice().contains(&iv(5, 10)));
        assert!(out.as_slice().contains(&iv(15, 20)));
        assert_eq!(stats, SplitStats { shifted: 1, identity: 1 });
        assert_same_image(&stage, &input, &out);
    }

    #[test]
    fn test_range_spanning_several_rules_and_gaps() {
        let stage = StageMap::new([rule(1000, 10, 10), rule(-50, 30, 5), rule(0, 35, 5)]).unwrap();
        let input = ranges(&[(0, 50)]);
        let (out, stats) = stage.map_ranges_traced(&input);

        // [0,10) id, [10,20)->[1000,1010), [20,30) id, [30,35)->[-50,-45), [35,40)->[0,5), [40,50) id
        let mut sorted = out.as_slice().to_vec();
        sorted.sort_unstable();
        assert_eq!(
            sorted,
            vec![iv(-50, -45), iv(0, 5), iv(0, 10), iv(20, 30), iv(40, 50), iv(1000, 1010)]
        );
        assert_eq!(stats.shifted, 3);
        assert_eq!(stats.identity, 3);
        assert_eq!(out.total_len(), input.total_len());
        assert_same_image(&stage, &input, &out);
    }

    #[test]
    fn test_range_inside_one_rule() {
        let stage = StageMap::new([rule(72, 79, 14)]).unwrap();
        let out = stage.map_ranges(&ranges(&[(80, 3)]));
        assert_eq!(out.as_slice(), &[iv(73, 76)]);
    }

    #[test]
    fn test_point_and_range_agree_on_random_stages() {
        let mut rng = StdRng::seed_from_u64(0x5EED);

        for _ in 0..200 {
            // Build disjoint rules by walking left to right with random gaps.
            let mut rules = Vec::new();
            let mut cursor: IntegerType = rng.random_range(-50..50);
            for _ in 0..rng.random_range(0..6) {
                cursor += rng.random_range(0..8);
                let len = rng.random_range(1..12);
                let dest = rng.random_range(-100..100);
                rules.push(rule(dest, cursor, len));
                cursor += len;
            }
            let stage = StageMap::new(rules).unwrap();

            let pairs: Vec<(IntegerType, IntegerType)> = (0..rng.random_range(1..4))
                .map(|_| (rng.random_range(-80..80), rng.random_range(1..40)))
                .collect();
            let input = ranges(&pairs);
            let out = stage.map_ranges(&input);

            assert_eq!(out.total_len(), input.total_len());
            assert_same_image(&stage, &input, &out);
        }
    }

    #[test]
    fn test_categories() {
        let stage = StageMap::<IntegerType>::named("soil-to-fertilizer map:", []).unwrap();
        assert_eq!(stage.name(), Some("soil-to-fertilizer map:"));
        assert_eq!(stage.categories(), Some(("soil", "fertilizer")));

        let stage = StageMap::<IntegerType>::named("  water-to-light:  ", []).unwrap();
        assert_eq!(stage.categories(), Some(("water", "light")));

        let stage = StageMap::<IntegerType>::named("stage three", []).unwrap();
        assert_eq!(stage.categories(), None);

        assert_eq!(StageMap::<IntegerType>::identity().categories(), None);
    }

    #[test]
    fn test_display() {
        let stage = StageMap::named("a-to-b map:", [rule(15, 10, 10)]).unwrap();
        assert_eq!(format!("{}", stage), "a-to-b map:\n  [10, 20) -> +5\n");
    }
}
