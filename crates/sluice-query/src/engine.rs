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

//! # Query Engine
//!
//! Answers "what is the smallest output of the pipeline" for two kinds of
//! input:
//!
//! - point mode: a list of individual values, each pushed through
//!   `Pipeline::apply_point`;
//! - range mode: `(start, length)` pairs, pushed through the pipeline as whole
//!   ranges. Each stage splits ranges only where rule boundaries cut them, so
//!   the cost depends on the number of fragments, not on the number of values
//!   the ranges contain.
//!
//! ## Parallelism
//!
//! With `QueryConfig::threads > 1` and at least two input ranges, the ranges
//! are split into contiguous shards, one per scoped thread. Each worker folds
//! its shard through the whole pipeline and offers its local minimum to a
//! `SharedMinimum`; joining the scope is the reduction barrier. The pipeline
//! is only read, so workers share it by reference.
//!
//! ## Enumeration
//!
//! `minimum_by_enumeration` visits every value of every range. It is bounded
//! by `QueryConfig::enumeration_limit` and exists as a reference for checking
//! range mode on small inputs.
//!
//! ```rust
//! use sluice_model::pipeline::{build_pipeline, RawMappingBlock};
//! use sluice_model::shift::MappingRule;
//! use sluice_query::engine::QueryEngine;
//!
//! // [79, 93) -> -7
//! let pipeline = build_pipeline([RawMappingBlock::new(vec![MappingRule::new(72, 79, 14)])]).unwrap();
//! let engine = QueryEngine::new(&pipeline);
//!
//! assert_eq!(engine.minimum_for_points(&[80, 100]).unwrap(), 73);
//! assert_eq!(engine.minimum_for_ranges([(79, 14)]).unwrap(), 72);
//! ```

use crate::{
    config::QueryConfig,
    error::QueryError,
    minimum::SharedMinimum,
    result::QueryOutcome,
    stats::QueryStatisticsBuilder,
};
use log::{debug, info};
use rustc_hash::FxHashMap;
use sluice_core::num::MapNumeric;
use sluice_model::{error::EmptyInputError, pipeline::Pipeline, range_set::RangeSet};

/// Evaluates minimum queries against a borrowed pipeline.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'p, T>
where
    T: MapNumeric,
{
    pipeline: &'p Pipeline<T>,
    config: QueryConfig,
}

/// What one worker reports back after folding its shard.
#[derive(Debug)]
struct ShardReport {
    stage_fragments: Vec<usize>,
    output_fragments: usize,
}

impl<'p, T> QueryEngine<'p, T>
where
    T: MapNumeric,
{
    /// Creates an engine with the default configuration.
    #[inline]
    pub fn new(pipeline: &'p Pipeline<T>) -> Self {
        Self::with_config(pipeline, QueryConfig::default())
    }

    /// Creates an engine with the given configuration.
    #[inline]
    pub fn with_config(pipeline: &'p Pipeline<T>, config: QueryConfig) -> Self {
        Self { pipeline, config }
    }

    /// Returns the pipeline queries run against.
    #[inline]
    pub fn pipeline(&self) -> &'p Pipeline<T> {
        self.pipeline
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Returns the pipeline output for each value, in input order.
    #[inline]
    pub fn locations_for_points(&self, values: &[T]) -> Vec<T> {
        values
            .iter()
            .map(|&v| self.pipeline.apply_point(v))
            .collect()
    }

    /// Returns the smallest pipeline output over `values`.
    ///
    /// The query domain is `[T::MIN, T::MAX)`: a value is treated like the
    /// single-value range `[v, v + 1)`, so `T::MAX` is rejected exactly as
    /// `minimum_for_ranges` rejects the pair `(T::MAX, 1)`.
    ///
    /// # Errors
    ///
    /// - `EmptyInputError::NoValues` if `values` is empty.
    /// - `EmptyInputError::Overflow` if a value is `T::MAX`.
    pub fn minimum_for_points(&self, values: &[T]) -> Result<T, QueryError<T>> {
        if let Some(index) = values.iter().position(|&v| v == T::max_value()) {
            return Err(EmptyInputError::Overflow {
                index,
                start: values[index],
                length: T::one(),
            }
            .into());
        }

        values
            .iter()
            .map(|&v| self.pipeline.apply_point(v))
            .min()
            .ok_or(QueryError::EmptyInput(EmptyInputError::NoValues))
    }

    /// Returns the smallest pipeline output over every value of the ranges
    /// described by `(start, length)` pairs.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if there are no pairs, a length is not positive or a
    ///   range does not fit the integer type.
    /// - `FragmentLimitExceeded` if a configured fragment limit is hit.
    pub fn minimum_for_ranges<I>(&self, pairs: I) -> Result<T, QueryError<T>>
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let ranges = RangeSet::from_pairs(pairs)?;
        self.minimum_for_range_set(&ranges)
    }

    /// Like `minimum_for_ranges`, for an already validated set.
    #[inline]
    pub fn minimum_for_range_set(&self, ranges: &RangeSet<T>) -> Result<T, QueryError<T>> {
        self.evaluate_ranges(ranges).map(|outcome| outcome.minimum())
    }

    /// Runs a range query and reports statistics alongside the minimum.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `ranges` is empty.
    /// - `FragmentLimitExceeded` if a configured fragment limit is hit.
    pub fn evaluate_ranges(&self, ranges: &RangeSet<T>) -> Result<QueryOutcome<T>, QueryError<T>> {
        if ranges.is_empty() {
            return Err(EmptyInputError::NoRanges.into());
        }

        let start_time = std::time::Instant::now();
        let minimum = SharedMinimum::new();

        let threads = self.config.threads().min(ranges.len());
        let reports = if threads > 1 {
            self.run_sharded(ranges, threads, &minimum)?
        } else {
            vec![self.run_shard(ranges, &minimum)?]
        };

        let mut stage_fragments = vec![0; self.pipeline.len()];
        let mut output_fragments = 0;
        for report in &reports {
            for (total, count) in stage_fragments.iter_mut().zip(&report.stage_fragments) {
                *total += count;
            }
            output_fragments += report.output_fragments;
        }

        let minimum = minimum
            .get()
            .ok_or(QueryError::EmptyInput(EmptyInputError::NoRanges))?;

        let statistics = QueryStatisticsBuilder::new()
            .input_ranges(ranges.len())
            .output_fragments(output_fragments)
            .stage_fragments(stage_fragments)
            .used_threads(reports.len())
            .query_duration(start_time.elapsed())
            .build();

        debug!(
            "range query over {} ranges: minimum {}, {} output fragments, peak {} fragments, {} threads",
            statistics.input_ranges,
            minimum,
            statistics.output_fragments,
            statistics.peak_fragments(),
            statistics.used_threads
        );

        Ok(QueryOutcome::new(minimum, statistics))
    }

    /// Returns the smallest pipeline output by mapping every value of every
    /// range individually.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `ranges` is empty.
    /// - `EnumerationLimitExceeded` if the ranges hold more values than
    ///   `QueryConfig::enumeration_limit`.
    pub fn minimum_by_enumeration(&self, ranges: &RangeSet<T>) -> Result<T, QueryError<T>> {
        if ranges.is_empty() {
            return Err(EmptyInputError::NoRanges.into());
        }

        let values = ranges.total_len();
        let limit = self.config.enumeration_limit();
        if values > i128::from(limit) {
            return Err(QueryError::EnumerationLimitExceeded { values, limit });
        }

        debug!("enumerating {} values over {} ranges", values, ranges.len());

        let points = ranges.iter().flat_map(|r| r.iter());
        let minimum = if self.config.memoize_points() {
            let mut cache: FxHashMap<T, T> = FxHashMap::default();
            points
                .map(|v| *cache.entry(v).or_insert_with(|| self.pipeline.apply_point(v)))
                .min()
        } else {
            points.map(|v| self.pipeline.apply_point(v)).min()
        };

        minimum.ok_or(QueryError::EmptyInput(EmptyInputError::NoRanges))
    }

    /// Folds `ranges` through the pipeline and offers the result's minimum.
    fn run_shard(
        &self,
        ranges: &RangeSet<T>,
        minimum: &SharedMinimum<T>,
    ) -> Result<ShardReport, QueryError<T>> {
        let coalesce = self.config.coalesce_between_stages();
        let fragment_limit = self.config.fragment_limit();
        let mut stage_fragments = Vec::with_capacity(self.pipeline.len());

        let output = self.pipeline.apply_ranges_with(ranges, |stage, set, split| {
            let fragments = split.fragments();
            stage_fragments.push(fragments);
            if let Some(limit) = fragment_limit
                && fragments > limit
            {
                return Err(QueryError::FragmentLimitExceeded {
                    stage,
                    fragments,
                    limit,
                });
            }
            Ok(if coalesce { set.coalesced() } else { set })
        })?;

        if let Some(local) = output.min_start() {
            minimum.offer(local);
        }

        Ok(ShardReport {
            stage_fragments,
            output_fragments: output.len(),
        })
    }

    /// Splits `ranges` into contiguous shards and folds each on its own thread.
    fn run_sharded(
        &self,
        ranges: &RangeSet<T>,
        threads: usize,
        minimum: &SharedMinimum<T>,
    ) -> Result<Vec<ShardReport>, QueryError<T>> {
        let shard_len = ranges.len().div_ceil(threads);
        info!(
            "sharding {} ranges across {} threads",
            ranges.len(),
            ranges.len().div_ceil(shard_len)
        );

        std::thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .as_slice()
                .chunks(shard_len)
                .map(|chunk| {
                    let shard: RangeSet<T> = chunk.iter().copied().collect();
                    scope.spawn(move || self.run_shard(&shard, minimum))
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(report) => report,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfigBuilder;
    use sluice_model::{
        index::StageIndex,
        pipeline::{RawMappingBlock, build_pipeline},
        shift::MappingRule,
    };

    type IntegerType = i64;

    fn rule(dest: IntegerType, src: IntegerType, len: IntegerType) -> MappingRule<IntegerType> {
        MappingRule::new(dest, src, len)
    }

    fn pipeline_of(stages: Vec<Vec<MappingRule<IntegerType>>>) -> Pipeline<IntegerType> {
        build_pipeline(stages.into_iter().map(RawMappingBlock::new)).unwrap()
    }

    fn sample_pipeline() -> Pipeline<IntegerType> {
        pipeline_of(vec![
            vec![rule(50, 98, 2), rule(52, 50, 48)],
            vec![rule(0, 15, 37), rule(37, 52, 2), rule(39, 0, 15)],
            vec![rule(49, 53, 8), rule(0, 11, 42), rule(42, 0, 7), rule(57, 7, 4)],
            vec![rule(88, 18, 7), rule(18, 25, 70)],
            vec![rule(45, 77, 23), rule(81, 45, 19), rule(68, 64, 13)],
            vec![rule(0, 69, 1), rule(1, 0, 69)],
            vec![rule(60, 56, 37), rule(56, 93, 4)],
        ])
    }

    #[test]
    fn test_sample_points_and_ranges() {
        let pipeline = sample_pipeline();
        let engine = QueryEngine::new(&pipeline);

        assert_eq!(engine.locations_for_points(&[79, 14, 55, 13]), vec![82, 43, 86, 35]);
        assert_eq!(engine.minimum_for_points(&[79, 14, 55, 13]), Ok(35));
        assert_eq!(engine.minimum_for_ranges([(79, 14), (55, 13)]), Ok(46));
    }

    #[test]
    fn test_single_stage_range_minimum() {
        let pipeline = pipeline_of(vec![vec![rule(72, 79, 14)]]);
        let engine = QueryEngine::new(&pipeline);
        assert_eq!(engine.minimum_for_ranges([(79, 14)]), Ok(72));
    }

    #[test]
    fn test_identity_stage() {
        let pipeline = pipeline_of(vec![vec![]]);
        let engine = QueryEngine::new(&pipeline);
        assert_eq!(engine.minimum_for_points(&[9, -4, 7]), Ok(-4));
        assert_eq!(engine.minimum_for_ranges([(30, 5), (12, 1)]), Ok(12));
    }

    #[test]
    fn test_empty_inputs_are_rejected() {
        let pipeline = sample_pipeline();
        let engine = QueryEngine::new(&pipeline);

        assert_eq!(
            engine.minimum_for_points(&[]),
            Err(QueryError::EmptyInput(EmptyInputError::NoValues))
        );
        assert_eq!(
            engine.minimum_for_ranges(std::iter::empty()),
            Err(QueryError::EmptyInput(EmptyInputError::NoRanges))
        );
        assert_eq!(
            engine.minimum_for_ranges([(5, 0)]),
            Err(QueryError::EmptyInput(EmptyInputError::NonPositiveLength {
                index: 0,
                start: 5,
                length: 0,
            }))
        );
        assert_eq!(
            engine.evaluate_ranges(&RangeSet::new()),
            Err(QueryError::EmptyInput(EmptyInputError::NoRanges))
        );
        assert_eq!(
            engine.minimum_by_enumeration(&RangeSet::new()),
            Err(QueryError::EmptyInput(EmptyInputError::NoRanges))
        );
    }

    #[test]
    fn test_points_and_unit_ranges_agree() {
        let pipeline = sample_pipeline();
        let engine = QueryEngine::new(&pipeline);
        let values: Vec<IntegerType> = (0..120).step_by(7).collect();

        let by_points = engine.minimum_for_points(&values).unwrap();
        let by_ranges = engine
            .minimum_for_ranges(values.iter().map(|&v| (v, 1)))
            .unwrap();
        assert_eq!(by_points, by_ranges);
    }

    #[test]
    fn test_points_and_unit_ranges_agree_at_domain_edges() {
        // [0, 10) -> +100
        let pipeline = pipeline_of(vec![vec![rule(100, 0, 10)]]);
        let engine = QueryEngine::new(&pipeline);

        let values = [IntegerType::MAX, 5];
        let expected = Err(QueryError::EmptyInput(EmptyInputError::Overflow {
            index: 0,
            start: IntegerType::MAX,
            length: 1,
        }));
        assert_eq!(engine.minimum_for_points(&values), expected);
        assert_eq!(
            engine.minimum_for_ranges(values.iter().map(|&v| (v, 1))),
            expected
        );

        let values = [IntegerType::MAX - 1, 5, IntegerType::MIN];
        assert_eq!(engine.minimum_for_points(&values), Ok(IntegerType::MIN));
        assert_eq!(
            engine.minimum_for_ranges(values.iter().map(|&v| (v, 1))),
            Ok(IntegerType::MIN)
        );

        let values = [IntegerType::MAX - 1, 5];
        assert_eq!(engine.minimum_for_points(&values), Ok(105));
        assert_eq!(
            engine.minimum_for_ranges(values.iter().map(|&v| (v, 1))),
            Ok(105)
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pipeline = sample_pipeline();
        let ranges = RangeSet::from_pairs([(79, 14), (55, 13), (0, 3), (90, 40), (20, 8)]).unwrap();

        let sequential = QueryEngine::new(&pipeline).evaluate_ranges(&ranges).unwrap();
        let config = QueryConfigBuilder::new().threads(3).build();
        let parallel = QueryEngine::with_config(&pipeline, config)
            .evaluate_ranges(&ranges)
            .unwrap();

        assert_eq!(parallel.minimum(), sequential.minimum());
        assert_eq!(parallel.statistics().used_threads, 3);
        assert_eq!(sequential.statistics().used_threads, 1);
    }

    #[test]
    fn test_threads_are_capped_by_range_count() {
        let pipeline = sample_pipeline();
        let config = QueryConfigBuilder::new().threads(16).build();
        let engine = QueryEngine::with_config(&pipeline, config);
        let outcome = engine
            .evaluate_ranges(&RangeSet::from_pairs([(79, 14), (55, 13)]).unwrap())
            .unwrap();
        assert_eq!(outcome.minimum(), 46);
        assert_eq!(outcome.statistics().used_threads, 2);
    }

    #[test]
    fn test_statistics() {
        // [10, 20) -> -5
        let pipeline = pipeline_of(vec![vec![rule(5, 10, 10)], vec![]]);
        let engine = QueryEngine::new(&pipeline);
        let outcome = engine
            .evaluate_ranges(&RangeSet::from_pairs([(5, 10)]).unwrap())
            .unwrap();

        // [5, 15) splits into [5, 10) unchanged and [10, 15) -> [5, 10); the
        // two fragments coincide and are merged before the second stage.
        let stats = outcome.statistics();
        assert_eq!(outcome.minimum(), 5);
        assert_eq!(stats.input_ranges, 1);
        assert_eq!(stats.stage_fragments, vec![2, 1]);
        assert_eq!(stats.output_fragments, 1);
    }

    #[test]
    fn test_coalescing_can_be_disabled() {
        let pipeline = pipeline_of(vec![vec![rule(5, 10, 10)], vec![]]);
        let config = QueryConfigBuilder::new().coalesce_between_stages(false).build();
        let outcome = QueryEngine::with_config(&pipeline, config)
            .evaluate_ranges(&RangeSet::from_pairs([(5, 10)]).unwrap())
            .unwrap();
        assert_eq!(outcome.minimum(), 5);
        assert_eq!(outcome.statistics().stage_fragments, vec![2, 2]);
        assert_eq!(outcome.statistics().output_fragments, 2);
    }

    #[test]
    fn test_fragment_limit() {
        let pipeline = pipeline_of(vec![vec![rule(100, 0, 1), rule(200, 2, 1), rule(300, 4, 1)]]);
        let config = QueryConfigBuilder::new().fragment_limit(4).build();
        let engine = QueryEngine::with_config(&pipeline, config);

        // [0, 6) becomes six fragments.
        assert_eq!(
            engine.minimum_for_ranges([(0, 6)]),
            Err(QueryError::FragmentLimitExceeded {
                stage: StageIndex::new(0),
                fragments: 6,
                limit: 4,
            })
        );
        assert_eq!(engine.minimum_for_ranges([(0, 3)]), Ok(1));
    }

    #[test]
    fn test_enumeration_matches_range_mode() {
        let pipeline = sample_pipeline();
        let ranges = RangeSet::from_pairs([(79, 14), (55, 13)]).unwrap();

        for memoize in [false, true] {
            let config = QueryConfigBuilder::new().memoize_points(memoize).build();
            let engine = QueryEngine::with_config(&pipeline, config);
            assert_eq!(engine.minimum_by_enumeration(&ranges), Ok(46));
        }
    }

    #[test]
    fn test_enumeration_limit() {
        let pipeline = sample_pipeline();
        let config = QueryConfigBuilder::new().enumeration_limit(20).build();
        let engine = QueryEngine::with_config(&pipeline, config);
        let ranges = RangeSet::from_pairs([(79, 14), (55, 13)]).unwrap();

        assert_eq!(
            engine.minimum_by_enumeration(&ranges),
            Err(QueryError::EnumerationLimitExceeded {
                values: 27,
                limit: 20,
            })
        );
        // Range mode is not bounded by the enumeration limit.
        assert_eq!(engine.minimum_for_range_set(&ranges), Ok(46));
    }

    #[test]
    fn test_narrow_integer_type() {
        let pipeline = build_pipeline([RawMappingBlock::new(vec![MappingRule::<i16>::new(
            -100, 0, 50,
        )])])
        .unwrap();
        let engine = QueryEngine::new(&pipeline);
        assert_eq!(engine.minimum_for_ranges([(10, 100)]), Ok(-90i16));
    }
}
