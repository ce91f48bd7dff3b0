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

//! # Pipelines
//!
//! A `Pipeline` is an ordered, non-empty list of `StageMap`s. The output of
//! stage `i` is the input of stage `i + 1`; a value (or range) is pushed
//! through every stage in order.
//!
//! Pipelines are built once, either through `build_pipeline` from raw blocks
//! or incrementally with a `PipelineBuilder`, and never mutated afterwards.
//! Every query is a pure function of the pipeline and its input, which makes
//! a `Pipeline` safe to share between threads by reference.
//!
//! ```rust
//! use sluice_model::pipeline::PipelineBuilder;
//! use sluice_model::shift::MappingRule;
//!
//! let mut builder = PipelineBuilder::<i64>::new();
//! builder
//!     .add_stage([MappingRule::new(100, 0, 10)])
//!     .add_stage([MappingRule::new(101, 100, 10)]);
//! let pipeline = builder.build().unwrap();
//!
//! assert_eq!(pipeline.len(), 2);
//! assert_eq!(pipeline.apply_point(5), 106);
//! ```

use crate::{
    error::PipelineError,
    index::StageIndex,
    range_set::RangeSet,
    shift::MappingRule,
    stage::{SplitStats, StageMap},
};
use log::{debug, trace};
use num_traits::PrimInt;

/// The rules of one stage as they appear in the input, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMappingBlock<T> {
    /// The block's header line, e.g. `seed-to-soil map:`.
    pub header: Option<String>,
    pub rules: Vec<MappingRule<T>>,
}

impl<T> RawMappingBlock<T> {
    /// Creates a block without a header.
    #[inline]
    pub fn new(rules: Vec<MappingRule<T>>) -> Self {
        Self {
            header: None,
            rules,
        }
    }

    /// Creates a block labelled with `header`.
    #[inline]
    pub fn named<S>(header: S, rules: Vec<MappingRule<T>>) -> Self
    where
        S: Into<String>,
    {
        Self {
            header: Some(header.into()),
            rules,
        }
    }
}

/// Builds a pipeline from raw blocks, in order.
///
/// # Errors
///
/// - `PipelineError::Empty` if `blocks` yields nothing.
/// - `PipelineError::Mapping` naming the first stage whose rules are malformed.
///
/// # Examples
///
/// ```rust
/// # use sluice_model::pipeline::{build_pipeline, RawMappingBlock};
/// # use sluice_model::shift::MappingRule;
///
/// let pipeline = build_pipeline([
///     RawMappingBlock::new(vec![MappingRule::new(72, 79, 14)]),
/// ])
/// .unwrap();
/// assert_eq!(pipeline.apply_point(80), 73);
///
/// assert!(build_pipeline(Vec::<RawMappingBlock<i64>>::new()).is_err());
/// ```
pub fn build_pipeline<T, I>(blocks: I) -> Result<Pipeline<T>, PipelineError<T>>
where
    T: PrimInt,
    I: IntoIterator<Item = RawMappingBlock<T>>,
{
    let mut builder = PipelineBuilder::new();
    builder.extend(blocks);
    builder.build()
}

/// An ordered, non-empty chain of stages.
#[derive(Clone, PartialEq, Eq)]
pub struct Pipeline<T>
where
    T: PrimInt,
{
    stages: Vec<StageMap<T>>,
}

impl<T> Pipeline<T>
where
    T: PrimInt,
{
    /// Returns the stages in application order.
    #[inline]
    pub fn stages(&self) -> &[StageMap<T>] {
        &self.stages
    }

    /// Returns the stage at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than `self.len()`.
    #[inline]
    pub fn stage(&self, index: StageIndex) -> &StageMap<T> {
        let index = index.get();
        assert!(
            index < self.stages.len(),
            "called `Pipeline::stage` with stage index out of bounds: the len is {} but the index is {}",
            self.stages.len(),
            index
        );
        &self.stages[index]
    }

    /// Returns the number of stages. Always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always `false`: a pipeline has at least one stage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the total number of rules over all stages.
    #[inline]
    pub fn num_rules(&self) -> usize {
        self.stages.iter().map(StageMap::len).sum()
    }

    /// Returns the category the first stage consumes, if its header names one.
    #[inline]
    pub fn source_category(&self) -> Option<&str> {
        self.stages.first()?.categories().map(|(source, _)| source)
    }

    /// Returns the category the last stage produces, if its header names one.
    #[inline]
    pub fn destination_category(&self) -> Option<&str> {
        self.stages.last()?.categories().map(|(_, dest)| dest)
    }

    /// Pushes one value through every stage.
    #[inline]
    pub fn apply_point(&self, value: T) -> T {
        self.stages
            .iter()
            .fold(value, |acc, stage| stage.map_point(acc))
    }

    /// Pushes one value through every stage and records every intermediate
    /// value, starting with `value` itself.
    ///
    /// ```rust
    /// # use sluice_model::pipeline::{build_pipeline, RawMappingBlock};
    /// # use sluice_model::shift::MappingRule;
    /// let pipeline = build_pipeline([
    ///     RawMappingBlock::new(vec![MappingRule::new(100, 0, 10)]),
    ///     RawMappingBlock::new(vec![MappingRule::new(101, 100, 10)]),
    /// ])
    /// .unwrap();
    /// assert_eq!(pipeline.trace_point(5), vec![5, 105, 106]);
    /// ```
    pub fn trace_point(&self, value: T) -> Vec<T> {
        let mut path = Vec::with_capacity(self.stages.len() + 1);
        path.push(value);
        let mut current = value;
        for stage in &self.stages {
            current = stage.map_point(current);
            path.push(current);
        }
        path
    }

    /// Pushes a set of ranges through every stage.
    ///
    /// The result may contain more (and overlapping) fragments than the
    /// input, but its total length equals the input's: nothing is lost and
    /// nothing is duplicated.
    pub fn apply_ranges(&self, ranges: &RangeSet<T>) -> RangeSet<T> {
        let mut current = ranges.clone();
        for stage in &self.stages {
            current = stage.map_ranges(&current);
        }
        current
    }

    /// Like `apply_ranges`, but hands the output of every stage to
    /// `per_stage` together with the stage's index and split statistics.
    /// Whatever the hook returns is fed into the next stage.
    ///
    /// The first error returned by the hook stops the fold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_model::pipeline::{build_pipeline, RawMappingBlock};
    /// # use sluice_model::range_set::RangeSet;
    /// # use sluice_model::shift::MappingRule;
    /// let pipeline = build_pipeline([
    ///     RawMappingBlock::new(vec![MappingRule::new(15, 10, 10)]),
    /// ])
    /// .unwrap();
    /// let input = RangeSet::from_pairs([(5, 10)]).unwrap();
    ///
    /// let mut counts = Vec::new();
    /// let out = pipeline
    ///     .apply_ranges_with(&input, |_, set, stats| {
    ///         counts.push(stats.fragments());
    ///         Ok::<_, ()>(set.coalesced())
    ///     })
    ///     .unwrap();
    /// assert_eq!(counts, vec![2]);
    /// assert_eq!(out.min_start(), Some(5));
    /// ```
    pub fn apply_ranges_with<F, E>(&self, ranges: &RangeSet<T>, mut per_stage: F) -> Result<RangeSet<T>, E>
    where
        F: FnMut(StageIndex, RangeSet<T>, SplitStats) -> Result<RangeSet<T>, E>,
    {
        let mut current = ranges.clone();
        for (i, stage) in self.stages.iter().enumerate() {
            let (mapped, stats) = stage.map_ranges_traced(&current);
            trace!(
                "stage {}: {} fragments ({} shifted, {} identity)",
                i,
                stats.fragments(),
                stats.shifted,
                stats.identity
            );
            current = per_stage(StageIndex::new(i), mapped, stats)?;
        }
        Ok(current)
    }
}

impl<T> std::fmt::Debug for Pipeline<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .finish()
    }
}

impl<T> std::fmt::Display for Pipeline<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Pipeline ({} stages, {} rules)",
            self.len(),
            self.num_rules()
        )?;
        for stage in &self.stages {
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

/// Incremental construction of a `Pipeline`.
///
/// Stages are validated in `build`, so the first malformed block is reported
/// with its position in the chain.
///
/// # Configuration
///
/// * `verify_category_chain`: if `true`, every stage whose header names its
///   categories must consume the category the previous stage produces.
///   Headers without categories are not checked. Defaults to `false`.
#[derive(Clone)]
pub struct PipelineBuilder<T> {
    blocks: Vec<RawMappingBlock<T>>,
    verify_category_chain: bool,
}

impl<T> Default for PipelineBuilder<T> {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            verify_category_chain: false,
        }
    }
}

impl<T> PipelineBuilder<T>
where
    T: PrimInt,
{
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables category chain verification.
    #[inline]
    pub fn verify_category_chain(&mut self, yes: bool) -> &mut Self {
        self.verify_category_chain = yes;
        self
    }

    /// Appends an unnamed stage.
    #[inline]
    pub fn add_stage<I>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = MappingRule<T>>,
    {
        self.blocks
            .push(RawMappingBlock::new(rules.into_iter().collect()));
        self
    }

    /// Appends a stage labelled with its header line.
    #[inline]
    pub fn add_named_stage<S, I>(&mut self, header: S, rules: I) -> &mut Self
    where
        S: Into<String>,
        I: IntoIterator<Item = MappingRule<T>>,
    {
        self.blocks
            .push(RawMappingBlock::named(header, rules.into_iter().collect()));
        self
    }

    /// Appends a raw block.
    #[inline]
    pub fn add_block(&mut self, block: RawMappingBlock<T>) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Returns the number of stages added so far.
    #[inline]
    pub fn num_stages(&self) -> usize {
        self.blocks.len()
    }

    /// Validates every stage and assembles the pipeline.
    ///
    /// # Errors
    ///
    /// - `PipelineError::Empty` if no stage was added.
    /// - `PipelineError::Mapping` for the first stage with malformed rules.
    /// - `PipelineError::BrokenChain` if chain verification is enabled and
    ///   two neighbouring stages disagree on the category between them.
    pub fn build(self) -> Result<Pipeline<T>, PipelineError<T>> {
        if self.blocks.is_empty() {
            return Err(PipelineError::Empty);
        }

        let stages = self
            .blocks
            .into_iter()
            .enumerate()
            .map(|(i, block)| {
                let stage = match block.header {
                    Some(header) => StageMap::named(header, block.rules),
                    None => StageMap::new(block.rules),
                };
                stage.map_err(|source| PipelineError::Mapping {
                    stage: StageIndex::new(i),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if self.verify_category_chain {
            check_category_chain(&stages)?;
        }

        let pipeline = Pipeline { stages };
        debug!(
            "built pipeline with {} stages and {} rules",
            pipeline.len(),
            pipeline.num_rules()
        );
        Ok(pipeline)
    }
}

impl<T> Extend<RawMappingBlock<T>> for PipelineBuilder<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = RawMappingBlock<T>>,
    {
        self.blocks.extend(iter);
    }
}

impl<T> std::fmt::Debug for PipelineBuilder<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("blocks", &self.blocks)
            .field("verify_category_chain", &self.verify_category_chain)
            .finish()
    }
}

fn check_category_chain<T>(stages: &[StageMap<T>]) -> Result<(), PipelineError<T>>
where
    T: PrimInt,
{
    for (i, pair) in stages.windows(2).enumerate() {
        if let (Some((_, produced)), Some((consumed, _))) =
            (pair[0].categories(), pair[1].categories())
            && produced != consumed
        {
            return Err(PipelineError::BrokenChain {
                stage: StageIndex::new(i + 1),
                expected: produced.to_owned(),
                found: consumed.to_owned(),
            });
        }
    }
    Ok(())
}
