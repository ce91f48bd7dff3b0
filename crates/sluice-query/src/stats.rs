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

/// Statistics collected while evaluating a range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStatistics {
    /// Number of ranges in the query input.
    pub input_ranges: usize,
    /// Number of fragments left after the last stage.
    pub output_fragments: usize,
    /// Fragments emitted by each stage, summed over all workers.
    pub stage_fragments: Vec<usize>,
    /// Number of threads used during the query.
    pub used_threads: usize,
    /// Total duration of the query.
    pub query_duration: std::time::Duration,
}

impl QueryStatistics {
    /// Returns the largest number of fragments any stage emitted.
    #[inline]
    pub fn peak_fragments(&self) -> usize {
        self.stage_fragments.iter().copied().max().unwrap_or(0)
    }
}

impl std::fmt::Display for QueryStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Query Statistics:")?;
        writeln!(f, "  Input Ranges: {}", self.input_ranges)?;
        writeln!(f, "  Output Fragments: {}", self.output_fragments)?;
        writeln!(f, "  Peak Fragments: {}", self.peak_fragments())?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(
            f,
            "  Query Duration (secs): {:.3}",
            self.query_duration.as_secs_f64()
        )
    }
}

/// Builder for `QueryStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStatisticsBuilder {
    input_ranges: usize,
    output_fragments: usize,
    stage_fragments: Vec<usize>,
    used_threads: usize,
    query_duration: std::time::Duration,
}

impl Default for QueryStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryStatisticsBuilder {
    /// Creates a new `QueryStatisticsBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            input_ranges: 0,
            output_fragments: 0,
            stage_fragments: Vec::new(),
            used_threads: 1,
            query_duration: std::time::Duration::ZERO,
        }
    }

    /// Sets the number of input ranges.
    #[inline]
    pub fn input_ranges(mut self, input_ranges: usize) -> Self {
        self.input_ranges = input_ranges;
        self
    }

    /// Sets the number of fragments left after the last stage.
    #[inline]
    pub fn output_fragments(mut self, output_fragments: usize) -> Self {
        self.output_fragments = output_fragments;
        self
    }

    /// Sets the per-stage fragment counts.
    #[inline]
    pub fn stage_fragments(mut self, stage_fragments: Vec<usize>) -> Self {
        self.stage_fragments = stage_fragments;
        self
    }

    /// Sets the number of threads used.
    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    /// Sets the total query duration.
    #[inline]
    pub fn query_duration(mut self, query_duration: std::time::Duration) -> Self {
        self.query_duration = query_duration;
        self
    }

    /// Builds the `QueryStatistics` instance.
    #[inline]
    pub fn build(self) -> QueryStatistics {
        QueryStatistics {
            input_ranges: self.input_ranges,
            output_fragments: self.output_fragments,
            stage_fragments: self.stage_fragments,
            used_threads: self.used_threads,
            query_duration: self.query_duration,
        }
    }
}
