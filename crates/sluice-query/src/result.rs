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

use crate::stats::QueryStatistics;

/// The answer to a range query together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome<T> {
    minimum: T,
    statistics: QueryStatistics,
}

impl<T> QueryOutcome<T>
where
    T: Copy,
{
    /// Creates a new outcome.
    #[inline]
    pub fn new(minimum: T, statistics: QueryStatistics) -> Self {
        Self {
            minimum,
            statistics,
        }
    }

    /// Returns the smallest output value.
    #[inline]
    pub fn minimum(&self) -> T {
        self.minimum
    }

    /// Returns the statistics collected during the query.
    #[inline]
    pub fn statistics(&self) -> &QueryStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns the minimum and the statistics.
    #[inline]
    pub fn into_parts(self) -> (T, QueryStatistics) {
        (self.minimum, self.statistics)
    }
}

impl<T> std::fmt::Display for QueryOutcome<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Minimum: {}", self.minimum)?;
        write!(f, "{}", self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::QueryStatisticsBuilder;

    #[test]
    fn test_accessors_and_display() {
        let stats = QueryStatisticsBuilder::new().input_ranges(2).build();
        let outcome = QueryOutcome::new(46i64, stats.clone());
        assert_eq!(outcome.minimum(), 46);
        assert_eq!(outcome.statistics(), &stats);

        let rendered = format!("{}", outcome);
        assert!(rendered.starts_with("Minimum: 46\n"));
        assert!(rendered.contains("Input Ranges: 2"));

        let (minimum, statistics) = outcome.into_parts();
        assert_eq!(minimum, 46);
        assert_eq!(statistics, stats);
    }
}
