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

//! Query configuration.
//!
//! `QueryConfig` is immutable once built; use `QueryConfigBuilder` (or
//! `QueryConfig::builder`) to change the defaults.

/// Settings that control how a `QueryEngine` evaluates queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    threads: usize,
    coalesce_between_stages: bool,
    fragment_limit: Option<usize>,
    enumeration_limit: u64,
    memoize_points: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfigBuilder::new().build()
    }
}

impl QueryConfig {
    /// Returns a builder initialized with the defaults.
    #[inline]
    pub fn builder() -> QueryConfigBuilder {
        QueryConfigBuilder::new()
    }

    /// Returns the maximum number of worker threads for range queries.
    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Returns `true` if fragments are merged after every stage.
    #[inline]
    pub fn coalesce_between_stages(&self) -> bool {
        self.coalesce_between_stages
    }

    /// Returns the maximum number of fragments a worker may hold after a stage.
    #[inline]
    pub fn fragment_limit(&self) -> Option<usize> {
        self.fragment_limit
    }

    /// Returns the maximum number of values enumeration may visit.
    #[inline]
    pub fn enumeration_limit(&self) -> u64 {
        self.enumeration_limit
    }

    /// Returns `true` if enumeration caches point results.
    #[inline]
    pub fn memoize_points(&self) -> bool {
        self.memoize_points
    }
}

impl std::fmt::Display for QueryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Query Config:")?;
        writeln!(f, "  Threads: {}", self.threads)?;
        writeln!(f, "  Coalesce Between Stages: {}", self.coalesce_between_stages)?;
        match self.fragment_limit {
            Some(limit) => writeln!(f, "  Fragment Limit: {}", limit)?,
            None => writeln!(f, "  Fragment Limit: none")?,
        }
        writeln!(f, "  Enumeration Limit: {}", self.enumeration_limit)?;
        writeln!(f, "  Memoize Points: {}", self.memoize_points)
    }
}

/// Builder for `QueryConfig`.
///
/// # Defaults
///
/// | Field | Default |
/// | :--- | :--- |
/// | `threads` | `1` |
/// | `coalesce_between_stages` | `true` |
/// | `fragment_limit` | none |
/// | `enumeration_limit` | `10_000_000` |
/// | `memoize_points` | `false` |
///
/// # Examples
///
/// ```rust
/// # use sluice_query::config::QueryConfigBuilder;
/// let config = QueryConfigBuilder::new().threads(4).fragment_limit(1_000).build();
/// assert_eq!(config.threads(), 4);
/// assert_eq!(config.fragment_limit(), Some(1_000));
/// assert!(config.coalesce_between_stages());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfigBuilder {
    threads: usize,
    coalesce_between_stages: bool,
    fragment_limit: Option<usize>,
    enumeration_limit: u64,
    memoize_points: bool,
}

impl Default for QueryConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryConfigBuilder {
    /// Creates a new `QueryConfigBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            threads: 1,
            coalesce_between_stages: true,
            fragment_limit: None,
            enumeration_limit: 10_000_000,
            memoize_points: false,
        }
    }

    /// Sets the maximum number of worker threads. Zero is treated as one.
    #[inline]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Sets whether fragments are merged after every stage.
    #[inline]
    pub fn coalesce_between_stages(mut self, yes: bool) -> Self {
        self.coalesce_between_stages = yes;
        self
    }

    /// Sets the maximum number of fragments a worker may hold after a stage.
    #[inline]
    pub fn fragment_limit(mut self, limit: usize) -> Self {
        self.fragment_limit = Some(limit);
        self
    }

    /// Sets the maximum number of values enumeration may visit.
    #[inline]
    pub fn enumeration_limit(mut self, limit: u64) -> Self {
        self.enumeration_limit = limit;
        self
    }

    /// Sets whether enumeration caches point results.
    #[inline]
    pub fn memoize_points(mut self, yes: bool) -> Self {
        self.memoize_points = yes;
        self
    }

    /// Builds the `QueryConfig` instance.
    #[inline]
    pub fn build(self) -> QueryConfig {
        QueryConfig {
            threads: self.threads,
            coalesce_between_stages: self.coalesce_between_stages,
            fragment_limit: self.fragment_limit,
            enumeration_limit: self.enumeration_limit,
            memoize_points: self.memoize_points,
        }
    }
}
