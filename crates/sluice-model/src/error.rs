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

//! Error types shared by stage construction, pipeline construction and
//! range-set construction.
//!
//! Every error here describes malformed input data. None of them is
//! transient, so callers propagate them instead of retrying.

use crate::{index::StageIndex, shift::MappingRule};
use std::fmt::{Debug, Display};

/// A stage's mapping rules cannot form a valid stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedMappingError<T> {
    /// A rule covers no source values (`length <= 0`).
    NonPositiveLength { rule: MappingRule<T> },
    /// The rule's source end, destination end or offset does not fit the integer type.
    Overflow { rule: MappingRule<T> },
    /// Two rules of the same stage claim overlapping source values.
    Overlap {
        first: MappingRule<T>,
        second: MappingRule<T>,
    },
}

impl<T> Display for MalformedMappingError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveLength { rule } => {
                write!(f, "Mapping rule {} has a non-positive length", rule)
            }
            Self::Overflow { rule } => {
                write!(f, "Mapping rule {} overflows the integer range", rule)
            }
            Self::Overlap { first, second } => {
                write!(
                    f,
                    "Mapping rules {} and {} have overlapping source ranges",
                    first, second
                )
            }
        }
    }
}

impl<T> std::error::Error for MalformedMappingError<T> where T: Debug + Display {}

/// A query input that cannot be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyInputError<T> {
    /// A point query received no values.
    NoValues,
    /// A range query received no ranges.
    NoRanges,
    /// The `(start, length)` pair at `index` has `length <= 0`.
    NonPositiveLength { index: usize, start: T, length: T },
    /// The `(start, length)` pair at `index` ends beyond the integer range.
    Overflow { index: usize, start: T, length: T },
    /// A flat list of range bounds has an odd number of entries.
    UnpairedBound { count: usize },
}

impl<T> Display for EmptyInputError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoValues => write!(f, "Point query requires at least one value"),
            Self::NoRanges => write!(f, "Range query requires at least one range"),
            Self::NonPositiveLength {
                index,
                start,
                length,
            } => write!(
                f,
                "Range {} (start {}, length {}) must have a positive length",
                index, start, length
            ),
            Self::Overflow {
                index,
                start,
                length,
            } => write!(
                f,
                "Range {} (start {}, length {}) exceeds the integer range",
                index, start, length
            ),
            Self::UnpairedBound { count } => write!(
                f,
                "Range bounds must come in (start, length) pairs, got {} values",
                count
            ),
        }
    }
}

impl<T> std::error::Error for EmptyInputError<T> where T: Debug + Display {}

/// A pipeline cannot be assembled from its stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError<T> {
    /// A pipeline needs at least one stage.
    Empty,
    /// The rules of one stage are malformed.
    Mapping {
        stage: StageIndex,
        source: MalformedMappingError<T>,
    },
    /// A stage does not consume the category its predecessor produces.
    BrokenChain {
        stage: StageIndex,
        expected: String,
        found: String,
    },
}

impl<T> Display for PipelineError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "A pipeline requires at least one stage"),
            Self::Mapping { stage, source } => write!(f, "{}: {}", stage, source),
            Self::BrokenChain {
                stage,
                expected,
                found,
            } => write!(
                f,
                "{} maps from '{}' but the previous stage produces '{}'",
                stage, found, expected
            ),
        }
    }
}

impl<T> std::error::Error for PipelineError<T>
where
    T: Debug + Display + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mapping { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_display_messages() {
        let rule = MappingRule::<IntegerType>::new(50, 98, 0);
        let err = MalformedMappingError::NonPositiveLength { rule };
        assert_eq!(
            err.to_string(),
            "Mapping rule (dest 50, src 98, len 0) has a non-positive length"
        );

        let err = EmptyInputError::<IntegerType>::NonPositiveLength {
            index: 1,
            start: 5,
            length: 0,
        };
        assert_eq!(
            err.to_string(),
            "Range 1 (start 5, length 0) must have a positive length"
        );

        let err = PipelineError::<IntegerType>::BrokenChain {
            stage: StageIndex::new(2),
            expected: "water".to_string(),
            found: "light".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "StageIndex(2) maps from 'light' but the previous stage produces 'water'"
        );
    }

    #[test]
    fn test_pipeline_error_exposes_source() {
        use std::error::Error;

        let rule = MappingRule::<IntegerType>::new(0, 0, 0);
        let err = PipelineError::Mapping {
            stage: StageIndex::new(0),
            source: MalformedMappingError::NonPositiveLength { rule },
        };
        assert!(err.source().is_some());
        assert!(PipelineError::<IntegerType>::Empty.source().is_none());
        assert_eq!(
            PipelineError::<IntegerType>::Empty.to_string(),
            "A pipeline requires at least one stage"
        );
    }
}
