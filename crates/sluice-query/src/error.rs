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

use sluice_model::{error::EmptyInputError, index::StageIndex};
use std::fmt::{Debug, Display};

/// The error type for minimum queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError<T> {
    /// The query input was empty or contained an invalid range.
    EmptyInput(EmptyInputError<T>),
    /// A worker held more fragments after `stage` than the configured limit.
    FragmentLimitExceeded {
        stage: StageIndex,
        fragments: usize,
        limit: usize,
    },
    /// Enumerating the input would visit more values than the configured limit.
    EnumerationLimitExceeded { values: i128, limit: u64 },
}

impl<T> Display for QueryError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput(e) => write!(f, "Invalid query input: {}", e),
            Self::FragmentLimitExceeded {
                stage,
                fragments,
                limit,
            } => write!(
                f,
                "{} produced {} fragments, exceeding the limit of {}",
                stage, fragments, limit
            ),
            Self::EnumerationLimitExceeded { values, limit } => write!(
                f,
                "Enumerating {} values exceeds the limit of {}",
                values, limit
            ),
        }
    }
}

impl<T> std::error::Error for QueryError<T>
where
    T: Debug + Display + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyInput(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<EmptyInputError<T>> for QueryError<T> {
    fn from(e: EmptyInputError<T>) -> Self {
        Self::EmptyInput(e)
    }
}
