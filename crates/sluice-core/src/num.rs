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

//! # Pipeline Numeric Trait
//!
//! `MapNumeric` collects the integer capabilities required by stage maps,
//! range sets and queries into a single bound, so generic signatures across
//! the workspace stay short.
//!
//! - `PrimInt + Signed`: offsets are differences of two values and may be negative.
//! - `Into<i64> + TryFrom<i64>`: minima are reduced across threads through an `AtomicI64`.
//! - `FromStr`: almanac tokens are parsed straight into the target type.
//! - `Hash`: point results can be memoized.
//! - `Send + Sync`: pipelines are shared read-only between query threads.
//!
//! `i128` and `isize` are excluded because they do not convert into `i64`.

use num_traits::{PrimInt, Signed};
use std::{fmt::Debug, fmt::Display, hash::Hash, str::FromStr};

/// A trait alias for the signed integer types a pipeline can operate on:
/// `i8`, `i16`, `i32` and `i64`.
pub trait MapNumeric:
    PrimInt
    + Signed
    + Into<i64>
    + TryFrom<i64>
    + FromStr
    + Debug
    + Display
    + Hash
    + Send
    + Sync
    + 'static
{
}

impl<T> MapNumeric for T where
    T: PrimInt
        + Signed
        + Into<i64>
        + TryFrom<i64>
        + FromStr
        + Debug
        + Display
        + Hash
        + Send
        + Sync
        + 'static
{
}
