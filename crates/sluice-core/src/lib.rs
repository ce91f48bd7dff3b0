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

//! # Sluice Core
//!
//! Foundational primitives for the Sluice interval-remapping pipeline. The
//! higher-level crates (`sluice_model`, `sluice_query`) build stage maps, range
//! sets and queries on top of the types defined here.
//!
//! ## Modules
//!
//! - `math`: The closed-open interval `[start, end)` with checked
//!   construction from `(start, length)` pairs, intersection, three-way
//!   partitioning against another interval and point iteration.
//! - `algorithm`: Binary searches over slices of sorted, disjoint intervals
//!   (containing-interval lookup and first-overlap lookup).
//! - `num`: The `MapNumeric` bound collecting every integer capability the
//!   pipeline needs.
//! - `utils`: Phantom-tagged indices (`TypedIndex<T>`) used to address stages.
//!
//! ## Purpose
//!
//! Range propagation over huge integer domains is only tractable when every
//! split is exact. Keeping the interval arithmetic here, checked and tested in
//! isolation, lets the model crate focus on the mapping semantics.

pub mod algorithm;
pub mod math;
pub mod num;
pub mod utils;
