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

//! # Sluice Model
//!
//! The data model of a chained interval-remapping pipeline. A pipeline is a
//! sequence of stages; each stage translates a few disjoint integer intervals
//! by a constant offset and lets every other value through unchanged.
//!
//! ## Modules
//!
//! - `shift`: Raw mapping rules and the validated `ShiftInterval` they become.
//! - `stage`: `StageMap`, one validated stage with point lookup and
//!   range splitting.
//! - `range_set`: `RangeSet`, the collection of half-open ranges that flows
//!   between stages in range mode.
//! - `pipeline`: `Pipeline`, `PipelineBuilder` and `build_pipeline`.
//! - `loading`: `AlmanacLoader`, which reads seeds and stage blocks from text.
//! - `error`: Build-time and input errors.
//! - `index`: The typed `StageIndex`.
//!
//! ## Guarantees
//!
//! Every stage is validated when the pipeline is built: rules have positive
//! lengths, do not overlap, and cannot overflow when applied. A built pipeline
//! is immutable, so range mapping never fails and never loses coverage.

pub mod error;
pub mod index;
pub mod loading;
pub mod pipeline;
pub mod range_set;
pub mod shift;
pub mod stage;
