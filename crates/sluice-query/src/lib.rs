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

//! # Sluice Query
//!
//! Minimum-output queries over a built `Pipeline`. Given a list of input
//! values, or a list of `(start, length)` ranges, the engine returns the
//! smallest value the pipeline can produce from them.
//!
//! ## Modules
//!
//! - `engine`: `QueryEngine` with point mode, range mode (optionally sharded
//!   across scoped threads) and a bounded enumeration reference.
//! - `config`: `QueryConfig` and its builder.
//! - `minimum`: `SharedMinimum`, the lock-free minimum shared between workers.
//! - `stats`: Per-query statistics and their builder.
//! - `result`: `QueryOutcome`, a minimum together with its statistics.
//! - `error`: `QueryError`.
//!
//! See `engine` for detailed APIs and examples.

pub mod config;
pub mod engine;
pub mod error;
pub mod minimum;
pub mod result;
pub mod stats;
