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

//! # Shared Minimum
//!
//! A lock-free holder for the smallest value reported by any worker of a
//! sharded range query. Workers call `offer` with their local minimum; the
//! caller reads the result with `get` once every worker has been joined.
//!
//! The value is stored as an `i64` so a single `AtomicI64::fetch_min` both
//! compares and installs it. `i64::MAX` is the "nothing offered yet"
//! sentinel. Range starts are always strictly below the integer maximum
//! (the exclusive end has to fit), so the sentinel never collides with a
//! real minimum.

use num_traits::PrimInt;
use std::{
    marker::PhantomData,
    sync::atomic::{AtomicI64, Ordering},
};

/// The smallest value offered so far, shared between threads.
#[derive(Debug)]
pub struct SharedMinimum<T> {
    value: AtomicI64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for SharedMinimum<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedMinimum<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.raw() {
            i64::MAX => write!(f, "SharedMinimum(none)"),
            v => write!(f, "SharedMinimum({})", v),
        }
    }
}

impl<T> SharedMinimum<T> {
    /// Creates a holder with nothing offered.
    #[inline]
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(i64::MAX),
            _marker: PhantomData,
        }
    }

    /// Returns the raw `i64` value, `i64::MAX` if nothing was offered.
    #[inline]
    pub fn raw(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl<T> SharedMinimum<T>
where
    T: PrimInt + Into<i64> + TryFrom<i64>,
{
    /// Offers a candidate. Returns `true` if it is strictly smaller than
    /// every value offered before.
    ///
    /// Only the final value matters and it is read after the workers are
    /// joined, so relaxed ordering is sufficient.
    #[inline]
    pub fn offer(&self, candidate: T) -> bool {
        let candidate: i64 = candidate.into();
        self.value.fetch_min(candidate, Ordering::Relaxed) > candidate
    }

    /// Returns the smallest value offered, or `None` if nothing was offered.
    #[inline]
    pub fn get(&self) -> Option<T> {
        match self.raw() {
            i64::MAX => None,
            v => T::try_from(v).ok(),
        }
    }
}
