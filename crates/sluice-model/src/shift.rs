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

//! Mapping rules and the translated intervals they describe.
//!
//! A `MappingRule` is one `destination_start source_start length` line of a
//! stage block. Validating a rule yields a `ShiftInterval`: the source span
//! `[source_start, source_start + length)` together with the constant offset
//! `destination_start - source_start` applied to every value inside it.

use crate::error::MalformedMappingError;
use num_traits::PrimInt;
use sluice_core::{algorithm::AsInterval, math::interval::ClosedOpenInterval};

/// One raw mapping line, in the order it appears in the almanac text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingRule<T> {
    pub destination_start: T,
    pub source_start: T,
    pub length: T,
}

impl<T> MappingRule<T> {
    /// Creates a rule from `destination_start source_start length`.
    #[inline]
    pub const fn new(destination_start: T, source_start: T, length: T) -> Self {
        Self {
            destination_start,
            source_start,
            length,
        }
    }
}

impl<T> std::fmt::Display for MappingRule<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(dest {}, src {}, len {})",
            self.destination_start, self.source_start, self.length
        )
    }
}

/// The result of cutting a range against a `ShiftInterval`.
///
/// `source` is the shared part in source coordinates and `mapped` the same
/// part after translation. `before` and `after` are the parts of the range
/// strictly left and right of the interval, still unmapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap<T>
where
    T: PrimInt,
{
    pub source: ClosedOpenInterval<T>,
    pub mapped: ClosedOpenInterval<T>,
    pub before: Option<ClosedOpenInterval<T>>,
    pub after: Option<ClosedOpenInterval<T>>,
}

/// A non-empty source interval whose values are all shifted by one offset.
///
/// Construction guarantees that both the source end and the destination end
/// are representable in `T`, so `map_point` and `map_span` cannot overflow
/// for values inside the interval.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShiftInterval<T>
where
    T: PrimInt,
{
    source: ClosedOpenInterval<T>,
    offset: T,
}

impl<T> ShiftInterval<T>
where
    T: PrimInt,
{
    /// Validates `rule` and converts it into a shift interval.
    ///
    /// # Errors
    ///
    /// - `NonPositiveLength` if `rule.length <= 0`.
    /// - `Overflow` if the source end, the destination end or the offset
    ///   does not fit into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_model::shift::{MappingRule, ShiftInterval};
    ///
    /// let iv = ShiftInterval::try_from_rule(MappingRule::new(52, 50, 48)).unwrap();
    /// assert_eq!(iv.offset(), 2);
    /// assert_eq!(iv.map_point(79), 81);
    /// ```
    pub fn try_from_rule(rule: MappingRule<T>) -> Result<Self, MalformedMappingError<T>> {
        if rule.length <= T::zero() {
            return Err(MalformedMappingError::NonPositiveLength { rule });
        }

        let overflow = || MalformedMappingError::Overflow { rule };
        let source =
            ClosedOpenInterval::from_start_len(rule.source_start, rule.length).ok_or_else(overflow)?;
        rule.destination_start
            .checked_add(&rule.length)
            .ok_or_else(overflow)?;
        let offset = rule
            .destination_start
            .checked_sub(&rule.source_start)
            .ok_or_else(overflow)?;

        Ok(Self { source, offset })
    }

    /// Returns the inclusive start of the source span.
    #[inline]
    pub fn start(&self) -> T {
        self.source.start()
    }

    /// Returns the exclusive end of the source span.
    #[inline]
    pub fn end(&self) -> T {
        self.source.end()
    }

    /// Returns the number of values covered.
    #[inline]
    pub fn len(&self) -> T {
        self.source.len()
    }

    /// Always `false`: construction rejects empty spans.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the constant added to every covered value.
    #[inline]
    pub fn offset(&self) -> T {
        self.offset
    }

    /// Returns the source span.
    #[inline]
    pub fn source(&self) -> ClosedOpenInterval<T> {
        self.source
    }

    /// Returns the span the source is mapped onto.
    #[inline]
    pub fn destination(&self) -> ClosedOpenInterval<T> {
        ClosedOpenInterval::new_unchecked(self.start() + self.offset, self.end() + self.offset)
    }

    /// Returns the rule this interval was built from.
    #[inline]
    pub fn rule(&self) -> MappingRule<T> {
        MappingRule::new(self.start() + self.offset, self.start(), self.len())
    }

    /// Returns `true` if `value` lies in the source span.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.source.contains_point(value)
    }

    /// Maps a value inside the source span.
    ///
    /// The caller must ensure `self.contains(value)`; stage dispatch only
    /// calls this after a successful containment lookup.
    #[inline]
    pub fn map_point(&self, value: T) -> T {
        debug_assert!(
            self.contains(value),
            "called `ShiftInterval::map_point` with a value outside the source span"
        );
        value + self.offset
    }

    /// Maps a span that lies inside the source span.
    #[inline]
    pub fn map_span(&self, span: ClosedOpenInterval<T>) -> ClosedOpenInterval<T> {
        debug_assert!(
            self.source.contains_interval(span),
            "called `ShiftInterval::map_span` with a span not contained in the source span"
        );
        ClosedOpenInterval::new_unchecked(span.start() + self.offset, span.end() + self.offset)
    }

    /// Cuts `range` against the source span.
    ///
    /// Returns `None` if `range` shares no value with the source span.
    /// Otherwise returns the shared part (unmapped and mapped) plus the
    /// non-empty leftovers before and after the span.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sluice_core::math::interval::ClosedOpenInterval;
    /// # use sluice_model::shift::{MappingRule, ShiftInterval};
    ///
    /// // [10, 20) -> +5
    /// let iv = ShiftInterval::try_from_rule(MappingRule::new(15, 10, 10)).unwrap();
    /// let cut = iv.overlap(ClosedOpenInterval::new(5, 15)).unwrap();
    /// assert_eq!(cut.before, Some(ClosedOpenInterval::new(5, 10)));
    /// assert_eq!(cut.mapped, ClosedOpenInterval::new(15, 20));
    /// assert_eq!(cut.after, None);
    /// ```
    #[inline]
    pub fn overlap(&self, range: ClosedOpenInterval<T>) -> Option<Overlap<T>> {
        let parts = range.partition(self.source);
        let source = parts.inside?;
        Some(Overlap {
            source,
            mapped: self.map_span(source),
            before: parts.before,
            after: parts.after,
        })
    }
}

impl<T> AsInterval<T> for ShiftInterval<T>
where
    T: PrimInt,
{
    #[inline(always)]
    fn as_interval(&self) -> ClosedOpenInterval<T> {
        self.source
    }
}

impl<T> std::fmt::Debug for ShiftInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShiftInterval")
            .field("source", &self.source)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T> std::fmt::Display for ShiftInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.offset < T::zero() {
            write!(f, "{} -> {}", self.source, self.offset)
        } else {
            write!(f, "{} -> +{}", self.source, self.offset)
        }
    }
}
