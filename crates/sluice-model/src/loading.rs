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

//! Almanac loader.
//!
//! Turns the line-oriented almanac text format into a list of seeds and a
//! validated `Pipeline`. The first content line carries the seeds, optionally
//! behind a `label:` prefix. Every following block is one stage: a header
//! line (the first non-blank character is a letter) followed by
//! `destination_start source_start length` rule lines, terminated by a blank
//! line or the end of input.
//!
//! ```raw
//! seeds: 79 14 55 13
//!
//! seed-to-soil map:
//! 50 98 2
//! 52 50 48
//!
//! soil-to-fertilizer map:
//! 0 15 37
//! ```
//!
//! Everything from a `#` to the end of a line is a comment. Comment-only
//! lines neither start nor end a block. Trailing whitespace and `\r\n` line
//! endings are accepted. Rule lines that appear without a header start an
//! unnamed stage.
//!
//! The loader accepts any `BufRead`, file path, raw reader or string slice.

use crate::{
    error::{EmptyInputError, PipelineError},
    pipeline::{Pipeline, PipelineBuilder, RawMappingBlock},
    range_set::RangeSet,
    shift::MappingRule,
};
use num_traits::PrimInt;
use std::{
    fmt::{Debug, Display},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the almanac loading process.
#[derive(Debug)]
pub enum LoaderError<T> {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The input contains no seed values.
    MissingSeeds,
    /// A rule line does not consist of exactly three numbers.
    MalformedRule { line: usize, found: usize },
    /// The stages could not be assembled into a pipeline.
    Pipeline(PipelineError<T>),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
    /// The 1-based line the token was found on.
    pub line: usize,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' on line {} as type {}",
            self.token, self.line, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl<T> Display for LoaderError<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::MissingSeeds => write!(f, "Almanac does not start with a list of seeds"),
            Self::MalformedRule { line, found } => write!(
                f,
                "Rule on line {} must have 3 values (destination, source, length), found {}",
                line, found
            ),
            Self::Pipeline(e) => write!(f, "Pipeline error: {}", e),
        }
    }
}

impl<T> std::error::Error for LoaderError<T>
where
    T: Debug + Display + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<std::io::Error> for LoaderError<T> {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl<T> From<ParseTokenError> for LoaderError<T> {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl<T> From<PipelineError<T>> for LoaderError<T> {
    fn from(e: PipelineError<T>) -> Self {
        Self::Pipeline(e)
    }
}

/// A loaded almanac: the seed values and the pipeline they run through.
#[derive(Debug, Clone)]
pub struct Almanac<T>
where
    T: PrimInt,
{
    seeds: Vec<T>,
    pipeline: Pipeline<T>,
}

impl<T> Almanac<T>
where
    T: PrimInt,
{
    /// Returns the seeds as individual values.
    #[inline]
    pub fn seed_points(&self) -> &[T] {
        &self.seeds
    }

    /// Reads the seeds as consecutive `(start, length)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an `EmptyInputError` if the number of seeds is odd or a pair
    /// does not describe a valid range.
    #[inline]
    pub fn seed_ranges(&self) -> Result<RangeSet<T>, EmptyInputError<T>> {
        RangeSet::from_flat(&self.seeds)
    }

    /// Returns the pipeline.
    #[inline]
    pub fn pipeline(&self) -> &Pipeline<T> {
        &self.pipeline
    }

    /// Splits the almanac into its seeds and its pipeline.
    #[inline]
    pub fn into_parts(self) -> (Vec<T>, Pipeline<T>) {
        (self.seeds, self.pipeline)
    }
}

/// A configurable loader for almanac text.
///
/// # Configuration
/// * `verify_category_chain`: If true, neighbouring stages whose headers
///   name their categories must agree on the category between them
///   (e.g. `seed-to-soil` followed by `soil-to-fertilizer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlmanacLoader {
    verify_category_chain: bool,
}

impl AlmanacLoader {
    /// Creates a new `AlmanacLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether to verify the category chain of named stages.
    #[inline]
    pub fn verify_category_chain(mut self, yes: bool) -> Self {
        self.verify_category_chain = yes;
        self
    }

    /// Loads an almanac from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<Almanac<T>, LoaderError<T>>
    where
        T: PrimInt + FromStr,
        R: BufRead,
    {
        let mut lines = LineReader::new(rdr);

        let seeds = loop {
            let Some(line) = lines.next_line()? else {
                return Err(LoaderError::MissingSeeds);
            };
            if line.text.is_empty() {
                continue;
            }
            let values = line
                .text
                .split_once(':')
                .map_or(line.text, |(_, rest)| rest);
            let seeds = parse_tokens::<T>(values, line.number)?;
            if seeds.is_empty() {
                return Err(LoaderError::MissingSeeds);
            }
            break seeds;
        };

        let mut builder = PipelineBuilder::new();
        builder.verify_category_chain(self.verify_category_chain);
        let mut current: Option<RawMappingBlock<T>> = None;

        while let Some(line) = lines.next_line()? {
            if line.text.is_empty() {
                if !line.comment_only
                    && let Some(block) = current.take()
                {
                    builder.add_block(block);
                }
                continue;
            }

            if line.text.starts_with(|c: char| c.is_alphabetic()) {
                if let Some(block) = current.take() {
                    builder.add_block(block);
                }
                current = Some(RawMappingBlock::named(line.text, Vec::new()));
                continue;
            }

            let values = parse_tokens::<T>(line.text, line.number)?;
            let [destination, source, length] = values[..] else {
                return Err(LoaderError::MalformedRule {
                    line: line.number,
                    found: values.len(),
                });
            };
            current
                .get_or_insert_with(|| RawMappingBlock::new(Vec::new()))
                .rules
                .push(MappingRule::new(destination, source, length));
        }

        if let Some(block) = current.take() {
            builder.add_block(block);
        }

        let pipeline = builder.build()?;
        Ok(Almanac { seeds, pipeline })
    }

    /// Loads an almanac from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<Almanac<T>, LoaderError<T>>
    where
        T: PrimInt + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an almanac from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<Almanac<T>, LoaderError<T>>
    where
        T: PrimInt + FromStr,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an almanac from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<Almanac<T>, LoaderError<T>>
    where
        T: PrimInt + FromStr,
    {
        self.from_reader(s.as_bytes())
    }
}

fn parse_tokens<T>(text: &str, line: usize) -> Result<Vec<T>, ParseTokenError>
where
    T: FromStr,
{
    text.split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| ParseTokenError {
                token: token.to_owned(),
                type_name: std::any::type_name::<T>(),
                line,
            })
        })
        .collect()
}

/// One input line with its comment removed and surrounding whitespace trimmed.
struct Line<'a> {
    number: usize,
    text: &'a str,
    /// The line held nothing but a comment.
    comment_only: bool,
}

/// Reads lines one at a time into a reused buffer.
struct LineReader<R> {
    rdr: R,
    buf: String,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            number: 0,
        }
    }

    /// Returns the next line, or `None` at the end of input.
    fn next_line(&mut self) -> std::io::Result<Option<Line<'_>>> {
        self.buf.clear();
        if self.rdr.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.number += 1;

        let (content, had_comment) = match self.buf.find('#') {
            Some(pos) => (&self.buf[..pos], true),
            None => (self.buf.as_str(), false),
        };
        let text = content.trim();

        Ok(Some(Line {
            number: self.number,
            text,
            comment_only: had_comment && text.is_empty(),
        }))
    }
}
