//! Syntax highlighting data structures
//!
//! Defines byte ranges, captures, line tokens, and the identifiers used to
//! key and stamp cached highlights.

use std::ops::Range;

use serde::Serialize;

use crate::theme::{Color, FontStyle};

/// Half-open range of document bytes: `[start, start + len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ByteRange {
    /// First byte (inclusive)
    pub start: usize,
    /// Number of bytes covered
    pub len: usize,
}

impl ByteRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Build a range from start and end offsets; an inverted pair yields an empty range
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    /// One past the last byte, capped at `usize::MAX`
    pub const fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

impl From<Range<usize>> for ByteRange {
    fn from(range: Range<usize>) -> Self {
        Self::from_bounds(range.start, range.end)
    }
}

/// Stable identity of one line, assigned by the document owner.
///
/// Survives edits that do not delete the line, so it is used as the cache key
/// instead of a line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(u64);

impl LineId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Counter stamped on every cached line; bumped whenever the query changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QueryGeneration(u64);

impl QueryGeneration {
    pub const fn get(&self) -> u64 {
        self.0
    }

    pub(crate) fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// A query match: highlight tag plus the document bytes it covers.
///
/// The range is in document coordinates and may extend past the line it was
/// requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Capture name without the `@`, e.g. "keyword" or "string.special"
    pub tag: String,
    pub range: ByteRange,
}

impl Capture {
    pub fn new(tag: impl Into<String>, range: ByteRange) -> Self {
        Self {
            tag: tag.into(),
            range,
        }
    }
}

/// A single styled span within a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightToken {
    /// Line-local byte range, always within `[0, line_len)`
    pub range: ByteRange,
    /// Foreground color, if the theme assigns one
    pub color: Option<Color>,
    pub font: FontStyle,
}

/// Find the token covering a line-local byte offset.
///
/// Tokens overlap when several patterns capture the same node; the last one
/// wins, matching the order in which a renderer paints them.
pub fn token_at(tokens: &[HighlightToken], offset: usize) -> Option<&HighlightToken> {
    tokens.iter().rev().find(|token| token.range.contains(offset))
}
