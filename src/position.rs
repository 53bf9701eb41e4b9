//! Source locations for diagnostics.
//!
//! A [`Position`] is built incrementally: each step re-scans only the slice that
//! was just consumed, so advancing a stream costs time proportional to the
//! number of tokens consumed and never to the size of the source.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stream::StreamToken;

// ============================================================================
// POSITION
// ============================================================================

/// A location in a token stream: an index plus the line bookkeeping needed to
/// derive a column.
///
/// # Examples
///
/// ```rust
/// use plait::position::Position;
/// let pos = Position::start().advanced_over_text("ab\ncd");
/// assert_eq!(pos.index, 5);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based index of the next token.
    pub index: usize,
    /// One-based line number.
    pub line: usize,
    /// Index of the first token after the last line break. For tokens that
    /// span a line break, the line's text begins inside the token before it.
    pub line_start: usize,
}

impl Position {
    /// The position before the first token.
    pub const fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// One-based column, derived from the index and the start of the line.
    pub const fn column(&self) -> usize {
        self.index - self.line_start + 1
    }

    /// Returns the position reached after consuming `consumed`, which must be
    /// the slice of tokens starting at `self.index`.
    pub fn advanced<T: StreamToken>(&self, consumed: &[T]) -> Self {
        self.advanced_by(consumed.iter().map(StreamToken::line_breaks))
    }

    /// Character-level variant of [`Position::advanced`] used by the lexer,
    /// where every `char` counts as one index and `'\n'` ends a line.
    pub fn advanced_over_text(&self, consumed: &str) -> Self {
        self.advanced_by(consumed.chars().map(|c| usize::from(c == '\n')))
    }

    fn advanced_by(&self, line_breaks: impl Iterator<Item = usize>) -> Self {
        let mut next = *self;
        for breaks in line_breaks {
            next.index += 1;
            if breaks > 0 {
                next.line += breaks;
                next.line_start = next.index;
            }
        }
        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Col {}", self.line, self.column())
    }
}

// ============================================================================
// POSITION RANGE
// ============================================================================

/// A half-open range of positions; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PositionRange {
    pub start: Position,
    pub end: Position,
}

impl PositionRange {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `at`.
    pub const fn empty_at(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub const fn is_empty(&self) -> bool {
        self.end.index <= self.start.index
    }

    /// Number of tokens covered by the range.
    pub const fn len(&self) -> usize {
        self.end.index.saturating_sub(self.start.index)
    }

    /// Concatenates two ranges: the start of `self` and the end of `other`.
    pub const fn merge(&self, other: &PositionRange) -> PositionRange {
        PositionRange {
            start: self.start,
            end: other.end,
        }
    }
}

impl fmt::Display for PositionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line,
            self.start.column(),
            self.end.line,
            self.end.column()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_over_chars_tracks_lines() {
        let tokens: Vec<char> = "ab\nc\n\nd".chars().collect();
        let pos = Position::start().advanced(&tokens[..4]);
        assert_eq!(pos, Position { index: 4, line: 2, line_start: 3 });
        assert_eq!(pos.column(), 2);

        let pos = pos.advanced(&tokens[4..]);
        assert_eq!(pos.line, 4);
        assert_eq!(pos.column(), 2);
    }

    #[test]
    fn stepping_in_pieces_matches_stepping_at_once() {
        let text = "first\nsecond line\nthird";
        let whole = Position::start().advanced_over_text(text);
        let (a, b) = text.split_at(9);
        let pieces = Position::start().advanced_over_text(a).advanced_over_text(b);
        assert_eq!(whole, pieces);
    }

    #[test]
    fn range_emptiness_and_merge() {
        let a = Position::start();
        let b = a.advanced_over_text("xy");
        let c = b.advanced_over_text("\nz");
        assert!(PositionRange::empty_at(b).is_empty());
        assert!(PositionRange::new(b, a).is_empty());

        let merged = PositionRange::new(a, b).merge(&PositionRange::new(b, c));
        assert_eq!(merged, PositionRange::new(a, c));
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.to_string(), "1:1-2:2");
    }
}
