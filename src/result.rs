//! The outcome of applying one parser.

use crate::errors::{LocatedParserError, ParserError};
use crate::position::{Position, PositionRange};

/// Three-way classification of a [`ParseResult`].
///
/// Fatality depends only on consumption: a failure that advanced the stream
/// cannot be backtracked past, however deep inside the grammar it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// A value was produced.
    Ok,
    /// Failed without consuming input; an alternative may be tried.
    Error,
    /// Failed after consuming input; only `attempt` can recover.
    Fatal,
}

/// Optional value, optional diagnostic, and the range the parser covered.
///
/// A successful result can still carry a latent error: an `opt` that failed
/// without consuming remembers what it would have accepted, so a later
/// failure at the same spot can report both expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<R> {
    pub result: Option<R>,
    pub error: Option<LocatedParserError>,
    pub start: Position,
    pub end: Position,
}

impl<R> ParseResult<R> {
    pub fn success(value: R, start: Position, end: Position) -> Self {
        Self {
            result: Some(value),
            error: None,
            start,
            end,
        }
    }

    pub fn failure(error: LocatedParserError, start: Position, end: Position) -> Self {
        Self {
            result: None,
            error: Some(error),
            start,
            end,
        }
    }

    pub fn status(&self) -> Status {
        if self.result.is_some() {
            Status::Ok
        } else if self.end.index > self.start.index {
            Status::Fatal
        } else {
            Status::Error
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }

    /// Whether the parser advanced the stream, independent of success.
    pub fn consumed(&self) -> bool {
        self.end.index > self.start.index
    }

    pub fn range(&self) -> PositionRange {
        PositionRange::new(self.start, self.end)
    }

    pub fn with_error(mut self, error: Option<LocatedParserError>) -> Self {
        self.error = error;
        self
    }

    pub fn map<S>(self, f: impl FnOnce(R) -> S) -> ParseResult<S> {
        ParseResult {
            result: self.result.map(f),
            error: self.error,
            start: self.start,
            end: self.end,
        }
    }

    /// Reinterprets a failed result at another value type.
    ///
    /// # Panics
    ///
    /// Panics when called on a success; combinators only use it on failures.
    pub fn cast<S>(self) -> ParseResult<S> {
        assert!(self.result.is_none(), "ParseResult::cast on a successful result");
        ParseResult {
            result: None,
            error: self.error,
            start: self.start,
            end: self.end,
        }
    }

    /// The error of a sequence whose earlier part produced `earlier`.
    ///
    /// If this (later) step consumed input its own error is kept and the
    /// earlier diagnostic dropped; otherwise both are kept as alternatives.
    pub fn merged_error(&self, earlier: Option<LocatedParserError>) -> Option<LocatedParserError> {
        if self.consumed() {
            return self.error.clone();
        }
        LocatedParserError::merge_opt(earlier, self.error.clone())
    }

    /// Borrowing accessor used by tests and top-level callers.
    pub fn value(&self) -> Option<&R> {
        self.result.as_ref()
    }

    /// The flattened error, if any.
    pub fn flat_error(&self) -> Option<ParserError> {
        self.error.as_ref().map(|e| e.error.clone().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(index: usize) -> Position {
        Position {
            index,
            line: 1,
            line_start: 0,
        }
    }

    #[test]
    fn status_follows_consumption() {
        let err = || LocatedParserError::at(0, ParserError::failure("x"));
        assert_eq!(ParseResult::success(1, pos(0), pos(0)).status(), Status::Ok);
        assert_eq!(ParseResult::<i32>::failure(err(), pos(2), pos(2)).status(), Status::Error);
        assert_eq!(ParseResult::<i32>::failure(err(), pos(2), pos(3)).status(), Status::Fatal);
    }

    #[test]
    fn merged_error_drops_earlier_when_consumed() {
        let earlier = Some(LocatedParserError::at(1, ParserError::expected("','")));
        let later_err = LocatedParserError::at(1, ParserError::expected("')'"));

        let non_consuming = ParseResult::<()>::failure(later_err.clone(), pos(1), pos(1));
        let merged = non_consuming.merged_error(earlier.clone()).unwrap();
        assert_eq!(
            merged.error.flatten(),
            ParserError::OneOf(vec![ParserError::expected("','"), ParserError::expected("')'")])
        );

        let consuming = ParseResult::<()>::failure(later_err.clone(), pos(1), pos(2));
        assert_eq!(consuming.merged_error(earlier), Some(later_err));
    }
}
