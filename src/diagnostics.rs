//! Rendering of parse failures for people.
//!
//! The rendering is a stable, line-oriented format that tests compare
//! verbatim:
//!
//! ```text
//! Error at Line 1, Col 2:
//! ac
//! a^
//! Expected '['
//! ```
//!
//! The third line reproduces the source text up to the failing column, so the
//! marker stays aligned even when the line contains tabs or multi-character
//! tokens. For the same reason the column counts characters of source text,
//! not stream tokens. [`ParseFailure`] carries the same information as a
//! [`miette::Diagnostic`] for callers that prefer miette's reports.

use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceSpan};
use thiserror::Error;

use crate::errors::{LocatedParserError, ParserError};
use crate::position::Position;
use crate::result::ParseResult;
use crate::stream::{InputStream, StreamToken};

const BACKTRACK_HEADER: &str = "The parser backtracked after the following error:";

// ============================================================================
// RENDERING
// ============================================================================

/// Renders one located error against the stream it was produced on.
pub fn render_error<T, U>(stream: &InputStream<T, U>, error: &LocatedParserError) -> String
where
    T: StreamToken,
    U: Clone,
{
    let position = stream.position_at(error.start);
    let line = stream.line_text(position);
    let lead = stream.line_lead(position);
    let column = lead.chars().count() + 1;
    format!(
        "Error at Line {}, Col {}:\n{}\n{}^\n{}",
        position.line,
        column,
        line,
        lead,
        error.error.show()
    )
}

/// [`render_error`] followed by every error the stream discarded while
/// backtracking, oldest first.
pub fn full_report<T, U>(stream: &InputStream<T, U>, error: &LocatedParserError) -> String
where
    T: StreamToken,
    U: Clone,
{
    let mut report = render_error(stream, error);
    for discarded in stream.backtracked() {
        report.push_str("\n\n");
        report.push_str(BACKTRACK_HEADER);
        report.push('\n');
        report.push_str(&render_error(stream, discarded));
    }
    report
}

// ============================================================================
// PARSE FAILURE
// ============================================================================

/// A failed top-level parse, rendered while the stream was still available.
#[derive(Debug, Clone, Error)]
#[error("{rendered}")]
pub struct ParseFailure {
    error: LocatedParserError,
    position: Position,
    rendered: String,
    report: String,
    source_text: String,
    span: SourceSpan,
}

impl ParseFailure {
    /// Builds a failure for `error`, which must have been produced on `stream`.
    pub fn new<T, U>(stream: &InputStream<T, U>, error: LocatedParserError) -> Self
    where
        T: StreamToken,
        U: Clone,
    {
        let (source_text, offsets) = source_with_offsets(stream);
        let byte_at = |index: usize| offsets[index.min(offsets.len() - 1)];
        let start = byte_at(error.start);
        let end = byte_at(error.end).max(start);
        Self {
            position: stream.position_at(error.start),
            rendered: render_error(stream, &error),
            report: full_report(stream, &error),
            source_text,
            span: SourceSpan::from(start..end),
            error,
        }
    }

    /// Converts the outcome of a top-level parse into a value or a failure.
    pub fn check<R, T, U>(outcome: ParseResult<R>, stream: &InputStream<T, U>) -> Result<R, Self>
    where
        T: StreamToken,
        U: Clone,
    {
        match outcome.result {
            Some(value) => Ok(value),
            None => {
                let error = outcome.error.unwrap_or_else(|| {
                    LocatedParserError::at(
                        outcome.start.index,
                        ParserError::failure("parser failed without reporting an error"),
                    )
                });
                Err(Self::new(stream, error))
            }
        }
    }

    pub fn error(&self) -> &LocatedParserError {
        &self.error
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The flattened error message without the location header.
    pub fn message(&self) -> String {
        self.error.error.show()
    }

    /// The rendering plus every backtracked branch.
    pub fn report(&self) -> &str {
        &self.report
    }
}

impl Diagnostic for ParseFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("plait::parse"))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.message().lines().next().map(str::to_string);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            label, self.span,
        ))))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_text)
    }
}

/// The stream's source text plus the byte offset of every token index,
/// including one past the last token.
fn source_with_offsets<T: StreamToken, U: Clone>(stream: &InputStream<T, U>) -> (String, Vec<usize>) {
    let mut text = String::new();
    let mut offsets = Vec::with_capacity(stream.len() + 1);
    for token in stream.tokens() {
        offsets.push(text.len());
        token.write_text(&mut text);
    }
    offsets.push(text.len());
    (text, offsets)
}
