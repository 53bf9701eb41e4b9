//! Precedence climbing over an [`OperatorTable`].

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::Parser;
use crate::position::Position;
use crate::result::{ParseResult, Status};
use crate::stream::{InputStream, StreamToken};

use super::{Associativity, InfixOperator, OperatorTable};

/// One run of the expression parser: the table and term it climbs over.
pub(super) struct Climber<'a, T, R, U> {
    table: &'a OperatorTable<T, R, U>,
    term: &'a Parser<T, R, U>,
}

impl<'a, T, R, U> Climber<'a, T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    pub(super) fn new(table: &'a OperatorTable<T, R, U>, term: &'a Parser<T, R, U>) -> Self {
        Self { table, term }
    }

    /// Parses an expression whose infix and postfix operators all have
    /// priority at least `min`. `parent` is the infix operator whose right-hand
    /// side this is.
    pub(super) fn expression(
        &self,
        stream: &mut InputStream<T, U>,
        min: u32,
        parent: Option<&'a InfixOperator<R>>,
    ) -> ParseResult<R> {
        let table = self.table;
        let start = stream.position();
        let operand = self.operand(stream);
        let Some(mut value) = operand.result else {
            return failed_at(start, operand.error, operand.end);
        };
        let mut latent = operand.error;
        let mut previous: Option<&'a InfixOperator<R>> = None;

        loop {
            match self.skip_whitespace(stream) {
                Ok(true) => latent = None,
                Ok(false) => {}
                Err(failed) => return failed_at(start, failed.error, failed.end),
            }
            let at = stream.index();
            // Text that is only a prefix operator cannot continue the chain.
            let found = table
                .lookup(stream)
                .filter(|(_, slots)| slots.infix.is_some() || slots.postfix.is_some());
            let Some((width, slots)) = found else {
                if !table.infix.is_empty() || !table.postfix.is_empty() {
                    let expected = stream.make_error(ParserError::expected("operator"));
                    latent = LocatedParserError::merge_opt(latent, Some(expected));
                }
                break;
            };

            if let Some(index) = slots.postfix {
                let op = &table.postfix[index];
                if op.priority < min {
                    break;
                }
                stream.step(width);
                value = (op.build)(value);
                latent = None;
                continue;
            }

            let Some(index) = slots.infix else { break };
            let op = &table.infix[index];
            if op.priority < min {
                break;
            }
            for earlier in parent.into_iter().chain(previous) {
                if let Some(error) = conflict(earlier, op) {
                    let error = LocatedParserError::new(at, at + width, error);
                    return ParseResult::failure(error, start, stream.position());
                }
            }

            stream.step(width);
            if let Err(failed) = self.skip_whitespace(stream) {
                return failed_at(start, failed.error, failed.end);
            }
            let rhs = self.expression(stream, next_minimum(op), Some(op));
            let Some(right) = rhs.result else {
                return failed_at(start, rhs.error, rhs.end);
            };
            value = (op.build)(value, right);
            latent = rhs.error;
            previous = Some(op);
        }

        ParseResult {
            result: Some(value),
            error: latent,
            start,
            end: stream.position(),
        }
    }

    /// A prefix operator applied to its operand, or a bare term.
    fn operand(&self, stream: &mut InputStream<T, U>) -> ParseResult<R> {
        let table = self.table;
        let start = stream.position();
        let prefix = table
            .lookup(stream)
            .and_then(|(width, slots)| Some((width, &table.prefix[slots.prefix?])));

        if let Some((width, op)) = prefix {
            stream.step(width);
            if let Err(failed) = self.skip_whitespace(stream) {
                return failed_at(start, failed.error, failed.end);
            }
            let inner = self.expression(stream, op.priority, None);
            return ParseResult {
                result: inner.result.map(|value| (op.build)(value)),
                error: inner.error,
                start,
                end: inner.end,
            };
        }

        let term = self.term.parse(stream);
        if term.status() == Status::Error && !table.prefix.is_empty() {
            let expected = LocatedParserError::at(start.index, ParserError::expected("prefix operator"));
            let error = LocatedParserError::merge_opt(Some(expected), term.error);
            return failed_at(start, error, term.end);
        }
        term
    }

    /// Runs the table's whitespace parser, if any. `Ok(true)` when something
    /// was skipped; a failure that consumed input is passed back.
    fn skip_whitespace(&self, stream: &mut InputStream<T, U>) -> Result<bool, ParseResult<()>> {
        let Some(whitespace) = &self.table.whitespace else {
            return Ok(false);
        };
        let outcome = whitespace.parse(stream);
        match outcome.status() {
            Status::Ok => Ok(outcome.consumed()),
            Status::Error => Ok(false),
            Status::Fatal => Err(outcome),
        }
    }
}

fn failed_at<R>(start: Position, error: Option<LocatedParserError>, end: Position) -> ParseResult<R> {
    ParseResult {
        result: None,
        error,
        start,
        end,
    }
}

/// Minimum priority for the right-hand side of `op`.
fn next_minimum<R>(op: &InfixOperator<R>) -> u32 {
    match op.associativity {
        Associativity::Left | Associativity::None => op.priority.saturating_add(1),
        Associativity::Right => op.priority,
    }
}

/// Why `next` may not follow `earlier` in the same chain, if it may not.
fn conflict<R>(earlier: &InfixOperator<R>, next: &InfixOperator<R>) -> Option<ParserError> {
    if earlier.priority != next.priority {
        return None;
    }
    match (earlier.associativity, next.associativity) {
        (Associativity::None, Associativity::None) => Some(ParserError::failure(format!(
            "multiple non-associative operators of the same priority: '{}' and '{}'",
            earlier.text, next.text
        ))),
        (a, b) if a != b => Some(ParserError::failure(format!(
            "ambiguous operators of the same priority {}: '{}' is {} but '{}' is {}",
            next.priority, earlier.text, a, next.text, b
        ))),
        _ => None,
    }
}
