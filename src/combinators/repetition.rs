//! Repetition.
//!
//! Every loop treats a successful iteration that consumed nothing as a failure
//! of the grammar: repeating it would never terminate.

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::Parser;
use crate::position::Position;
use crate::result::ParseResult;
use crate::stream::{InputStream, StreamToken};

/// What a loop ended with.
enum LoopEnd {
    /// The item parser failed without consuming; its error is latent.
    Stopped(Option<LocatedParserError>),
    /// The loop must fail with this error, the stream being at `end`.
    Failed(LocatedParserError, Position),
}

fn no_progress(name: &str, index: usize) -> LocatedParserError {
    LocatedParserError::at(
        index,
        ParserError::failure(format!(
            "The combinator '{name}' was applied to a parser that parsed an object without consuming text"
        )),
    )
}

/// Applies `item` until it fails, feeding each value to `sink`.
fn run_loop<T, R, U>(
    item: &Parser<T, R, U>,
    stream: &mut InputStream<T, U>,
    name: &str,
    mut latent: Option<LocatedParserError>,
    mut sink: impl FnMut(R),
) -> LoopEnd
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    loop {
        let outcome = item.parse(stream);
        let consumed = outcome.consumed();
        match outcome.result {
            Some(_) if !consumed => return LoopEnd::Failed(no_progress(name, stream.index()), outcome.end),
            Some(value) => {
                latent = outcome.error;
                sink(value);
            }
            None if consumed => {
                let error = outcome
                    .error
                    .unwrap_or_else(|| LocatedParserError::at(outcome.end.index, ParserError::failure(name)));
                return LoopEnd::Failed(error, outcome.end);
            }
            None => return LoopEnd::Stopped(LocatedParserError::merge_opt(latent, outcome.error)),
        }
    }
}

fn at_least_one_error(name: &str, latent: Option<LocatedParserError>, index: usize) -> LocatedParserError {
    LocatedParserError::at(
        index,
        ParserError::incorrect_number(1, 0, format!("or more items in {name}"), latent.map(|e| e.error)),
    )
}

fn repeat<T, R, U>(item: Parser<T, R, U>, name: &'static str, at_least_one: bool) -> Parser<T, Vec<R>, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    Parser::new(move |stream| {
        let start = stream.position();
        let mut items = Vec::new();
        match run_loop(&item, stream, name, None, |value| items.push(value)) {
            LoopEnd::Failed(error, end) => ParseResult::failure(error, start, end),
            LoopEnd::Stopped(latent) if at_least_one && items.is_empty() => {
                ParseResult::failure(at_least_one_error(name, latent, start.index), start, start)
            }
            LoopEnd::Stopped(latent) => ParseResult {
                result: Some(items),
                error: latent,
                start,
                end: stream.position(),
            },
        }
    })
}

fn skip<T, R, U>(item: Parser<T, R, U>, name: &'static str, at_least_one: bool) -> Parser<T, (), U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    Parser::new(move |stream| {
        let start = stream.position();
        let mut count = 0usize;
        match run_loop(&item, stream, name, None, |_| count += 1) {
            LoopEnd::Failed(error, end) => ParseResult::failure(error, start, end),
            LoopEnd::Stopped(latent) if at_least_one && count == 0 => {
                ParseResult::failure(at_least_one_error(name, latent, start.index), start, start)
            }
            LoopEnd::Stopped(latent) => ParseResult {
                result: Some(()),
                error: latent,
                start,
                end: stream.position(),
            },
        }
    })
}

fn separated<T, R, S, U>(
    item: Parser<T, R, U>,
    separator: Parser<T, S, U>,
    name: &'static str,
    at_least_one: bool,
) -> Parser<T, Vec<R>, U>
where
    T: StreamToken + 'static,
    R: 'static,
    S: 'static,
    U: Clone + 'static,
{
    // After the first item, each iteration is `separator` then `item`; once a
    // separator has been accepted the item is mandatory.
    let rest = separator.ig_then(item.clone());
    Parser::new(move |stream| {
        let start = stream.position();
        let first = item.parse(stream);
        let consumed = first.consumed();
        let mut items = Vec::new();
        let latent = match first.result {
            Some(value) => {
                items.push(value);
                first.error
            }
            None if consumed => return ParseResult::failure_opt(first.error, start, first.end, name),
            None if at_least_one => {
                return ParseResult::failure(at_least_one_error(name, first.error, start.index), start, start)
            }
            None => {
                return ParseResult {
                    result: Some(items),
                    error: first.error,
                    start,
                    end: start,
                }
            }
        };
        match run_loop(&rest, stream, name, latent, |value| items.push(value)) {
            LoopEnd::Failed(error, end) => ParseResult::failure(error, start, end),
            LoopEnd::Stopped(latent) => ParseResult {
                result: Some(items),
                error: latent,
                start,
                end: stream.position(),
            },
        }
    })
}

impl<R> ParseResult<R> {
    fn failure_opt(error: Option<LocatedParserError>, start: Position, end: Position, name: &str) -> Self {
        let error = error.unwrap_or_else(|| LocatedParserError::at(end.index, ParserError::failure(name)));
        ParseResult::failure(error, start, end)
    }
}

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    /// Zero or more repetitions.
    pub fn many(self) -> Parser<T, Vec<R>, U> {
        repeat(self, "many", false)
    }

    /// One or more repetitions.
    pub fn many1(self) -> Parser<T, Vec<R>, U> {
        repeat(self, "many1", true)
    }

    /// Zero or more repetitions, discarding results.
    pub fn skip_many(self) -> Parser<T, (), U> {
        skip(self, "skip_many", false)
    }

    /// One or more repetitions, discarding results.
    pub fn skip_many1(self) -> Parser<T, (), U> {
        skip(self, "skip_many1", true)
    }

    /// Zero or more items separated by `separator`.
    pub fn sep_by<S: 'static>(self, separator: Parser<T, S, U>) -> Parser<T, Vec<R>, U> {
        separated(self, separator, "sep_by", false)
    }

    /// One or more items separated by `separator`.
    pub fn sep_by1<S: 'static>(self, separator: Parser<T, S, U>) -> Parser<T, Vec<R>, U> {
        separated(self, separator, "sep_by1", true)
    }

    /// Exactly `count` repetitions; a shortfall is an `IncorrectNumber` error.
    pub fn repeat_exactly(self, count: usize) -> Parser<T, Vec<R>, U> {
        Parser::new(move |stream| {
            let start = stream.position();
            let mut items = Vec::with_capacity(count);
            let mut latent = None;
            while items.len() < count {
                let outcome = self.parse(stream);
                let consumed = outcome.consumed();
                match outcome.result {
                    Some(value) => {
                        latent = outcome.error;
                        items.push(value);
                    }
                    None if consumed => return ParseResult::failure_opt(outcome.error, start, outcome.end, "repeat_exactly"),
                    None => {
                        let inner = LocatedParserError::merge_opt(latent, outcome.error).map(|e| e.error);
                        let error = ParserError::incorrect_number(count, items.len(), "items", inner);
                        return ParseResult::failure(
                            LocatedParserError::at(stream.index(), error),
                            start,
                            stream.position(),
                        );
                    }
                }
            }
            ParseResult {
                result: Some(items),
                error: latent,
                start,
                end: stream.position(),
            }
        })
    }
}
