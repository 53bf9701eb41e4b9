//! Character-level helpers for grammars over `char` streams.

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::Parser;
use crate::result::ParseResult;
use crate::stream::StreamToken;

use super::primitives::satisfy;

pub fn char_<U: Clone + 'static>(expected: char) -> Parser<char, char, U> {
    satisfy(move |c: &char| *c == expected, expected.describe())
}

/// Matches `expected` exactly. On mismatch nothing is consumed, even when a
/// prefix matched.
pub fn string<U: Clone + 'static>(expected: &str) -> Parser<char, String, U> {
    let expected: Vec<char> = expected.chars().collect();
    let description = format!("\"{}\"", expected.iter().collect::<String>());
    Parser::new(move |stream| {
        let start = stream.position();
        if stream.remaining().starts_with(&expected) {
            stream.step(expected.len());
            ParseResult::success(expected.iter().collect(), start, stream.position())
        } else {
            ParseResult::failure(
                stream.make_error(ParserError::expected(description.clone())),
                start,
                start,
            )
        }
    })
}

/// Any one of the characters in `set`.
pub fn any_of<U: Clone + 'static>(set: &str) -> Parser<char, char, U> {
    let description = format!("any char in \"{}\"", set);
    let set: Vec<char> = set.chars().collect();
    satisfy(move |c: &char| set.contains(c), description)
}

pub fn digit<U: Clone + 'static>() -> Parser<char, char, U> {
    satisfy(|c: &char| c.is_ascii_digit(), "digit")
}

pub fn letter<U: Clone + 'static>() -> Parser<char, char, U> {
    satisfy(|c: &char| c.is_alphabetic(), "letter")
}

fn whitespace<U: Clone + 'static>() -> Parser<char, char, U> {
    satisfy(|c: &char| c.is_whitespace(), "whitespace")
}

/// Drops the latent error of a success, so skipped whitespace is never listed
/// among the alternatives of a later failure.
fn silent<U: Clone + 'static>(skip: Parser<char, (), U>) -> Parser<char, (), U> {
    Parser::new(move |stream| {
        let outcome = skip.parse(stream);
        if outcome.is_ok() {
            outcome.with_error(None)
        } else {
            outcome
        }
    })
}

/// Skips zero or more whitespace characters.
pub fn spaces<U: Clone + 'static>() -> Parser<char, (), U> {
    silent(whitespace().skip_many())
}

/// Skips one or more whitespace characters.
pub fn spaces1<U: Clone + 'static>() -> Parser<char, (), U> {
    silent(whitespace().skip_many1())
}

/// A letter or underscore followed by letters, digits or underscores.
pub fn identifier<U: Clone + 'static>() -> Parser<char, String, U> {
    let head = satisfy(|c: &char| c.is_alphabetic() || *c == '_', "identifier");
    let tail = satisfy(|c: &char| c.is_alphanumeric() || *c == '_', "identifier character");
    head.then(tail.many())
        .map(|(first, rest)| std::iter::once(first).chain(rest).collect())
}

/// A decimal integer with an optional leading `-`.
///
/// Reads as one lexeme: a success carries no latent error, and failing before
/// any input is consumed reports just `Expected integer`. A failure after the
/// sign, or an overflow, is fatal and keeps the detail.
pub fn parse_int<U: Clone + 'static>() -> Parser<char, i64, U> {
    let literal = char_('-').opt().then(digit().many1());
    Parser::new(move |stream| {
        let outcome = literal.parse(stream);
        let (start, end) = (outcome.start, outcome.end);
        let Some((sign, digits)) = outcome.result else {
            let error = if outcome.end.index > start.index {
                outcome
                    .error
                    .map(|e| e.map_error(|inner| ParserError::labelled("integer", Some(inner))))
            } else {
                Some(LocatedParserError::at(start.index, ParserError::labelled("integer", None)))
            };
            return ParseResult {
                result: None,
                error,
                start,
                end,
            };
        };
        let text: String = sign.into_iter().chain(digits).collect();
        match text.parse::<i64>() {
            Ok(value) => ParseResult::success(value, start, end),
            Err(_) => ParseResult::failure(
                LocatedParserError::new(
                    start.index,
                    end.index,
                    ParserError::failure(format!("integer literal {text} is out of range")),
                ),
                start,
                end,
            ),
        }
    })
}
