//! Alternation, backtracking and labelling.

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::{Either, Parser};
use crate::result::{ParseResult, Status};
use crate::stream::StreamToken;

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    /// Tries `self`; only when it fails without consuming is `other` tried,
    /// from the same position, and the two diagnostics merged.
    ///
    /// A failure that consumed input is returned unchanged: once a branch has
    /// committed to the input, the alternative is never considered.
    pub fn or(self, other: Parser<T, R, U>) -> Parser<T, R, U> {
        Parser::new(move |stream| {
            let first = self.parse(stream);
            if first.status() != Status::Error {
                return first;
            }
            let second = other.parse(stream);
            let error = second.merged_error(first.error);
            second.with_error(error)
        })
    }

    /// Like [`Parser::or`] for parsers of different result types.
    pub fn or_either<S: 'static>(self, other: Parser<T, S, U>) -> Parser<T, Either<R, S>, U> {
        self.map(Either::Left).or(other.map(Either::Right))
    }

    /// Turns a fatal failure into a recoverable one by rewinding the stream to
    /// where `self` started.
    ///
    /// The discarded error is appended to the stream's backtrack log, and the
    /// returned error is re-anchored at the start position.
    pub fn attempt(self) -> Parser<T, R, U> {
        Parser::new(move |stream| {
            let saved = stream.state();
            let outcome = self.parse(stream);
            if outcome.status() != Status::Fatal {
                return outcome;
            }
            let start = outcome.start;
            let rewound = outcome.error.clone().map(|e| e.relocated(saved.index));
            stream.rollback(saved, outcome.error);
            ParseResult {
                result: None,
                error: rewound,
                start,
                end: start,
            }
        })
    }

    /// Wraps any failure in `Labelled(label, ...)`. Control flow is unchanged.
    pub fn label(self, label: impl Into<String>) -> Parser<T, R, U> {
        let label = label.into();
        Parser::new(move |stream| {
            let mut outcome = self.parse(stream);
            if !outcome.is_ok() {
                outcome.error = outcome
                    .error
                    .take()
                    .map(|e| e.map_error(|inner| ParserError::labelled(label.clone(), Some(inner))));
            }
            outcome
        })
    }
}

/// n-ary [`Parser::or`]. Errors of every branch that failed without consuming
/// are collected into one `OneOf`.
pub fn choice<T, R, U>(parsers: Vec<Parser<T, R, U>>) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    choose(parsers, None)
}

/// Like [`choice`], but a failure always reports the single expectation
/// `label` instead of one entry per branch.
pub fn choice_l<T, R, U>(parsers: Vec<Parser<T, R, U>>, label: impl Into<String>) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    choose(parsers, Some(label.into()))
}

fn choose<T, R, U>(parsers: Vec<Parser<T, R, U>>, label: Option<String>) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    Parser::new(move |stream| {
        let start = stream.position();
        let mut alternatives = Vec::new();
        let mut outcome = None;
        for parser in &parsers {
            let attempt = parser.parse(stream);
            if attempt.status() != Status::Error {
                outcome = Some(attempt);
                break;
            }
            alternatives.extend(attempt.error.map(|e| e.error));
        }

        let collect = |alternatives: Vec<ParserError>| {
            let error = match &label {
                Some(label) => ParserError::labelled(label.clone(), None),
                None if alternatives.is_empty() => ParserError::failure("no alternative matched"),
                None => ParserError::OneOf(alternatives).flatten(),
            };
            LocatedParserError::at(start.index, error)
        };

        match outcome {
            Some(outcome) if alternatives.is_empty() => outcome,
            Some(outcome) => {
                let error = outcome.merged_error(Some(collect(alternatives)));
                outcome.with_error(error)
            }
            None => ParseResult::failure(collect(alternatives), start, start),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::char_;
    use crate::stream::InputStream;

    #[test]
    fn choice_collects_non_fatal_errors() {
        let p = choice(vec![char_('a'), char_('b'), char_('c')]);
        let mut stream = InputStream::from_text("z");
        let outcome = p.parse(&mut stream);
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(
            outcome.flat_error(),
            Some(ParserError::OneOf(vec![
                ParserError::expected("'a'"),
                ParserError::expected("'b'"),
                ParserError::expected("'c'"),
            ]))
        );
    }

    #[test]
    fn choice_l_reports_one_label() {
        let p = choice_l(vec![char_('a'), char_('b')], "letter a or b");
        let mut stream = InputStream::from_text("z");
        let outcome = p.parse(&mut stream);
        assert_eq!(outcome.flat_error(), Some(ParserError::labelled("letter a or b", None)));
    }

    #[test]
    fn choice_stops_at_fatal_branch() {
        let p = choice(vec![char_('a').then(char_('b')), char_('a').then(char_('c'))]);
        let mut stream = InputStream::from_text("ac");
        assert_eq!(p.parse(&mut stream).status(), Status::Fatal);
    }

    #[test]
    fn attempt_rewinds_and_logs() {
        let p = char_('a').then(char_('b')).attempt();
        let mut stream = InputStream::from_text("ac");
        let outcome = p.parse(&mut stream);
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(stream.index(), 0);
        assert_eq!(stream.backtracked().len(), 1);
        assert_eq!(stream.backtracked()[0].start, 1);
    }
}
