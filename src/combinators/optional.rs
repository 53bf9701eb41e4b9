//! Optionality. A recoverable failure becomes an absent value; the failure's
//! diagnostic stays attached so a later failure at the same spot can report
//! it. Fatal failures are never swallowed.

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::Parser;
use crate::result::{ParseResult, Status};
use crate::stream::StreamToken;

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    pub fn opt(self) -> Parser<T, Option<R>, U> {
        Parser::new(move |stream| {
            let outcome = self.parse(stream);
            match outcome.status() {
                Status::Ok => outcome.map(Some),
                Status::Error => ParseResult {
                    result: Some(None),
                    error: outcome.error,
                    start: outcome.start,
                    end: outcome.end,
                },
                Status::Fatal => outcome.cast(),
            }
        })
    }

    /// [`Parser::opt`] discarding the value.
    pub fn optional(self) -> Parser<T, (), U> {
        self.opt().map(|_| ())
    }

    /// [`Parser::opt`] substituting `default` when absent.
    pub fn optional_or(self, default: R) -> Parser<T, R, U>
    where
        R: Clone,
    {
        self.opt().map(move |value| value.unwrap_or_else(|| default.clone()))
    }

    /// Turns a success that consumed nothing into a recoverable failure.
    pub fn not_empty(self) -> Parser<T, R, U> {
        Parser::new(move |stream| {
            let outcome = self.parse(stream);
            if !outcome.is_ok() || outcome.consumed() {
                return outcome;
            }
            let error = outcome.error.unwrap_or_else(|| {
                LocatedParserError::at(
                    outcome.start.index,
                    ParserError::failure("parser succeeded without consuming input"),
                )
            });
            ParseResult::failure(error, outcome.start, outcome.end)
        })
    }
}

impl<T, R, U> Parser<T, Option<R>, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    /// For parsers that already produce an `Option`: absent when either the
    /// parser failed recoverably or produced `None`.
    pub fn optional_or_none(self) -> Parser<T, Option<R>, U> {
        self.opt().map(Option::flatten)
    }
}

#[cfg(test)]
mod tests {
    use crate::combinators::{char_, digit, parse_int};
    use crate::result::Status;
    use crate::stream::InputStream;

    #[test]
    fn opt_keeps_latent_error() {
        let mut stream = InputStream::from_text("x");
        let outcome = char_('a').opt().parse(&mut stream);
        assert_eq!(outcome.result, Some(None));
        assert!(outcome.error.is_some());
    }

    #[test]
    fn opt_does_not_swallow_fatal() {
        let mut stream = InputStream::from_text("ax");
        let outcome = char_('a').then(char_('b')).opt().parse(&mut stream);
        assert_eq!(outcome.status(), Status::Fatal);
    }

    #[test]
    fn optional_or_supplies_default() {
        let sign = char_('-').optional_or('+');
        assert_eq!(sign.parse_text("5").unwrap(), '+');
        assert_eq!(sign.parse_text("-5").unwrap(), '-');
    }

    #[test]
    fn optional_or_none_flattens() {
        let maybe = parse_int().opt().then_ig(char_(';')).optional_or_none();
        assert_eq!(maybe.parse_text("7;").unwrap(), Some(7));
        assert_eq!(maybe.parse_text(";").unwrap(), None);
        assert_eq!(maybe.parse_text("").unwrap(), None);
    }

    #[test]
    fn not_empty_rejects_empty_success() {
        let digits = digit().many().not_empty();
        let mut stream = InputStream::from_text("abc");
        assert_eq!(digits.parse(&mut stream).status(), Status::Error);
        assert_eq!(digits.parse_text("12").unwrap(), vec!['1', '2']);
    }
}
