//! Zero-width lookahead. The stream is always left where it was.

use crate::errors::ParserError;
use crate::parser::Parser;
use crate::result::{ParseResult, Status};
use crate::stream::StreamToken;

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    /// Runs `self` and rewinds. Succeeds with its value, or fails recoverably;
    /// a failure that had consumed input is logged as backtracked.
    pub fn look_ahead(self) -> Parser<T, R, U> {
        Parser::new(move |stream| {
            let saved = stream.state();
            let outcome = self.parse(stream);
            let start = outcome.start;
            match outcome.status() {
                Status::Ok => {
                    stream.rollback_fast(saved);
                    ParseResult {
                        result: outcome.result,
                        error: None,
                        start,
                        end: start,
                    }
                }
                Status::Error => outcome,
                Status::Fatal => {
                    let error = outcome.error.clone().map(|e| e.relocated(start.index));
                    stream.rollback(saved, outcome.error);
                    ParseResult {
                        result: None,
                        error,
                        start,
                        end: start,
                    }
                }
            }
        })
    }

    /// Succeeds without consuming if `self` would succeed here.
    pub fn followed_by(self) -> Parser<T, (), U> {
        self.look_ahead().map(|_| ())
    }

    /// Succeeds without consuming if `self` would fail here; otherwise fails
    /// with `Unexpected <description>`.
    pub fn not_followed_by(self, description: impl Into<String>) -> Parser<T, (), U> {
        let description = description.into();
        Parser::new(move |stream| {
            let saved = stream.state();
            let outcome = self.parse(stream);
            stream.rollback_fast(saved);
            let at = outcome.start;
            if outcome.is_ok() {
                ParseResult::failure(
                    stream.make_error(ParserError::unexpected(description.clone())),
                    at,
                    at,
                )
            } else {
                ParseResult::success((), at, at)
            }
        })
    }
}
