//! Sequencing.
//!
//! All sequencing goes through [`sequence`], which applies the merge law: the
//! error of `a` then `b` is `b`'s alone when `b` consumed input, and the union
//! of both otherwise. This holds even when `a` succeeded, because a success may
//! carry a latent error from an `opt` that failed without consuming.

use crate::parser::Parser;
use crate::result::ParseResult;
use crate::stream::StreamToken;

fn sequence<T, A, B, C, U, F>(first: Parser<T, A, U>, second: Parser<T, B, U>, combine: F) -> Parser<T, C, U>
where
    T: StreamToken + 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    U: Clone + 'static,
    F: Fn(A, B) -> C + 'static,
{
    Parser::new(move |stream| {
        let ParseResult {
            result,
            error,
            start,
            end,
        } = first.parse(stream);
        let Some(a) = result else {
            return ParseResult {
                result: None,
                error,
                start,
                end,
            };
        };
        let next = second.parse(stream);
        let error = next.merged_error(error);
        ParseResult {
            result: next.result.map(|b| combine(a, b)),
            error,
            start,
            end: next.end,
        }
    })
}

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    /// Runs `self` then `other`, keeping both results.
    pub fn then<S: 'static>(self, other: Parser<T, S, U>) -> Parser<T, (R, S), U> {
        sequence(self, other, |a, b| (a, b))
    }

    /// Runs `self` then `other`, keeping the left result.
    pub fn then_ig<S: 'static>(self, other: Parser<T, S, U>) -> Parser<T, R, U> {
        sequence(self, other, |a, _| a)
    }

    /// Runs `self` then `other`, keeping the right result.
    pub fn ig_then<S: 'static>(self, other: Parser<T, S, U>) -> Parser<T, S, U> {
        sequence(self, other, |_, b| b)
    }

    /// `open`, then `self`, then `close`; keeps the middle result.
    pub fn between<A: 'static, B: 'static>(
        self,
        open: Parser<T, A, U>,
        close: Parser<T, B, U>,
    ) -> Parser<T, R, U> {
        open.ig_then(self).then_ig(close)
    }

    pub fn map<S: 'static, F>(self, f: F) -> Parser<T, S, U>
    where
        F: Fn(R) -> S + 'static,
    {
        Parser::new(move |stream| self.parse(stream).map(&f))
    }

    /// Replaces the result with `value`.
    pub fn to<S: Clone + 'static>(self, value: S) -> Parser<T, S, U> {
        self.map(move |_| value.clone())
    }

    /// Chooses the next parser from the result of this one.
    pub fn and_then<S: 'static, F>(self, f: F) -> Parser<T, S, U>
    where
        F: Fn(R) -> Parser<T, S, U> + 'static,
    {
        Parser::new(move |stream| {
            let ParseResult {
                result,
                error,
                start,
                end,
            } = self.parse(stream);
            let Some(value) = result else {
                return ParseResult {
                    result: None,
                    error,
                    start,
                    end,
                };
            };
            let next = f(value).parse(stream);
            let error = next.merged_error(error);
            ParseResult {
                result: next.result,
                error,
                start,
                end: next.end,
            }
        })
    }
}

/// Three parsers in sequence, keeping all results.
pub fn tuple3<T, A, B, C, U>(
    a: Parser<T, A, U>,
    b: Parser<T, B, U>,
    c: Parser<T, C, U>,
) -> Parser<T, (A, B, C), U>
where
    T: StreamToken + 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    U: Clone + 'static,
{
    sequence(a.then(b), c, |(a, b), c| (a, b, c))
}
