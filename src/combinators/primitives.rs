//! Parsers that do not wrap another parser.

use crate::errors::{LocatedParserError, ParserError};
use crate::parser::Parser;
use crate::position::Position;
use crate::result::ParseResult;
use crate::stream::StreamToken;

/// Succeeds with `value` without consuming anything.
pub fn preturn<T, R, U>(value: R) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: Clone + 'static,
    U: Clone + 'static,
{
    Parser::new(move |stream| {
        let at = stream.position();
        ParseResult::success(value.clone(), at, at)
    })
}

/// Fails after marking one token as consumed, so the failure is fatal and
/// cannot be backtracked by `or`, even at the end of input. The stream itself
/// is not moved.
pub fn fail<T, R, U>(message: impl Into<String>) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    let message = message.into();
    Parser::new(move |stream| {
        let start = stream.position();
        let end = Position {
            index: start.index + 1,
            ..start
        };
        let error = LocatedParserError::new(start.index, end.index, ParserError::failure(message.clone()));
        ParseResult::failure(error, start, end)
    })
}

/// Fails without consuming anything.
pub fn error<T, R, U>(message: impl Into<String>) -> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    let message = message.into();
    Parser::new(move |stream| {
        let at = stream.position();
        ParseResult::failure(stream.make_error(ParserError::failure(message.clone())), at, at)
    })
}

/// Accepts one token matching `predicate`; otherwise fails with
/// `Expected <description>` without consuming.
pub fn satisfy<T, U, F>(predicate: F, description: impl Into<String>) -> Parser<T, T, U>
where
    T: StreamToken + 'static,
    U: Clone + 'static,
    F: Fn(&T) -> bool + 'static,
{
    let description = description.into();
    Parser::new(move |stream| {
        let start = stream.position();
        match stream.peek() {
            Some(token) if predicate(token) => {
                let token = token.clone();
                stream.step(1);
                ParseResult::success(token, start, stream.position())
            }
            _ => ParseResult::failure(
                stream.make_error(ParserError::expected(description.clone())),
                start,
                start,
            ),
        }
    })
}

/// Accepts exactly `expected`.
pub fn token<T, U>(expected: T) -> Parser<T, T, U>
where
    T: StreamToken + PartialEq + 'static,
    U: Clone + 'static,
{
    let description = expected.describe();
    satisfy(move |t: &T| *t == expected, description)
}

/// Accepts any single token.
pub fn any_token<T, U>() -> Parser<T, T, U>
where
    T: StreamToken + 'static,
    U: Clone + 'static,
{
    Parser::new(|stream| {
        let start = stream.position();
        match stream.advance() {
            Some(token) => ParseResult::success(token, start, stream.position()),
            None => ParseResult::failure(
                stream.make_error(ParserError::unexpected("end of input")),
                start,
                start,
            ),
        }
    })
}

/// Succeeds only at the end of the stream.
pub fn eof<T, U>() -> Parser<T, (), U>
where
    T: StreamToken + 'static,
    U: Clone + 'static,
{
    Parser::new(|stream| {
        let at = stream.position();
        if stream.is_at_end() {
            ParseResult::success((), at, at)
        } else {
            ParseResult::failure(stream.make_error(ParserError::expected("end of input")), at, at)
        }
    })
}

// ============================================================================
// USER STATE
// ============================================================================

/// Returns a copy of the stream's user state.
pub fn get_user_state<T, U>() -> Parser<T, U, U>
where
    T: StreamToken + 'static,
    U: Clone + 'static,
{
    Parser::new(|stream: &mut crate::stream::InputStream<T, U>| {
        let at = stream.position();
        ParseResult::success(stream.user_state().clone(), at, at)
    })
}

/// Applies `update` to the user state. The change is undone by any rollback
/// to an earlier snapshot.
pub fn update_user_state<T, U, F>(update: F) -> Parser<T, (), U>
where
    T: StreamToken + 'static,
    U: Clone + 'static,
    F: Fn(&mut U) + 'static,
{
    Parser::new(move |stream| {
        update(stream.user_state_mut());
        let at = stream.position();
        ParseResult::success((), at, at)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Status;
    use crate::stream::InputStream;

    #[test]
    fn fail_is_fatal_and_error_is_not() {
        let mut stream = InputStream::from_text("abc");
        let outcome = fail::<char, (), ()>("nope").parse(&mut stream);
        assert_eq!(outcome.status(), Status::Fatal);
        assert_eq!(outcome.end.index, 1);
        assert_eq!(stream.index(), 0);

        let outcome = error::<char, (), ()>("nope").parse(&mut stream);
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(stream.index(), 0);
    }

    #[test]
    fn fail_at_end_of_input_is_still_fatal() {
        let committed = fail::<char, i32, ()>("committed").or(preturn(7));
        let mut stream = InputStream::from_text("");
        let outcome = committed.parse(&mut stream);
        assert_eq!(outcome.status(), Status::Fatal);
        assert_eq!(outcome.result, None);
        assert_eq!(outcome.flat_error(), Some(ParserError::failure("committed")));
    }

    #[test]
    fn satisfy_does_not_consume_on_mismatch() {
        let mut stream = InputStream::from_text("x");
        let digit = satisfy::<char, (), _>(|c| c.is_ascii_digit(), "digit");
        let outcome = digit.parse(&mut stream);
        assert_eq!(outcome.status(), Status::Error);
        assert_eq!(outcome.flat_error(), Some(ParserError::expected("digit")));
        assert_eq!(stream.index(), 0);
    }

    #[test]
    fn user_state_round_trip() {
        let mut stream = InputStream::new(vec!['a'], 1i32);
        let bump = update_user_state::<char, i32, _>(|n| *n += 41);
        assert!(bump.parse(&mut stream).is_ok());
        let state = get_user_state::<char, i32>().parse(&mut stream);
        assert_eq!(state.result, Some(42));
    }
}
