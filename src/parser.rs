//! The unit of composition: a function from a stream to a [`ParseResult`].

use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use crate::diagnostics::ParseFailure;
use crate::result::ParseResult;
use crate::stream::{InputStream, StreamToken};

type ParserFn<T, R, U> = Rc<dyn Fn(&mut InputStream<T, U>) -> ParseResult<R>>;

// ============================================================================
// PARSER
// ============================================================================

/// A shareable parser over tokens `T` producing `R`, with user state `U`.
///
/// Cloning is cheap: the underlying closure is reference counted, so the same
/// parser can appear in several places of a grammar.
pub struct Parser<T, R, U = ()> {
    run: ParserFn<T, R, U>,
}

impl<T, R, U> Clone for Parser<T, R, U> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T, R, U> fmt::Debug for Parser<T, R, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").finish_non_exhaustive()
    }
}

impl<T, R, U> Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut InputStream<T, U>) -> ParseResult<R> + 'static,
    {
        Self { run: Rc::new(f) }
    }

    /// Applies the parser at the stream's current position.
    pub fn parse(&self, stream: &mut InputStream<T, U>) -> ParseResult<R> {
        (self.run)(stream)
    }

    /// Runs the parser over `tokens` from the start and converts a failure
    /// into a rendered [`ParseFailure`].
    pub fn parse_tokens(&self, tokens: impl Into<Vec<T>>, user_state: U) -> Result<R, ParseFailure> {
        let mut stream = InputStream::new(tokens, user_state);
        let outcome = run(self, &mut stream);
        ParseFailure::check(outcome, &stream)
    }
}

impl<R: 'static> Parser<char, R, ()> {
    /// Convenience entry point for character grammars.
    pub fn parse_text(&self, text: &str) -> Result<R, ParseFailure> {
        let mut stream = InputStream::from_text(text);
        let outcome = run(self, &mut stream);
        ParseFailure::check(outcome, &stream)
    }
}

/// Top-level execution of `parser` on `stream`.
pub fn run<T, R, U>(parser: &Parser<T, R, U>, stream: &mut InputStream<T, U>) -> ParseResult<R>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    parser.parse(stream)
}

/// `p | q` is [`Parser::or`].
impl<T, R, U> BitOr for Parser<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    type Output = Parser<T, R, U>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

// ============================================================================
// EITHER
// ============================================================================

/// Result of a choice between two parsers of different types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    pub fn left(self) -> Option<L> {
        match self {
            Either::Left(l) => Some(l),
            Either::Right(_) => None,
        }
    }

    pub fn right(self) -> Option<R> {
        match self {
            Either::Left(_) => None,
            Either::Right(r) => Some(r),
        }
    }
}
