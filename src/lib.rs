//! plait: a token-generic parser-combinator toolkit.
//!
//! Parsers are values of type [`Parser<T, R, U>`](parser::Parser): shareable
//! functions from a mutable [`InputStream`](stream::InputStream) of tokens `T`
//! to a [`ParseResult<R>`](result::ParseResult), threading user state `U`.
//! Backtracking follows one rule throughout: a parser that failed without
//! consuming input may be replaced by an alternative, a parser that consumed
//! input may not unless it is wrapped in [`attempt`](parser::Parser::attempt).
//!
//! ```rust
//! use plait::combinators::{char_, parse_int};
//!
//! let list = parse_int().sep_by(char_(',')).between(char_('['), char_(']'));
//! assert_eq!(list.parse_text("[1,2,3]").unwrap(), vec![1, 2, 3]);
//!
//! let failure = list.parse_text("[1,2").unwrap_err();
//! assert_eq!(
//!     failure.to_string(),
//!     "Error at Line 1, Col 5:\n[1,2\n[1,2^\nOne of the following:\n  Expected ','\n  Expected ']'"
//! );
//! ```

pub use crate::diagnostics::{full_report, render_error, ParseFailure};
pub use crate::errors::{LocatedParserError, ParserError};
pub use crate::parser::{run, Either, Parser};
pub use crate::position::{Position, PositionRange};
pub use crate::result::{ParseResult, Status};
pub use crate::stream::{InputStream, InputStreamState, StreamToken};

pub mod cli;
pub mod combinators;
pub mod diagnostics;
pub mod errors;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod position;
pub mod result;
pub mod stream;
pub mod trie;
