//! Combinators built purely on the [`Parser`](crate::parser::Parser) contract.
//!
//! Every combinator obeys the same backtracking policy: a branch that failed
//! without consuming input may be replaced by an alternative, a branch that
//! consumed input may not, unless it is wrapped in
//! [`attempt`](crate::parser::Parser::attempt).
//!
//! Sequencing, choice, repetition, optionality and lookahead are methods on
//! `Parser`; constructors that take no parser argument are free functions.

pub mod choice;
pub mod lookahead;
pub mod optional;
pub mod primitives;
pub mod recursive;
pub mod repetition;
pub mod sequence;
pub mod text;

pub use choice::{choice, choice_l};
pub use primitives::{
    any_token, eof, error, fail, get_user_state, preturn, satisfy, token, update_user_state,
};
pub use recursive::{forward, ForwardRef};
pub use text::{
    any_of, char_, digit, identifier, letter, parse_int, spaces, spaces1, string,
};
