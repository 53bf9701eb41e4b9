//! Forward references for self-referential grammars.
//!
//! A parser that mentions itself (a term containing a parenthesised
//! expression, say) cannot be built by literal self-reference. Instead
//! [`forward`] hands out a parser that calls through a one-slot cell, and the
//! cell is filled once the real parser exists.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::parser::Parser;
use crate::stream::StreamToken;

/// The setter half of a [`forward`] pair.
pub struct ForwardRef<T, R, U = ()> {
    cell: Rc<OnceCell<Parser<T, R, U>>>,
}

impl<T, R, U> Clone for ForwardRef<T, R, U> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T, R, U> ForwardRef<T, R, U> {
    /// Closes the recursive knot.
    ///
    /// # Panics
    ///
    /// Panics if the reference was already set.
    pub fn set(&self, parser: Parser<T, R, U>) {
        if self.cell.set(parser).is_err() {
            panic!("forward parser defined twice");
        }
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Returns a parser that delegates to whatever is later [`ForwardRef::set`].
///
/// Running the parser before it has been set panics: that is a mistake in the
/// grammar definition, not in the input.
///
/// The returned parser owns the cell strongly, so the grammar keeps working
/// after the [`ForwardRef`] is dropped. Once set, the cell and the parser it
/// holds form an `Rc` cycle, and a recursive grammar lives until the end of
/// the program. Build recursive grammars once and reuse them rather than
/// rebuilding them per input.
pub fn forward<T, R, U>() -> (Parser<T, R, U>, ForwardRef<T, R, U>)
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    let cell: Rc<OnceCell<Parser<T, R, U>>> = Rc::new(OnceCell::new());
    let target = Rc::clone(&cell);
    let parser = Parser::new(move |stream| match target.get() {
        Some(parser) => parser.parse(stream),
        None => panic!("forward parser used before it was defined"),
    });
    (parser, ForwardRef { cell })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{char_, parse_int};

    #[test]
    fn nested_parentheses() {
        let (expr, expr_ref) = forward::<char, i64, ()>();
        let parenthesised = expr.clone().between(char_('('), char_(')')).map(|n| n + 1);
        expr_ref.set(parse_int().or(parenthesised));

        assert_eq!(expr.parse_text("5").unwrap(), 5);
        assert_eq!(expr.parse_text("((5))").unwrap(), 7);
        assert!(expr.parse_text("((5)").is_err());
    }

    #[test]
    fn grammar_outlives_its_forward_ref() {
        let expr = {
            let (expr, expr_ref) = forward::<char, i64, ()>();
            let parenthesised = expr.clone().between(char_('('), char_(')'));
            expr_ref.set(parse_int().or(parenthesised));
            assert!(expr_ref.is_set());
            expr
        };
        assert_eq!(expr.parse_text("((3))").unwrap(), 3);
    }

    #[test]
    #[should_panic(expected = "defined twice")]
    fn setting_twice_panics() {
        let (_, handle) = forward::<char, i64, ()>();
        handle.set(parse_int());
        handle.set(parse_int());
    }
}
