//! Declarative operator-precedence expressions.
//!
//! An [`OperatorTable`] lists prefix, postfix and infix operators with their
//! priorities; [`OperatorTable::build`] turns it and a term parser into one
//! expression parser. Higher priorities bind tighter.
//!
//! ```rust
//! use plait::combinators::parse_int;
//! use plait::operators::{Associativity, OperatorTable};
//!
//! let expr = OperatorTable::<char, i64>::new()
//!     .infix("+", Associativity::Left, 6, |a, b| a + b).unwrap()
//!     .infix("*", Associativity::Left, 8, |a, b| a * b).unwrap()
//!     .prefix("-", 10, |a| -a).unwrap()
//!     .build(parse_int());
//! assert_eq!(expr.parse_text("2+3*-4").unwrap(), -10);
//! ```
//!
//! Two operators of the same priority but different associativity in one
//! chain are rejected rather than silently grouped, as is a chain of two
//! non-associative operators of the same priority.

mod climb;

use std::fmt;
use std::rc::Rc;

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::Parser;
use crate::stream::{InputStream, StreamToken};
use crate::trie::OperatorTrie;

// ============================================================================
// OPERATOR DESCRIPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    /// `a op b op c` is an error.
    None,
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Associativity::Left => "left-associative",
            Associativity::Right => "right-associative",
            Associativity::None => "non-associative",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Prefix,
    Postfix,
    Infix,
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fixity::Prefix => "prefix",
            Fixity::Postfix => "postfix",
            Fixity::Infix => "infix",
        })
    }
}

/// One registered operator. `F` is the node builder: `dyn Fn(R) -> R` for
/// prefix and postfix operators, `dyn Fn(R, R) -> R` for infix ones.
pub struct Operator<F: ?Sized> {
    pub text: String,
    pub priority: u32,
    pub associativity: Associativity,
    build: Rc<F>,
}

impl<F: ?Sized> Clone for Operator<F> {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            priority: self.priority,
            associativity: self.associativity,
            build: Rc::clone(&self.build),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Operator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("text", &self.text)
            .field("priority", &self.priority)
            .field("associativity", &self.associativity)
            .finish_non_exhaustive()
    }
}

pub type UnaryOperator<R> = Operator<dyn Fn(R) -> R>;
pub type InfixOperator<R> = Operator<dyn Fn(R, R) -> R>;

/// Which operators share one text; indices into the table's lists.
#[derive(Debug, Clone, Copy, Default)]
struct Slots {
    prefix: Option<usize>,
    postfix: Option<usize>,
    infix: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum TableError {
    #[error("operator text must not be empty")]
    #[diagnostic(code(plait::operators::empty))]
    EmptyText,

    #[error("{fixity} operator `{text}` is defined twice")]
    #[diagnostic(code(plait::operators::duplicate))]
    Duplicate { text: String, fixity: Fixity },

    #[error("operator `{text}` cannot be both infix and postfix")]
    #[diagnostic(
        code(plait::operators::infix_postfix),
        help("after a term the parser could not tell which of the two was meant")
    )]
    InfixPostfixClash { text: String },
}

// ============================================================================
// OPERATOR TABLE
// ============================================================================

/// Builder for an operator-precedence expression parser.
#[derive(Debug)]
pub struct OperatorTable<T, R, U = ()> {
    prefix: Vec<UnaryOperator<R>>,
    postfix: Vec<UnaryOperator<R>>,
    infix: Vec<InfixOperator<R>>,
    trie: OperatorTrie<Slots>,
    whitespace: Option<Parser<T, (), U>>,
}

impl<T, R, U> Default for OperatorTable<T, R, U> {
    fn default() -> Self {
        Self {
            prefix: Vec::new(),
            postfix: Vec::new(),
            infix: Vec::new(),
            trie: OperatorTrie::new(),
            whitespace: None,
        }
    }
}

impl<T, R, U> OperatorTable<T, R, U>
where
    T: StreamToken + 'static,
    R: 'static,
    U: Clone + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix<F>(mut self, text: &str, priority: u32, build: F) -> Result<Self, TableError>
    where
        F: Fn(R) -> R + 'static,
    {
        let index = self.prefix.len();
        self.reserve(text, Fixity::Prefix, index)?;
        self.prefix.push(Operator {
            text: text.to_string(),
            priority,
            associativity: Associativity::None,
            build: Rc::new(build),
        });
        Ok(self)
    }

    pub fn postfix<F>(mut self, text: &str, priority: u32, build: F) -> Result<Self, TableError>
    where
        F: Fn(R) -> R + 'static,
    {
        let index = self.postfix.len();
        self.reserve(text, Fixity::Postfix, index)?;
        self.postfix.push(Operator {
            text: text.to_string(),
            priority,
            associativity: Associativity::None,
            build: Rc::new(build),
        });
        Ok(self)
    }

    pub fn infix<F>(
        mut self,
        text: &str,
        associativity: Associativity,
        priority: u32,
        build: F,
    ) -> Result<Self, TableError>
    where
        F: Fn(R, R) -> R + 'static,
    {
        let index = self.infix.len();
        self.reserve(text, Fixity::Infix, index)?;
        self.infix.push(Operator {
            text: text.to_string(),
            priority,
            associativity,
            build: Rc::new(build),
        });
        Ok(self)
    }

    /// Skips `whitespace` after every operator and after every operand.
    pub fn whitespace(mut self, whitespace: Parser<T, (), U>) -> Self {
        self.whitespace = Some(whitespace);
        self
    }

    /// The expression parser over `term`.
    pub fn build(self, term: Parser<T, R, U>) -> Parser<T, R, U> {
        let table = Rc::new(self);
        Parser::new(move |stream| climb::Climber::new(&table, &term).expression(stream, 0, None))
    }

    fn reserve(&mut self, text: &str, fixity: Fixity, index: usize) -> Result<(), TableError> {
        if text.is_empty() {
            return Err(TableError::EmptyText);
        }
        let mut slots = self.trie.get(text).copied().unwrap_or_default();
        let slot = match fixity {
            Fixity::Prefix => &mut slots.prefix,
            Fixity::Postfix => &mut slots.postfix,
            Fixity::Infix => &mut slots.infix,
        };
        if slot.is_some() {
            return Err(TableError::Duplicate {
                text: text.to_string(),
                fixity,
            });
        }
        *slot = Some(index);
        if slots.infix.is_some() && slots.postfix.is_some() {
            return Err(TableError::InfixPostfixClash {
                text: text.to_string(),
            });
        }
        self.trie.insert(text, slots);
        Ok(())
    }

    /// The longest operator whose text is spelled by the next whole tokens,
    /// as the number of tokens it spans and its slots.
    fn lookup(&self, stream: &InputStream<T, U>) -> Option<(usize, Slots)> {
        let mut text = String::new();
        let mut best = None;
        for (count, token) in stream.remaining().iter().enumerate() {
            token.write_text(&mut text);
            if let Some(slots) = self.trie.get(&text) {
                best = Some((count + 1, *slots));
            }
            if !self.trie.has_prefix(&text) {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OperatorTable<char, i64> {
        OperatorTable::new()
    }

    #[test]
    fn same_text_may_be_prefix_and_infix() {
        assert!(table()
            .prefix("-", 10, |a| -a)
            .and_then(|t| t.infix("-", Associativity::Left, 6, |a, b| a - b))
            .is_ok());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let error = table()
            .infix("+", Associativity::Left, 6, |a, b| a + b)
            .and_then(|t| t.infix("+", Associativity::Right, 7, |a, b| a + b))
            .err();
        assert_eq!(
            error,
            Some(TableError::Duplicate {
                text: "+".into(),
                fixity: Fixity::Infix
            })
        );
    }

    #[test]
    fn infix_and_postfix_clash() {
        let error = table()
            .postfix("!", 12, |a| a)
            .and_then(|t| t.infix("!", Associativity::Left, 6, |a, _| a))
            .err();
        assert_eq!(error, Some(TableError::InfixPostfixClash { text: "!".into() }));
        assert_eq!(table().prefix("", 1, |a| a).err(), Some(TableError::EmptyText));
    }

    #[test]
    fn lookup_prefers_longest_operator() {
        let table = table()
            .infix("+", Associativity::Left, 6, |a, b| a + b)
            .and_then(|t| t.postfix("++", 12, |a| a + 1))
            .and_then(|t| t.infix("+++", Associativity::Left, 4, |a, b| a + b))
            .unwrap();
        let stream = InputStream::from_text("+++1");
        let (width, slots) = table.lookup(&stream).unwrap();
        assert_eq!(width, 3);
        assert_eq!(slots.infix, Some(1));

        let stream = InputStream::from_text("++1");
        let (width, slots) = table.lookup(&stream).unwrap();
        assert_eq!(width, 2);
        assert_eq!(slots.postfix, Some(0));
    }
}
