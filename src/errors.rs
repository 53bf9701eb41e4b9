//! Parser error values.
//!
//! Errors fall in two groups. Structural errors (`Failure`, `Expected`,
//! `Unexpected`, `IncorrectNumber`) say what went wrong at one point.
//! Compositional errors (`Labelled`, `EitherOf`, `OneOf`) say how several
//! structural errors relate. `EitherOf` is a transient pair produced while
//! merging; [`ParserError::flatten`] turns it into a `OneOf` before anything is
//! shown to a user.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Indentation applied per nesting level when rendering.
const INDENT: &str = "  ";

// ============================================================================
// PARSER ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParserError {
    /// Free-form failure message.
    Failure(String),
    /// A token or description that would have allowed parsing to continue.
    Expected(String),
    /// A token or description that was found but not allowed.
    Unexpected(String),
    /// A repetition that produced the wrong number of items.
    IncorrectNumber {
        required: usize,
        received: usize,
        context: String,
        inner: Option<Box<ParserError>>,
    },
    /// Human-readable context around a lower-level error. Without an inner
    /// error the label itself is the expectation.
    Labelled {
        label: String,
        inner: Option<Box<ParserError>>,
    },
    /// Exactly two candidate fixes; never shown unflattened.
    EitherOf(Box<ParserError>, Box<ParserError>),
    /// Flattened set of candidate fixes.
    OneOf(Vec<ParserError>),
}

impl ParserError {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn expected(description: impl Into<String>) -> Self {
        Self::Expected(description.into())
    }

    pub fn unexpected(description: impl Into<String>) -> Self {
        Self::Unexpected(description.into())
    }

    pub fn labelled(label: impl Into<String>, inner: Option<ParserError>) -> Self {
        Self::Labelled {
            label: label.into(),
            inner: inner.map(Box::new),
        }
    }

    pub fn incorrect_number(
        required: usize,
        received: usize,
        context: impl Into<String>,
        inner: Option<ParserError>,
    ) -> Self {
        Self::IncorrectNumber {
            required,
            received,
            context: context.into(),
            inner: inner.map(Box::new),
        }
    }

    /// Combines two alternative errors.
    ///
    /// A `OneOf` absorbs the other error by appending, so a long chain of
    /// alternatives stays one level deep instead of nesting once per branch.
    pub fn join_with(self, other: ParserError) -> ParserError {
        match self {
            ParserError::OneOf(mut items) => {
                match other {
                    ParserError::OneOf(more) => items.extend(more),
                    other => items.push(other),
                }
                ParserError::OneOf(items)
            }
            this => ParserError::EitherOf(Box::new(this), Box::new(other)),
        }
    }

    /// Removes every `EitherOf`, collapsing nested alternatives into a single
    /// deduplicated `OneOf`. A `OneOf` left with a single item becomes that item.
    pub fn flatten(self) -> ParserError {
        match self {
            ParserError::EitherOf(..) | ParserError::OneOf(_) => {
                let mut items = Vec::new();
                self.collect_alternatives(&mut items);
                if items.len() == 1 {
                    items.remove(0)
                } else {
                    ParserError::OneOf(items)
                }
            }
            ParserError::Labelled { label, inner } => ParserError::Labelled {
                label,
                inner: inner.map(|e| Box::new(e.flatten())),
            },
            ParserError::IncorrectNumber {
                required,
                received,
                context,
                inner,
            } => ParserError::IncorrectNumber {
                required,
                received,
                context,
                inner: inner.map(|e| Box::new(e.flatten())),
            },
            structural => structural,
        }
    }

    fn collect_alternatives(self, out: &mut Vec<ParserError>) {
        match self {
            ParserError::EitherOf(a, b) => {
                a.collect_alternatives(out);
                b.collect_alternatives(out);
            }
            ParserError::OneOf(items) => {
                for item in items {
                    item.collect_alternatives(out);
                }
            }
            other => {
                let other = other.flatten();
                if !out.contains(&other) {
                    out.push(other);
                }
            }
        }
    }

    /// Renders the error as indented lines, one level per nesting depth.
    pub fn show(&self) -> String {
        let mut lines = Vec::new();
        self.clone().flatten().show_into(0, &mut lines);
        lines.join("\n")
    }

    fn show_into(&self, depth: usize, lines: &mut Vec<String>) {
        let pad = INDENT.repeat(depth);
        match self {
            ParserError::Failure(message) => lines.push(format!("{pad}{message}")),
            ParserError::Expected(what) => lines.push(format!("{pad}Expected {what}")),
            ParserError::Unexpected(what) => lines.push(format!("{pad}Unexpected {what}")),
            ParserError::IncorrectNumber {
                required,
                received,
                context,
                inner,
            } => {
                lines.push(format!(
                    "{pad}Expected {required} {context}, but found {received}"
                ));
                if let Some(inner) = inner {
                    inner.show_into(depth + 1, lines);
                }
            }
            ParserError::Labelled { label, inner: None } => {
                lines.push(format!("{pad}Expected {label}"))
            }
            ParserError::Labelled {
                label,
                inner: Some(inner),
            } => {
                lines.push(format!("{pad}In {label}:"));
                inner.show_into(depth + 1, lines);
            }
            ParserError::EitherOf(a, b) => {
                lines.push(format!("{pad}One of the following:"));
                a.show_into(depth + 1, lines);
                b.show_into(depth + 1, lines);
            }
            ParserError::OneOf(items) => {
                lines.push(format!("{pad}One of the following:"));
                for item in items {
                    item.show_into(depth + 1, lines);
                }
            }
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.show())
    }
}

// ============================================================================
// LOCATED PARSER ERROR
// ============================================================================

/// A [`ParserError`] anchored to a range of stream indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedParserError {
    pub start: usize,
    pub end: usize,
    pub error: ParserError,
}

impl LocatedParserError {
    pub fn new(start: usize, end: usize, error: ParserError) -> Self {
        Self { start, end, error }
    }

    /// A zero-width error at `index`.
    pub fn at(index: usize, error: ParserError) -> Self {
        Self::new(index, index, error)
    }

    /// Whether the failing step consumed input before it failed.
    pub fn consumed(&self) -> bool {
        self.end > self.start
    }

    /// Merges an earlier error `a` with a later error `b`.
    ///
    /// If `b` consumed input it is strictly more informative and replaces `a`.
    /// Otherwise both are kept as alternatives, anchored where `b` failed.
    pub fn merge(a: LocatedParserError, b: LocatedParserError) -> LocatedParserError {
        if b.consumed() {
            return b;
        }
        LocatedParserError {
            start: b.start,
            end: b.end,
            error: a.error.join_with(b.error),
        }
    }

    /// [`LocatedParserError::merge`] lifted over optional errors.
    pub fn merge_opt(
        a: Option<LocatedParserError>,
        b: Option<LocatedParserError>,
    ) -> Option<LocatedParserError> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Self::merge(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    pub fn map_error(self, f: impl FnOnce(ParserError) -> ParserError) -> Self {
        Self {
            error: f(self.error),
            ..self
        }
    }

    /// Same error, re-anchored at `index` with zero width.
    pub fn relocated(self, index: usize) -> Self {
        Self {
            start: index,
            end: index,
            error: self.error,
        }
    }
}

impl fmt::Display for LocatedParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at index {}: {}", self.start, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(s: &str) -> ParserError {
        ParserError::expected(format!("'{s}'"))
    }

    #[test]
    fn join_with_appends_to_one_of_instead_of_nesting() {
        let mut joined = exp("a").join_with(exp("b")).flatten();
        for c in ["c", "d", "e"] {
            joined = joined.join_with(exp(c));
        }
        match joined {
            ParserError::OneOf(items) => assert_eq!(items.len(), 5),
            other => panic!("expected OneOf, got {other:?}"),
        }
    }

    #[test]
    fn flatten_removes_either_of_and_duplicates() {
        let nested = exp("a")
            .join_with(exp("b"))
            .join_with(exp("a").join_with(exp("c")));
        assert_eq!(
            nested.flatten(),
            ParserError::OneOf(vec![exp("a"), exp("b"), exp("c")])
        );
        assert_eq!(exp("a").join_with(exp("a")).flatten(), exp("a"));
    }

    #[test]
    fn show_indents_nested_errors() {
        let error = ParserError::labelled(
            "list",
            Some(ParserError::labelled("item", Some(exp("x").join_with(exp("y"))))),
        );
        assert_eq!(
            error.show(),
            "In list:\n  In item:\n    One of the following:\n      Expected 'x'\n      Expected 'y'"
        );
    }

    #[test]
    fn merge_prefers_consuming_error() {
        let a = LocatedParserError::at(3, exp("a"));
        let consuming = LocatedParserError::new(3, 5, exp("b"));
        assert_eq!(LocatedParserError::merge(a.clone(), consuming.clone()), consuming);

        let b = LocatedParserError::at(3, exp("c"));
        let merged = LocatedParserError::merge(a, b);
        assert_eq!(merged.start, 3);
        assert_eq!(merged.error.flatten(), ParserError::OneOf(vec![exp("a"), exp("c")]));
    }
}
