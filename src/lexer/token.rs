//! Tokens produced by the lexer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::position::PositionRange;
use crate::stream::StreamToken;

/// A lexeme, where it came from, and what it is.
///
/// Tokens are stream tokens in their own right, so a second-stage parser runs
/// over a `Vec<Token<K>>` with the same combinators used on characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token<K> {
    pub content: String,
    pub range: PositionRange,
    pub kind: K,
}

impl<K> Token<K> {
    pub fn new(content: impl Into<String>, range: PositionRange, kind: K) -> Self {
        Self {
            content: content.into(),
            range,
            kind,
        }
    }

    /// Whether the token is of `kind`.
    pub fn is(&self, kind: &K) -> bool
    where
        K: PartialEq,
    {
        self.kind == *kind
    }
}

impl<K: Clone> StreamToken for Token<K> {
    fn line_breaks(&self) -> usize {
        self.content.matches('\n').count()
    }

    fn describe(&self) -> String {
        match self.content.as_str() {
            "\n" | "\r\n" => "newline".to_string(),
            content => format!("'{}'", content),
        }
    }

    fn write_text(&self, out: &mut String) {
        out.push_str(&self.content);
    }
}

impl<K: fmt::Debug> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} at {}", self.kind, self.content, self.range)
    }
}
