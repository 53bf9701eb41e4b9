//! A rule-ordered regular-expression lexer.
//!
//! At each position the rules are tried in the order they were added and the
//! first rule that accepts wins; there is no longest-match arbitration across
//! rules. Put whitespace and newline rules before anything that could also
//! match them, and keywords before identifiers.
//!
//! ```rust
//! use plait::lexer::Lexer;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Kind { Space, Word }
//!
//! let lexer = Lexer::new()
//!     .rule(r"\s+", Kind::Space).unwrap()
//!     .rule(r"\w+", Kind::Word).unwrap();
//! let kinds: Vec<Kind> = lexer.tokenize("hi there").map(|t| t.kind).collect();
//! assert_eq!(kinds, vec![Kind::Word, Kind::Space, Kind::Word]);
//! ```

mod token;

pub use token::Token;

use std::fmt;
use std::rc::Rc;

use miette::Diagnostic;
use regex::Regex;
use thiserror::Error;

use crate::position::{Position, PositionRange};
use crate::trie::OperatorTrie;

/// Receives the position and text of a match and returns the token kind plus
/// how many characters of the match to consume, or `None` to reject.
type Action<K> = Rc<dyn Fn(Position, &str) -> Option<(K, usize)>>;

/// How many characters of a rejected or unmatched input are quoted in errors.
const SNIPPET_CHARS: usize = 16;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum LexError {
    #[error("invalid token pattern `{pattern}`: {source}")]
    #[diagnostic(code(plait::lex::pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no token rule matches at {position}: {snippet:?}")]
    #[diagnostic(code(plait::lex::unmatched))]
    Unmatched { position: Position, snippet: String },
}

// ============================================================================
// RULES
// ============================================================================

/// One lexer rule: an anchored pattern and the action run on its match.
pub struct LexRule<K> {
    regex: Regex,
    action: Action<K>,
}

impl<K> Clone for LexRule<K> {
    fn clone(&self) -> Self {
        Self {
            regex: self.regex.clone(),
            action: Rc::clone(&self.action),
        }
    }
}

impl<K> fmt::Debug for LexRule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexRule")
            .field("pattern", &self.regex.as_str())
            .finish_non_exhaustive()
    }
}

impl<K> LexRule<K> {
    /// Compiles `pattern` so it only matches at the current position.
    pub fn new<F>(pattern: &str, action: F) -> Result<Self, LexError>
    where
        F: Fn(Position, &str) -> Option<(K, usize)> + 'static,
    {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| LexError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            action: Rc::new(action),
        })
    }

    /// Applies the rule at the start of `input`: the token kind and the
    /// consumed prefix of `input`.
    ///
    /// # Panics
    ///
    /// Panics if the action claims more characters than the pattern matched.
    fn apply<'s>(&self, at: Position, input: &'s str) -> Option<(K, &'s str)> {
        let matched = self.regex.find(input)?.as_str();
        if matched.is_empty() {
            return None;
        }
        let (kind, count) = (self.action)(at, matched)?;
        if count == 0 {
            return None;
        }
        let bytes = match matched.char_indices().nth(count) {
            Some((offset, _)) => offset,
            None => {
                let available = matched.chars().count();
                assert!(
                    count <= available,
                    "lexer rule `{}` consumed {} chars of a {}-char match",
                    self.regex.as_str(),
                    count,
                    available
                );
                matched.len()
            }
        };
        Some((kind, &matched[..bytes]))
    }
}

// ============================================================================
// LEXER
// ============================================================================

/// An ordered list of [`LexRule`]s.
pub struct Lexer<K> {
    rules: Vec<LexRule<K>>,
}

impl<K> Clone for Lexer<K> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<K> fmt::Debug for Lexer<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}

impl<K> Default for Lexer<K> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<K: 'static> Lexer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule producing `kind` for the whole match.
    pub fn rule(self, pattern: &str, kind: K) -> Result<Self, LexError>
    where
        K: Clone,
    {
        self.rule_with(pattern, move |_, text| Some((kind.clone(), text.chars().count())))
    }

    /// Adds a rule whose action decides the kind and length, or rejects.
    pub fn rule_with<F>(mut self, pattern: &str, action: F) -> Result<Self, LexError>
    where
        F: Fn(Position, &str) -> Option<(K, usize)> + 'static,
    {
        self.rules.push(LexRule::new(pattern, action)?);
        Ok(self)
    }

    /// Adds a rule reserving the longest of `symbols` at the current position.
    ///
    /// The rule matches a run of characters that occur in some symbol and then
    /// keeps only the longest symbol that prefixes the run; when no symbol
    /// does, the rule rejects and the next one is tried.
    pub fn operator_rule<S, F>(self, symbols: impl IntoIterator<Item = S>, kind: F) -> Result<Self, LexError>
    where
        S: AsRef<str>,
        F: Fn(&str) -> K + 'static,
    {
        let mut trie = OperatorTrie::new();
        let mut chars: Vec<char> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            if symbol.is_empty() {
                continue;
            }
            chars.extend(symbol.chars());
            trie.insert(symbol, symbol.to_string());
        }
        chars.sort_unstable();
        chars.dedup();
        if chars.is_empty() {
            return Ok(self);
        }
        let alternatives: Vec<String> = chars.iter().map(|c| regex::escape(&c.to_string())).collect();
        let pattern = format!("(?:{})+", alternatives.join("|"));
        self.rule_with(&pattern, move |_, run| {
            let (count, symbol) = trie.longest_match(run.chars())?;
            Some((kind(symbol), count))
        })
    }

    pub fn rules(&self) -> &[LexRule<K>] {
        &self.rules
    }

    /// Lazily tokenizes `source`. The iterator stops at the first position no
    /// rule accepts; check [`Tokens::finished`] afterwards.
    pub fn tokenize<'l, 's>(&'l self, source: &'s str) -> Tokens<'l, 's, K> {
        Tokens {
            lexer: self,
            source,
            offset: 0,
            position: Position::start(),
        }
    }

    /// Tokenizes all of `source`, failing if some input is left over.
    pub fn tokenize_all(&self, source: &str) -> Result<Vec<Token<K>>, LexError> {
        let mut tokens = self.tokenize(source);
        let collected: Vec<Token<K>> = tokens.by_ref().collect();
        if tokens.finished() {
            Ok(collected)
        } else {
            Err(LexError::Unmatched {
                position: tokens.position(),
                snippet: tokens.rest().chars().take(SNIPPET_CHARS).collect(),
            })
        }
    }
}

// ============================================================================
// TOKEN ITERATOR
// ============================================================================

/// Lazy token sequence over one source string.
pub struct Tokens<'l, 's, K> {
    lexer: &'l Lexer<K>,
    source: &'s str,
    offset: usize,
    position: Position,
}

impl<'l, 's, K> Tokens<'l, 's, K> {
    /// The input not yet tokenized.
    pub fn rest(&self) -> &'s str {
        &self.source[self.offset..]
    }

    /// Whether the whole source has been tokenized.
    pub fn finished(&self) -> bool {
        self.offset == self.source.len()
    }

    /// Position of the next character to tokenize.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl<'l, 's, K> Iterator for Tokens<'l, 's, K> {
    type Item = Token<K>;

    fn next(&mut self) -> Option<Token<K>> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        let (kind, text) = self
            .lexer
            .rules
            .iter()
            .find_map(|rule| rule.apply(self.position, rest))?;
        let start = self.position;
        self.position = start.advanced_over_text(text);
        self.offset += text.len();
        Some(Token::new(text, PositionRange::new(start, self.position), kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Kind {
        Space,
        Word,
        Op(String),
    }

    fn lexer() -> Lexer<Kind> {
        Lexer::new()
            .rule(r"\s+", Kind::Space)
            .unwrap()
            .rule(r"[A-Za-z]+", Kind::Word)
            .unwrap()
            .operator_rule(["+", "++", "+++", "<=>"], |op| Kind::Op(op.to_string()))
            .unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        let lexer = Lexer::new()
            .rule("if", "keyword")
            .unwrap()
            .rule("[a-z]+", "ident")
            .unwrap();
        let kinds: Vec<&str> = lexer.tokenize("iffy").map(|t| t.kind).collect();
        assert_eq!(kinds, vec!["keyword", "ident"]);
    }

    #[test]
    fn operator_rule_reserves_longest() {
        let ops: Vec<Kind> = lexer().tokenize("+++++").map(|t| t.kind).collect();
        assert_eq!(ops, vec![Kind::Op("+++".into()), Kind::Op("++".into())]);
    }

    #[test]
    fn operator_rule_rejects_unknown_prefix() {
        let lexer = lexer();
        let mut tokens = lexer.tokenize("a <= b");
        assert_eq!(tokens.by_ref().count(), 2);
        assert!(!tokens.finished());
        assert_eq!(tokens.rest(), "<= b");
        assert_eq!(tokens.position().column(), 3);
    }

    #[test]
    fn tokens_carry_ranges() {
        let tokens = lexer().tokenize_all("ab\n cd").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].content, "cd");
        assert_eq!(tokens[2].range.start.line, 2);
        assert_eq!(tokens[2].range.start.column(), 2);
        assert_eq!(tokens[2].range.end.index, 6);
    }

    #[test]
    fn tokenize_all_reports_leftover() {
        let error = lexer().tokenize_all("ab $x").unwrap_err();
        match error {
            LexError::Unmatched { position, snippet } => {
                assert_eq!(position.column(), 4);
                assert_eq!(snippet, "$x");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn action_may_shorten_match() {
        let lexer = Lexer::new()
            .rule_with("[0-9]+", |_, text| Some(((), text.len().min(2))))
            .unwrap();
        let parts: Vec<String> = lexer.tokenize("12345").map(|t| t.content).collect();
        assert_eq!(parts, vec!["12", "34", "5"]);
    }

    #[test]
    #[should_panic(expected = "consumed 5 chars")]
    fn action_cannot_overconsume() {
        let lexer = Lexer::new().rule_with("a", |_, _| Some(((), 5))).unwrap();
        let _ = lexer.tokenize("aaa").count();
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(matches!(
            Lexer::<()>::new().rule("(", ()),
            Err(LexError::InvalidPattern { .. })
        ));
    }
}
