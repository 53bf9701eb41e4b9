//! The mutable cursor every parser is threaded through.
//!
//! An [`InputStream`] is created once per top-level parse and is mutated in
//! place for the duration of that parse. Backtracking never copies the stream:
//! combinators capture an [`InputStreamState`] snapshot and hand it back to
//! [`InputStream::rollback`] when a branch has to be abandoned.

use crate::errors::{LocatedParserError, ParserError};
use crate::position::Position;

// ============================================================================
// STREAM TOKENS
// ============================================================================

/// What the engine needs to know about a token type.
///
/// Nothing here depends on a character set: a token only reports how many
/// line breaks it contains, how to describe it in a diagnostic, and how it
/// reads back as source text when a diagnostic reproduces the failing line.
pub trait StreamToken: Clone {
    /// Number of line breaks inside this token.
    fn line_breaks(&self) -> usize;

    /// Whether a line break occurs anywhere inside this token.
    fn is_line_break(&self) -> bool {
        self.line_breaks() > 0
    }

    /// Short human-readable description used in `Expected`/`Unexpected` errors.
    fn describe(&self) -> String;

    /// Appends this token's source text to `out`.
    fn write_text(&self, out: &mut String);
}

impl StreamToken for char {
    fn line_breaks(&self) -> usize {
        usize::from(*self == '\n')
    }

    fn describe(&self) -> String {
        match self {
            '\n' => "newline".to_string(),
            '\t' => "tab".to_string(),
            c => format!("'{}'", c),
        }
    }

    fn write_text(&self, out: &mut String) {
        out.push(*self);
    }
}

/// Bytes are not decoded: ASCII reads back as itself, any other byte as a
/// `\xNN` escape, so rendered lines stay valid text with aligned markers.
impl StreamToken for u8 {
    fn line_breaks(&self) -> usize {
        usize::from(*self == b'\n')
    }

    fn describe(&self) -> String {
        if self.is_ascii_graphic() {
            format!("'{}'", *self as char)
        } else {
            format!("byte 0x{:02x}", self)
        }
    }

    fn write_text(&self, out: &mut String) {
        if self.is_ascii() {
            out.push(*self as char);
        } else {
            out.push_str(&format!("\\x{:02x}", self));
        }
    }
}

// ============================================================================
// STREAM STATE
// ============================================================================

/// Everything needed to rewind a stream.
///
/// `U` is an opaque user-defined side state carried along with the cursor; it
/// is restored together with the index on rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputStreamState<U = ()> {
    pub index: usize,
    pub position: Position,
    pub user_state: U,
}

// ============================================================================
// INPUT STREAM
// ============================================================================

/// A cursor over a token array plus a log of errors discarded by backtracking.
#[derive(Debug, Clone)]
pub struct InputStream<T, U = ()> {
    tokens: Vec<T>,
    state: InputStreamState<U>,
    backtracked: Vec<LocatedParserError>,
}

impl InputStream<char, ()> {
    /// Builds a character stream over `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().collect::<Vec<_>>(), ())
    }
}

impl<T: StreamToken, U: Clone> InputStream<T, U> {
    pub fn new(tokens: impl Into<Vec<T>>, user_state: U) -> Self {
        Self {
            tokens: tokens.into(),
            state: InputStreamState {
                index: 0,
                position: Position::start(),
                user_state,
            },
            backtracked: Vec::new(),
        }
    }

    // ---- cursor -------------------------------------------------------------

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.state.index >= self.tokens.len()
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn peek(&self) -> Option<&T> {
        self.tokens.get(self.state.index)
    }

    /// Looks `offset` tokens past the cursor without moving it.
    pub fn peek_at(&self, offset: usize) -> Option<&T> {
        self.tokens.get(self.state.index + offset)
    }

    /// The unconsumed tokens.
    pub fn remaining(&self) -> &[T] {
        &self.tokens[self.state.index.min(self.tokens.len())..]
    }

    /// Advances the cursor by `n` tokens, re-deriving the position over exactly
    /// the consumed slice.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` tokens remain. Parsers are expected to check
    /// what they consume; stepping past the end is a bug in the grammar.
    pub fn step(&mut self, n: usize) {
        let from = self.state.index;
        let to = from + n;
        assert!(
            to <= self.tokens.len(),
            "InputStream::step({}) at index {} would pass the end of a {}-token stream",
            n,
            from,
            self.tokens.len()
        );
        self.state.position = self.state.position.advanced(&self.tokens[from..to]);
        self.state.index = to;
    }

    /// Returns the next token and steps over it.
    pub fn advance(&mut self) -> Option<T> {
        let token = self.peek()?.clone();
        self.step(1);
        Some(token)
    }

    // ---- snapshots ----------------------------------------------------------

    pub fn state(&self) -> InputStreamState<U> {
        self.state.clone()
    }

    /// Restores `state`; a supplied error is appended to the backtrack log.
    pub fn rollback(&mut self, state: InputStreamState<U>, error: Option<LocatedParserError>) {
        if let Some(error) = error {
            self.backtracked.push(error);
        }
        self.state = state;
    }

    /// Restores `state` without recording anything.
    pub fn rollback_fast(&mut self, state: InputStreamState<U>) {
        self.state = state;
    }

    /// Errors discarded by backtracking, oldest first.
    pub fn backtracked(&self) -> &[LocatedParserError] {
        &self.backtracked
    }

    pub fn clear_backtracked(&mut self) {
        self.backtracked.clear();
    }

    /// Attaches the current index to a bare error.
    pub fn make_error(&self, error: ParserError) -> LocatedParserError {
        LocatedParserError::at(self.state.index, error)
    }

    // ---- user state ---------------------------------------------------------

    pub fn user_state(&self) -> &U {
        &self.state.user_state
    }

    pub fn user_state_mut(&mut self) -> &mut U {
        &mut self.state.user_state
    }

    pub fn set_user_state(&mut self, user_state: U) {
        self.state.user_state = user_state;
    }

    // ---- source reconstruction (diagnostics only) ---------------------------

    /// Recomputes the position of `index` from the start of the stream. Only
    /// diagnostics use this; parsing always steps incrementally.
    pub fn position_at(&self, index: usize) -> Position {
        let end = index.min(self.tokens.len());
        let mut position = Position::start().advanced(&self.tokens[..end]);
        // Indices past the end still get a column so end-of-input errors render.
        position.index += index - end;
        position
    }

    /// Source text of the tokens in `start..end`.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len());
        let start = start.min(end);
        let mut out = String::new();
        for token in &self.tokens[start..end] {
            token.write_text(&mut out);
        }
        out
    }

    /// Source text of the whole line containing `position`, without its line
    /// breaks. A token spanning a line break contributes only its part on this
    /// line.
    pub fn line_text(&self, position: Position) -> String {
        let start = position.line_start.min(self.tokens.len());
        let mut line = self.line_lead_at(start);
        match self.tokens[start..].iter().position(StreamToken::is_line_break) {
            Some(offset) => {
                line.push_str(&self.text_between(start, start + offset));
                line.push_str(&text_before_break(&self.tokens[start + offset]));
            }
            None => line.push_str(&self.text_between(start, self.tokens.len())),
        }
        if line.ends_with('\r') {
            line.pop();
        }
        line
    }

    /// Source text of the line containing `position`, from the line's start
    /// up to `position`.
    pub fn line_lead(&self, position: Position) -> String {
        let mut lead = self.line_lead_at(position.line_start);
        lead.push_str(&self.text_between(position.line_start, position.index));
        lead
    }

    /// The tail of the line-breaking token just before `line_start`.
    fn line_lead_at(&self, line_start: usize) -> String {
        match line_start.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) if token.is_line_break() => text_after_break(token),
            _ => String::new(),
        }
    }
}

fn token_text<T: StreamToken>(token: &T) -> String {
    let mut text = String::new();
    token.write_text(&mut text);
    text
}

fn text_after_break<T: StreamToken>(token: &T) -> String {
    let text = token_text(token);
    match text.rfind('\n') {
        Some(at) => text[at + 1..].to_string(),
        None => String::new(),
    }
}

fn text_before_break<T: StreamToken>(token: &T) -> String {
    let mut text = token_text(token);
    text.truncate(text.find('\n').unwrap_or(text.len()));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_derives_position_from_consumed_slice() {
        let mut stream = InputStream::from_text("ab\ncd");
        stream.step(4);
        assert_eq!(stream.index(), 4);
        assert_eq!(stream.position().line, 2);
        assert_eq!(stream.position().column(), 2);
        assert_eq!(stream.peek(), Some(&'d'));
    }

    #[test]
    #[should_panic(expected = "would pass the end")]
    fn stepping_past_the_end_panics() {
        let mut stream = InputStream::from_text("ab");
        stream.step(3);
    }

    #[test]
    fn rollback_restores_state_and_logs_error() {
        let mut stream = InputStream::new(vec!['x', 'y', 'z'], 7u32);
        let saved = stream.state();
        stream.step(2);
        *stream.user_state_mut() += 1;

        let error = stream.make_error(ParserError::Failure("boom".into()));
        stream.rollback(saved, Some(error.clone()));

        assert_eq!(stream.index(), 0);
        assert_eq!(*stream.user_state(), 7);
        assert_eq!(stream.backtracked(), &[error]);

        stream.step(1);
        stream.rollback_fast(saved);
        assert_eq!(stream.index(), 0);
        assert_eq!(stream.backtracked().len(), 1);
    }

    #[test]
    fn line_text_reproduces_the_failing_line() {
        let stream = InputStream::from_text("first\r\nsecond\nthird");
        let pos = stream.position_at(9);
        assert_eq!(pos.line, 2);
        assert_eq!(stream.line_text(pos), "second");
        assert_eq!(stream.text_between(pos.line_start, pos.index), "se");
    }

    #[test]
    fn non_ascii_bytes_read_back_escaped() {
        let stream = InputStream::new("é=1".as_bytes().to_vec(), ());
        let pos = stream.position_at(3);
        assert_eq!(stream.line_text(pos), "\\xc3\\xa9=1");
        assert_eq!(stream.line_lead(pos), "\\xc3\\xa9=");
    }
}
