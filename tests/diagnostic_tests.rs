//! Golden master tests for diagnostic output.
//!
//! These tests capture the exact rendering of parse failures so the format
//! stays stable across changes.

use plait::combinators::{char_, choice_l, digit, parse_int, satisfy, spaces, string};
use plait::lexer::{Lexer, Token};
use plait::{full_report, render_error, InputStream, LocatedParserError, Parser, ParserError};

#[test]
fn test_expected_char_rendering() {
    let p = char_('a').then(char_('x').between(char_('['), char_(']')));
    let failure = p.parse_text("ac").unwrap_err();

    let expected = "Error at Line 1, Col 2:
ac
a^
Expected '['";

    assert_eq!(failure.to_string(), expected);
}

#[test]
fn test_latent_alternatives_are_listed() {
    let inner = char_('A').then_ig(char_(',').then(char_('B')).optional());
    let group = inner.between(char_('('), char_(')'));
    let failure = group.parse_text("(A]").unwrap_err();

    let expected = "Error at Line 1, Col 3:
(A]
(A^
One of the following:
  Expected ','
  Expected ')'";

    assert_eq!(failure.to_string(), expected);
}

#[test]
fn test_error_on_later_line() {
    let line = string("ok").then_ig(char_('\n'));
    let p = line.many().then(string("ok"));
    let failure = p.parse_text("ok\nok\nno").unwrap_err();

    // The loop and the final item both expect "ok"; the duplicate collapses.
    let expected = "Error at Line 3, Col 1:
no
^
Expected \"ok\"";

    assert_eq!(failure.to_string(), expected);
}

#[test]
fn test_nested_labels_are_indented() {
    let number = parse_int();
    let pair = number
        .clone()
        .then_ig(char_(','))
        .then(number)
        .label("pair");
    let failure = pair.label("record").parse_text("12;").unwrap_err();

    let expected = "Error at Line 1, Col 3:
12;
12^
In record:
  In pair:
    Expected ','";

    assert_eq!(failure.to_string(), expected);
}

#[test]
fn test_choice_with_label_reports_single_expectation() {
    let sign = choice_l(vec![char_('+'), char_('-')], "sign");
    let failure = spaces().ig_then(sign).parse_text("  *").unwrap_err();

    let expected = "Error at Line 1, Col 3:
  *
  ^
Expected sign";

    assert_eq!(failure.to_string(), expected);
}

#[test]
fn test_full_report_lists_backtracked_errors() {
    let date = digit().repeat_exactly(4).then_ig(char_('-')).attempt();
    let p = date.map(|_| "date").or(digit().many1().map(|_| "number")).then_ig(char_(';'));
    let failure = p.parse_text("12x").unwrap_err();

    let expected = "Error at Line 1, Col 3:
12x
12^
One of the following:
  Expected digit
  Expected ';'

The parser backtracked after the following error:
Error at Line 1, Col 3:
12x
12^
Expected 4 items, but found 2
  Expected digit";

    assert_eq!(failure.report(), expected);
}

#[test]
fn test_render_error_for_token_streams_uses_text_columns() {
    #[derive(Debug, Clone, PartialEq)]
    enum Kind {
        Word,
        Space,
    }
    let lexer = Lexer::new()
        .rule(r"[a-z]+", Kind::Word)
        .unwrap()
        .rule(r" +", Kind::Space)
        .unwrap();
    let tokens = lexer.tokenize_all("alpha  beta").unwrap();
    let stream = InputStream::new(tokens, ());
    let error = LocatedParserError::at(2, ParserError::unexpected("'beta'"));

    assert_eq!(
        render_error(&stream, &error),
        "Error at Line 1, Col 8:\nalpha  beta\nalpha  ^\nUnexpected 'beta'"
    );
    assert_eq!(full_report(&stream, &error), render_error(&stream, &error));
}

#[test]
fn test_parse_failure_is_a_miette_diagnostic() {
    use miette::Diagnostic;

    let p: Parser<char, char> = char_('a');
    let failure = p.parse_text("b").unwrap_err();
    let labels: Vec<_> = failure.labels().unwrap().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].label(), Some("Expected 'a'"));
    assert_eq!(labels[0].offset(), 0);
    assert!(failure.source_code().is_some());
}

#[test]
fn test_multi_line_token_advances_the_line() {
    #[derive(Debug, Clone, PartialEq)]
    enum Kind {
        Blank,
        Word,
    }
    let lexer = Lexer::new()
        .rule(r"\s+", Kind::Blank)
        .unwrap()
        .rule(r"[a-z]+", Kind::Word)
        .unwrap();
    let tokens = lexer.tokenize_all("a\n  b c").unwrap();
    assert_eq!(tokens[1].content, "\n  ");
    assert_eq!(tokens[4].range.start.line, 2);

    let word = |text: &'static str| {
        satisfy(move |t: &Token<Kind>| t.content == text, format!("'{text}'"))
    };
    let blank = || satisfy(|t: &Token<Kind>| t.kind == Kind::Blank, "blank");
    let p: Parser<Token<Kind>, _> = word("a")
        .then(blank())
        .then(word("b"))
        .then(blank())
        .then(word("x"));
    let failure = p.parse_tokens(tokens, ()).unwrap_err();

    let expected = "Error at Line 2, Col 5:
  b c
  b ^
Expected 'x'";

    assert_eq!(failure.to_string(), expected);
    assert_eq!(failure.position().line, 2);
}
