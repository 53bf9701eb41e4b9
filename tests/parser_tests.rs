// tests/parser_tests.rs
//
// Behavioural laws of the combinator engine, checked over character streams.

use plait::combinators::{char_, choice, digit, letter, parse_int, string};
use plait::{InputStream, Parser, ParserError, Status};

fn bracketed() -> Parser<char, char> {
    char_('x').between(char_('['), char_(']'))
}

// ---
// Consumption and fatal laws
// ---

#[test]
fn test_or_behaves_like_second_branch_when_first_consumes_nothing() {
    let p = char_('a').or(char_('b'));
    let q = char_('b');
    for input in ["b", "c", ""] {
        let mut left = InputStream::from_text(input);
        let mut right = InputStream::from_text(input);
        let via_or = p.parse(&mut left);
        let alone = q.parse(&mut right);
        assert_eq!(via_or.result, alone.result, "input {input:?}");
        assert_eq!(left.index(), right.index(), "input {input:?}");
    }
}

#[test]
fn test_failure_after_consuming_is_fatal_everywhere() {
    let committed = char_('a').then(char_('b'));
    let wrapped = vec![
        committed.clone().or(char_('a').then(char_('c'))),
        committed.clone().opt().map(|_| ('?', '?')),
        committed.clone().many().map(|_| ('?', '?')),
        committed.clone().label("pair"),
        choice(vec![committed.clone()]),
    ];
    for p in wrapped {
        let mut stream = InputStream::from_text("ac");
        assert_eq!(p.parse(&mut stream).status(), Status::Fatal);
    }
}

#[test]
fn test_or_does_not_backtrack_after_consumption() {
    let p = char_('a').then(bracketed()).map(|_| ()).or(char_('a').then(char_('c')).map(|_| ()));
    let mut stream = InputStream::from_text("ac");
    let outcome = p.parse(&mut stream);
    assert_eq!(outcome.status(), Status::Fatal);
    assert_eq!(outcome.flat_error(), Some(ParserError::expected("'['")));
}

#[test]
fn test_attempt_lets_or_try_the_second_branch() {
    let p = char_('a')
        .then(bracketed())
        .attempt()
        .map(|_| "bracketed")
        .or(char_('a').then(char_('c')).map(|_| "plain"));
    let mut stream = InputStream::from_text("ac");
    let outcome = p.parse(&mut stream);
    assert_eq!(outcome.result, Some("plain"));
    assert_eq!(stream.index(), 2);
    assert_eq!(stream.backtracked().len(), 1);
}

// ---
// Labelling
// ---

#[test]
fn test_labels_nest_without_changing_control_flow() {
    let p = char_('a').label("A").label("B");
    let mut stream = InputStream::from_text("z");
    let outcome = p.parse(&mut stream);
    assert_eq!(outcome.status(), Status::Error);
    assert_eq!(
        outcome.flat_error().unwrap().show(),
        "In B:\n  In A:\n    Expected 'a'"
    );
    assert_eq!(p.parse_text("a").unwrap(), 'a');
}

// ---
// Scenarios
// ---

#[test]
fn test_sep_by_stops_before_unparsed_suffix() {
    let ints = parse_int().sep_by(char_(','));
    let mut stream = InputStream::from_text("2,366,41abc");
    let outcome = ints.parse(&mut stream);
    assert_eq!(outcome.result, Some(vec![2, 366, 41]));
    assert_eq!(stream.remaining().iter().collect::<String>(), "abc");
}

#[test]
fn test_keyword_or_identifier() {
    let word = letter().many1().map(|cs| cs.into_iter().collect::<String>());
    let keyword = string("let").then_ig(letter().not_followed_by("letter")).attempt();
    let token = keyword.map(|k| format!("kw:{k}")).or(word.map(|w| format!("id:{w}")));
    assert_eq!(token.parse_text("let").unwrap(), "kw:let");
    assert_eq!(token.parse_text("letter").unwrap(), "id:letter");
}

#[test]
fn test_user_state_is_restored_on_backtrack() {
    use plait::combinators::{get_user_state, update_user_state};
    let count_digit = digit().then_ig(update_user_state(|n: &mut u32| *n += 1));
    let p = count_digit
        .clone()
        .then(char_('!'))
        .attempt()
        .map(|_| ())
        .or(count_digit.map(|_| ()))
        .ig_then(get_user_state());
    let outcome = p.parse_tokens("7?".chars().collect::<Vec<_>>(), 0u32);
    assert_eq!(outcome.unwrap(), 1);
}

#[test]
fn test_many_over_bytes() {
    use plait::combinators::satisfy;
    let digits = satisfy(|b: &u8| b.is_ascii_digit(), "digit").many1();
    let outcome = digits.parse_tokens(b"123x".to_vec(), ());
    assert_eq!(outcome.unwrap(), b"123".to_vec());
}
