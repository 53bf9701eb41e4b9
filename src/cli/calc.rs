//! The arithmetic language behind the `plait` binary.
//!
//! Source text is tokenized by a [`Lexer`], and the token stream is parsed
//! by an [`OperatorTable`] over a small term grammar:
//!
//! | operator | fixity  | associativity | priority |
//! |----------|---------|---------------|----------|
//! | `+` `-`  | infix   | left          | 6        |
//! | `*` `/` `%` | infix | left         | 8        |
//! | `-`      | prefix  |               | 9        |
//! | `^`      | infix   | right         | 10       |
//! | `!`      | postfix |               | 12       |

use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::combinators::{choice, eof, error, forward, preturn, satisfy};
use crate::diagnostics::ParseFailure;
use crate::lexer::{LexError, Lexer, Token};
use crate::operators::{Associativity, OperatorTable, TableError};
use crate::parser::Parser;

/// Largest argument whose factorial is a finite `f64`.
const MAX_FACTORIAL: f64 = 170.0;

const OPERATORS: [&str; 7] = ["+", "-", "*", "/", "%", "^", "!"];

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Newline,
    Space,
    Number,
    Ident,
    Paren,
    Op,
}

impl Kind {
    fn is_blank(self) -> bool {
        matches!(self, Kind::Newline | Kind::Space)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Newline => "newline",
            Kind::Space => "space",
            Kind::Number => "number",
            Kind::Ident => "ident",
            Kind::Paren => "paren",
            Kind::Op => "op",
        })
    }
}

/// Rule order matters: newlines are split from other blanks so they are
/// listed as tokens of their own.
pub fn lexer() -> Result<Lexer<Kind>, LexError> {
    Lexer::new()
        .rule(r"\r?\n", Kind::Newline)?
        .rule(r"[ \t\r]+", Kind::Space)?
        .rule(r"[0-9]+(?:\.[0-9]+)?", Kind::Number)?
        .rule(r"[A-Za-z_][A-Za-z0-9_]*", Kind::Ident)?
        .rule(r"[()]", Kind::Paren)?
        .operator_rule(OPERATORS, |_| Kind::Op)
}

pub fn tokenize(source: &str) -> Result<Vec<Token<Kind>>, CalcError> {
    Ok(lexer()?.tokenize_all(source)?)
}

/// `kind:content`, or just the kind for blanks.
pub fn describe_token(token: &Token<Kind>) -> String {
    if token.kind.is_blank() {
        token.kind.to_string()
    } else {
        format!("{}:{}", token.kind, token.content)
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Expr {
    Number { value: f64 },
    Variable { name: String },
    Prefix { op: String, operand: Box<Expr> },
    Postfix { op: String, operand: Box<Expr> },
    Binary { op: String, lhs: Box<Expr>, rhs: Box<Expr> },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number { value } => write!(f, "{value}"),
            Expr::Variable { name } => f.write_str(name),
            Expr::Prefix { op, operand } => write!(f, "({op}{operand})"),
            Expr::Postfix { op, operand } => write!(f, "({operand}{op})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs}{op}{rhs})"),
        }
    }
}

type TokenParser<R> = Parser<Token<Kind>, R>;

fn of_kind(kind: Kind, description: &str) -> TokenParser<Token<Kind>> {
    satisfy(move |token: &Token<Kind>| token.kind == kind, description)
}

fn symbol(text: &'static str) -> TokenParser<Token<Kind>> {
    satisfy(move |token: &Token<Kind>| token.content == text, format!("'{text}'"))
}

fn blanks() -> TokenParser<()> {
    satisfy(|token: &Token<Kind>| token.kind.is_blank(), "whitespace").skip_many()
}

fn prefix(op: &'static str) -> impl Fn(Expr) -> Expr {
    move |operand| Expr::Prefix {
        op: op.to_string(),
        operand: Box::new(operand),
    }
}

fn postfix(op: &'static str) -> impl Fn(Expr) -> Expr {
    move |operand| Expr::Postfix {
        op: op.to_string(),
        operand: Box::new(operand),
    }
}

fn binary(op: &'static str) -> impl Fn(Expr, Expr) -> Expr {
    move |lhs, rhs| Expr::Binary {
        op: op.to_string(),
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// The whole-input expression parser over calculator tokens.
pub fn grammar() -> Result<TokenParser<Expr>, TableError> {
    let (expr, expr_ref) = forward();

    let number = of_kind(Kind::Number, "number").and_then(|token| match token.content.parse::<f64>() {
        Ok(value) => preturn(Expr::Number { value }),
        Err(_) => error(format!("invalid number {}", token.content)),
    });
    let variable = of_kind(Kind::Ident, "identifier").map(|token| Expr::Variable { name: token.content });
    let parenthesised = expr.clone().between(symbol("(").then_ig(blanks()), symbol(")"));

    let table = OperatorTable::new()
        .infix("+", Associativity::Left, 6, binary("+"))?
        .infix("-", Associativity::Left, 6, binary("-"))?
        .infix("*", Associativity::Left, 8, binary("*"))?
        .infix("/", Associativity::Left, 8, binary("/"))?
        .infix("%", Associativity::Left, 8, binary("%"))?
        .prefix("-", 9, prefix("-"))?
        .infix("^", Associativity::Right, 10, binary("^"))?
        .postfix("!", 12, postfix("!"))?
        .whitespace(blanks());
    expr_ref.set(table.build(choice(vec![number, variable, parenthesised])));

    Ok(blanks().ig_then(expr).then_ig(eof()))
}

pub fn parse(source: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(source)?;
    Ok(grammar()?.parse_tokens(tokens, ())?)
}

// ============================================================================
// EVALUATION
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum CalcError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseFailure),

    #[error("unknown variable `{0}`")]
    #[diagnostic(
        code(plait::eval::unknown_variable),
        help("the known constants are `pi` and `e`")
    )]
    UnknownVariable(String),

    #[error("division by zero")]
    #[diagnostic(code(plait::eval::division_by_zero))]
    DivisionByZero,

    #[error("factorial of {0} is undefined")]
    #[diagnostic(
        code(plait::eval::factorial),
        help("factorials are defined for whole numbers from 0 to 170")
    )]
    Factorial(f64),

    #[error("unknown operator `{0}`")]
    #[diagnostic(code(plait::eval::operator))]
    UnknownOperator(String),
}

pub fn evaluate(expr: &Expr) -> Result<f64, CalcError> {
    match expr {
        Expr::Number { value } => Ok(*value),
        Expr::Variable { name } => match name.as_str() {
            "pi" => Ok(std::f64::consts::PI),
            "e" => Ok(std::f64::consts::E),
            _ => Err(CalcError::UnknownVariable(name.clone())),
        },
        Expr::Prefix { op, operand } => match op.as_str() {
            "-" => Ok(-evaluate(operand)?),
            _ => Err(CalcError::UnknownOperator(op.clone())),
        },
        Expr::Postfix { op, operand } => match op.as_str() {
            "!" => factorial(evaluate(operand)?),
            _ => Err(CalcError::UnknownOperator(op.clone())),
        },
        Expr::Binary { op, lhs, rhs } => {
            let (a, b) = (evaluate(lhs)?, evaluate(rhs)?);
            match op.as_str() {
                "+" => Ok(a + b),
                "-" => Ok(a - b),
                "*" => Ok(a * b),
                "/" | "%" if b == 0.0 => Err(CalcError::DivisionByZero),
                "/" => Ok(a / b),
                "%" => Ok(a % b),
                "^" => Ok(a.powf(b)),
                _ => Err(CalcError::UnknownOperator(op.clone())),
            }
        }
    }
}

fn factorial(n: f64) -> Result<f64, CalcError> {
    if n < 0.0 || n.fract() != 0.0 || n > MAX_FACTORIAL {
        return Err(CalcError::Factorial(n));
    }
    Ok((2..=n as u64).map(|k| k as f64).product())
}
