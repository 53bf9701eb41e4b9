//! Command-line arguments for the `plait` binary.
//!
//! Every subcommand takes its input either as a positional expression or from
//! a file given with `--file`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "plait",
    version,
    about = "Tokenize, parse and evaluate arithmetic expressions with the plait toolkit."
)]
pub struct PlaitArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the tokens of an expression, one per line.
    Tokens {
        #[command(flatten)]
        input: InputArgs,
        /// Emit the tokens, with their source ranges, as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the fully parenthesised expression tree.
    Tree {
        #[command(flatten)]
        input: InputArgs,
        /// Emit the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Evaluate an expression.
    Eval {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// The expression to process.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub expression: Option<String>,
    /// Read the expression from this file instead.
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}
