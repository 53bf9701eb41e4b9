//! The `plait` command-line tool.
//!
//! This module is the entry point for all CLI commands. It reads the input,
//! runs the calculator pipeline from [`calc`], and prints the result.

use std::{fs, path::Path, process};

use clap::Parser;

pub mod args;
pub mod calc;
pub mod output;

use args::{Command, InputArgs, PlaitArgs};
use calc::CalcError;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = PlaitArgs::parse();

    match args.command {
        Command::Tokens { input, json } => {
            let source = read_input_or_exit(&input);
            let tokens = calc::tokenize(&source).unwrap_or_else(|e| exit_with(e));
            if json {
                print_json_or_exit(&tokens);
            } else {
                for token in &tokens {
                    println!("{}", calc::describe_token(token));
                }
            }
        }

        Command::Tree { input, json } => {
            let source = read_input_or_exit(&input);
            let tree = calc::parse(&source).unwrap_or_else(|e| exit_with(e));
            if json {
                print_json_or_exit(&tree);
            } else {
                println!("{tree}");
            }
        }

        Command::Eval { input } => {
            let source = read_input_or_exit(&input);
            let value = calc::parse(&source)
                .and_then(|tree| calc::evaluate(&tree))
                .unwrap_or_else(|e| exit_with(e));
            println!("{value}");
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_input_or_exit(input: &InputArgs) -> String {
    match (&input.expression, &input.file) {
        (Some(expression), _) => expression.clone(),
        (None, Some(path)) => read_file_or_exit(path),
        (None, None) => {
            eprintln!("Error: no expression given");
            process::exit(1);
        }
    }
}

fn read_file_or_exit(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        process::exit(1);
    })
}

fn print_json_or_exit<T: serde::Serialize>(value: &T) {
    if let Err(e) = output::print_json(value) {
        eprintln!("Error: cannot serialize output: {e}");
        process::exit(1);
    }
}

fn exit_with(error: CalcError) -> ! {
    output::print_error(error);
    process::exit(1);
}
