//! Handles all user-facing output for the CLI.
//!
//! Results go to stdout. Errors go to stderr: parse failures as the plain
//! rendered report with a coloured header, everything else through miette.

use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::calc::CalcError;

/// Prints `value` as pretty JSON, or reports the serialization error.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints an error to standard error with colorization if supported.
pub fn print_error(error: CalcError) {
    match error {
        CalcError::Parse(failure) => {
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            if print_report_colored(&mut stderr, failure.report()).is_err() {
                // Fallback to plain text if color printing fails
                eprintln!("{}", failure.report());
            }
        }
        other => {
            let report = miette::Report::new(other);
            eprintln!("{report:?}");
        }
    }
}

/// Writes a rendered parse report, highlighting every `Error at` header and
/// backtracking notice.
fn print_report_colored(writer: &mut impl WriteColor, report: &str) -> std::io::Result<()> {
    for line in report.lines() {
        if line.starts_with("Error at ") {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        } else if line.starts_with("The parser backtracked") {
            writer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        }
        writeln!(writer, "{line}")?;
        writer.reset()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    #[test]
    fn report_text_is_unchanged_without_colour() {
        let mut buffer = Buffer::no_color();
        let report = "Error at Line 1, Col 1:\nx\n^\nExpected number";
        print_report_colored(&mut buffer, report).unwrap();
        assert_eq!(String::from_utf8(buffer.into_inner()).unwrap(), format!("{report}\n"));
    }
}
