//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for printing syntax trees, token dumps, and
//! colorized errors and validation findings. Centralizing output logic here
//! keeps the command handlers small and the presentation consistent.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::grammar::ValidationResult;
use crate::syntax::Token;

/// Prints a user-facing error message with a colored header.
pub fn print_error(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "Error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, ": {message}");
}

/// Prints the token dump for the `tokens` subcommand.
pub fn print_tokens(tokens: &[Token]) {
    for token in tokens {
        println!(
            "{:>4}:{:<3} {:<10} {:?}",
            token.line,
            token.column,
            format!("{:?}", token.kind),
            token.value
        );
    }
}

/// Prints validation findings for the `check` subcommand and returns
/// whether the grammar passed.
pub fn print_validation(result: &ValidationResult) -> bool {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for warning in &result.warnings {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(stdout, "warning");
        let _ = stdout.reset();
        let _ = writeln!(stdout, ": {warning}");
    }
    for error in &result.errors {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
        let _ = write!(stdout, "error");
        let _ = stdout.reset();
        let _ = writeln!(stdout, ": {error}");
    }

    if result.is_ok() {
        println!(
            "Grammar OK ({} warning{})",
            result.warnings.len(),
            if result.warnings.len() == 1 { "" } else { "s" }
        );
        true
    } else {
        println!(
            "{} error{} found",
            result.errors.len(),
            if result.errors.len() == 1 { "" } else { "s" }
        );
        false
    }
}
