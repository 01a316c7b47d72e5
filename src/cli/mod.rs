//! The Gramarye Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: load a grammar, run the engine or the
//! validator, and hand the results to the output module.

use std::path::Path;
use std::{fs, process};

use clap::Parser;

use crate::cli::args::{Command, GramaryeArgs};
use crate::grammar::Grammar;
use crate::syntax::lexer::lex;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let cli = GramaryeArgs::parse();

    let result = match cli.command {
        Command::Parse {
            grammar,
            file,
            entry,
            debug,
        } => handle_parse(&grammar, &file, &entry, debug),
        Command::Tokens { grammar, file } => handle_tokens(&grammar, &file),
        Command::Check { grammar, entry } => handle_check(&grammar, &entry),
    };

    if let Err(error) = result {
        output::print_error(&error.to_string());
        process::exit(1);
    }
}

/// Handles the `parse` subcommand.
fn handle_parse(
    grammar_path: &Path,
    file: &Path,
    entry: &str,
    debug: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = load_grammar(grammar_path)?;
    let source = fs::read_to_string(file)?;

    let parser = crate::engine::Parser::new(grammar).debug(debug);
    match parser.parse_entry(&source, entry)? {
        Some(cst) => println!("{}", serde_json::to_string_pretty(&cst)?),
        None => println!("null"),
    }
    Ok(())
}

/// Handles the `tokens` subcommand.
fn handle_tokens(grammar_path: &Path, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = load_grammar(grammar_path)?;
    let source = fs::read_to_string(file)?;

    let keywords = grammar.keywords();
    let tokens = lex(&source, &keywords)?;
    let visible: Vec<_> = tokens
        .into_iter()
        .filter(|token| token.kind != crate::syntax::TokenKind::Whitespace)
        .collect();
    output::print_tokens(&visible);
    Ok(())
}

/// Handles the `check` subcommand.
fn handle_check(grammar_path: &Path, entry: &str) -> Result<(), Box<dyn std::error::Error>> {
    let grammar = load_grammar(grammar_path)?;
    let result = grammar.validate(entry);
    if !output::print_validation(&result) {
        process::exit(1);
    }
    Ok(())
}

fn load_grammar(path: &Path) -> Result<Grammar, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(Grammar::from_json(&text)?)
}
