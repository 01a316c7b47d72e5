//! Defines the command-line arguments and subcommands for the Gramarye CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gramarye",
    version,
    about = "A runtime-configurable parser generator for small textual languages."
)]
pub struct GramaryeArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a source file with a grammar and print the syntax tree as JSON.
    Parse {
        /// The path to the grammar definition (JSON).
        #[arg(required = true)]
        grammar: PathBuf,
        /// The path to the source file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// The rule to start parsing at.
        #[arg(long, default_value = "SCRIPT")]
        entry: String,
        /// Record line/column positions on captured nodes.
        #[arg(long)]
        debug: bool,
    },
    /// Show the token stream the lexer produces for a source file.
    Tokens {
        /// The path to the grammar definition (JSON), for its keyword set.
        #[arg(required = true)]
        grammar: PathBuf,
        /// The path to the source file to tokenize.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Validate a grammar and report errors and warnings.
    Check {
        /// The path to the grammar definition (JSON).
        #[arg(required = true)]
        grammar: PathBuf,
        /// The rule the grammar is expected to start at.
        #[arg(long, default_value = "SCRIPT")]
        entry: String,
    },
}
