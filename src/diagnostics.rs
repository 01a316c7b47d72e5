//! Unified diagnostic system for the Gramarye engine.
//!
//! All errors surfaced by any stage of the pipeline are represented by
//! `GramaryeError`, a single `miette`-based enum. Two internal types back
//! the engine's control flow:
//!
//! - `ParseError` is the structured failure record the engine threads
//!   through backtracking: a message, the offending token when one is
//!   known, and an optional description of what was expected.
//! - `Failure` distinguishes recoverable failures (an alternation or an
//!   optional rule may retry or swallow them) from fatal ones (a failure
//!   inside a repetition, or a dangling rule reference). Fatal failures
//!   unwind to the entry rule without further backtracking.
//!
//! When a failure escapes the entry rule it is decorated with a source
//! excerpt: the message gains an ` at line L:C` suffix, a gutter-formatted
//! three-line excerpt, and a caret under the offending column. Hosts that
//! prefer miette's own rendering can hand the error to `miette::Report`.

use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

use crate::syntax::stream::TokenStream;
use crate::syntax::{Span, Token};

/// Encapsulates the diagnostic context of an error: optional source text,
/// span, and help message.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source code for error highlighting.
    pub src: Option<Arc<String>>,
    /// Character span within the source.
    pub span: Option<Span>,
    /// Help message for user guidance.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with only a source.
    pub fn with_src(src: Arc<String>) -> Self {
        Self {
            src: Some(src),
            span: None,
            help: None,
        }
    }

    /// Creates a context with both source and span.
    pub fn with_src_and_span(src: Arc<String>, span: Span) -> Self {
        Self {
            src: Some(src),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for all Gramarye failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum GramaryeError {
    #[error("Lexer error: {message}")]
    #[diagnostic(code(gramarye::lex))]
    Lex { message: String, ctx: ErrorContext },

    #[error("Parse error: {message}")]
    #[diagnostic(code(gramarye::parse))]
    Parse {
        message: String,
        /// The offending token, when one is known.
        token: Option<Token>,
        /// What the parser expected at the failure point.
        expected: Option<String>,
        ctx: ErrorContext,
    },

    #[error("Grammar error: {message}")]
    #[diagnostic(code(gramarye::grammar))]
    Grammar { message: String, ctx: ErrorContext },
}

impl GramaryeError {
    pub fn lex(message: impl Into<String>, ctx: ErrorContext) -> Self {
        Self::Lex {
            message: message.into(),
            ctx,
        }
    }

    pub fn grammar(message: impl Into<String>, ctx: ErrorContext) -> Self {
        Self::Grammar {
            message: message.into(),
            ctx,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lex { message, .. }
            | Self::Parse { message, .. }
            | Self::Grammar { message, .. } => message,
        }
    }

    pub fn ctx(&self) -> &ErrorContext {
        match self {
            Self::Lex { ctx, .. } | Self::Parse { ctx, .. } | Self::Grammar { ctx, .. } => ctx,
        }
    }
}

// ============================================================================
// ENGINE-INTERNAL FAILURES
// ============================================================================

/// A structured parse failure, before boundary decoration.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub token: Option<Token>,
    pub expected: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            message: message.into(),
            token,
            expected: None,
        }
    }

    pub fn expecting(
        message: impl Into<String>,
        token: Option<Token>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            token,
            expected: Some(expected.into()),
        }
    }

    /// An end-of-input failure. `token` should be the last token of the
    /// stream so the diagnostic can still point into the source.
    pub fn end_of_input(token: Option<Token>) -> Self {
        Self::new("Unexpected end of input", token)
    }

    /// How far into the source this failure reached. Used to pick the most
    /// informative of several failed alternatives.
    pub fn depth(&self) -> usize {
        self.token.as_ref().map_or(0, |token| token.index)
    }
}

/// The engine's failure channel.
///
/// `Recoverable` failures may be swallowed by `optional` rules or retried
/// past by alternation; `Fatal` failures unwind immediately.
#[derive(Debug, Clone)]
pub(crate) enum Failure {
    Recoverable(ParseError),
    Fatal(ParseError),
}

impl Failure {
    pub(crate) fn into_error(self) -> ParseError {
        match self {
            Failure::Recoverable(error) | Failure::Fatal(error) => error,
        }
    }

    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, Failure::Fatal(_))
    }

    /// Marks the failure as fatal so enclosing alternations stop retrying.
    pub(crate) fn escalate(self) -> Failure {
        Failure::Fatal(self.into_error())
    }
}

impl From<ParseError> for Failure {
    fn from(error: ParseError) -> Self {
        Failure::Recoverable(error)
    }
}

// ============================================================================
// BOUNDARY DECORATION
// ============================================================================

/// Number of source lines shown above the offending line in excerpts.
const EXCERPT_CONTEXT_LINES: usize = 2;

/// Attach source context to a failure escaping the entry rule.
///
/// With a token: the message gains ` at line L:C`, a blank line, the gutter
/// excerpt of the surrounding lines, and a caret under the offending column.
/// Without a token only the bare message escapes.
pub(crate) fn decorate(error: ParseError, stream: &TokenStream) -> GramaryeError {
    let ParseError {
        message,
        token,
        expected,
    } = error;

    let Some(offending) = token else {
        return GramaryeError::Parse {
            message,
            token: None,
            expected,
            ctx: ErrorContext::with_src(stream.source().clone()),
        };
    };

    let line = offending.line;
    let column = offending.column;
    let excerpt = stream.get_lines_of_code(line.saturating_sub(EXCERPT_CONTEXT_LINES).max(1), line);
    let gutter_width = line.to_string().len() + 4;
    let caret = format!("{}^", " ".repeat(gutter_width + column - 1));
    let message = format!("{message} at line {line}:{column}\n\n{excerpt}\n{caret}");

    let ctx = ErrorContext::with_src_and_span(stream.source().clone(), offending.span());
    GramaryeError::Parse {
        message,
        token: Some(offending),
        expected,
        ctx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::lex;
    use std::collections::HashSet;

    #[test]
    fn decoration_appends_excerpt_and_caret() {
        let source = "first line\nsecond oops";
        let stream = TokenStream::new(lex(source, &HashSet::new()).unwrap(), source);
        let oops = Token::new(crate::syntax::TokenKind::Identifier, "oops", 18, 2, 8);
        let error = decorate(ParseError::new("Expected 'x' but got 'oops'", Some(oops)), &stream);
        assert_eq!(
            error.message(),
            "Expected 'x' but got 'oops' at line 2:8\n\n 1 | first line\n 2 | second oops\n            ^"
        );
    }

    #[test]
    fn decoration_without_a_token_keeps_the_bare_message() {
        let source = "";
        let stream = TokenStream::new(Vec::new(), source);
        let error = decorate(ParseError::end_of_input(None), &stream);
        assert_eq!(error.message(), "Unexpected end of input");
    }
}
