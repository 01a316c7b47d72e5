//! Cursor over the lexer's output.
//!
//! The stream holds the non-whitespace tokens of a single parse call plus
//! the original source text, which it can excerpt for diagnostics. The
//! engine backtracks by pairing `position` with `seek`; `seek(position())`
//! is always an identity operation.

use std::sync::Arc;

use crate::diagnostics::ParseError;
use crate::syntax::{Token, TokenKind};

/// An opaque checkpoint into a `TokenStream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(usize);

pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    source: Arc<String>,
}

impl TokenStream {
    /// Build a stream from raw lexer output. Whitespace tokens are dropped;
    /// comments stay in the sequence and are skipped by the engine.
    pub fn new(tokens: Vec<Token>, source: &str) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Whitespace)
            .collect();
        Self {
            tokens,
            cursor: 0,
            source: Arc::new(source.to_string()),
        }
    }

    pub fn source(&self) -> &Arc<String> {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// The last token of the whole stream, regardless of the cursor.
    pub fn last_token(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Consume and return the next token.
    pub fn consume(&mut self) -> Result<Token, ParseError> {
        let Some(token) = self.tokens.get(self.cursor) else {
            return Err(ParseError::end_of_input(self.tokens.last().cloned()));
        };
        self.cursor += 1;
        Ok(token.clone())
    }

    pub fn position(&self) -> Cursor {
        Cursor(self.cursor)
    }

    /// Restore a previously saved cursor.
    pub fn seek(&mut self, position: Cursor) -> Result<(), ParseError> {
        let Cursor(index) = position;
        if index > self.tokens.len() {
            return Err(ParseError::new(
                format!("Cursor {index} is out of range for a stream of {} tokens", self.tokens.len()),
                None,
            ));
        }
        self.cursor = index;
        Ok(())
    }

    /// Format source lines [start, end] (1-based, inclusive) with a ` N | `
    /// gutter, right-aligning the line number to the width of `end`.
    pub fn get_lines_of_code(&self, start: usize, end: usize) -> String {
        let lines: Vec<&str> = self.source.lines().collect();
        if lines.is_empty() {
            return String::new();
        }
        let end = end.clamp(1, lines.len());
        let start = start.clamp(1, end);
        let width = end.to_string().len();

        let mut excerpt = String::new();
        for number in start..=end {
            if number > start {
                excerpt.push('\n');
            }
            excerpt.push_str(&format!(" {:>width$} | {}", number, lines[number - 1]));
        }
        excerpt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::lex;
    use std::collections::HashSet;

    fn stream_of(source: &str) -> TokenStream {
        TokenStream::new(lex(source, &HashSet::new()).unwrap(), source)
    }

    #[test]
    fn whitespace_is_filtered_but_comments_remain() {
        let stream = stream_of("a // note\nb");
        let kinds: Vec<_> = stream.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Comment, TokenKind::Identifier]
        );
    }

    #[test]
    fn seek_of_position_is_identity() {
        let mut stream = stream_of("a b c");
        stream.consume().unwrap();
        let saved = stream.position();
        let before = stream.peek().cloned();
        stream.consume().unwrap();
        stream.seek(saved).unwrap();
        assert_eq!(stream.position(), saved);
        assert_eq!(stream.peek().cloned(), before);
    }

    #[test]
    fn seek_rejects_out_of_range_cursors() {
        let mut stream = stream_of("a");
        assert!(stream.seek(Cursor(5)).is_err());
    }

    #[test]
    fn consume_past_the_end_reports_end_of_input() {
        let mut stream = stream_of("a");
        stream.consume().unwrap();
        let error = stream.consume().unwrap_err();
        assert!(error.message.contains("Unexpected end of input"));
    }

    #[test]
    fn excerpt_aligns_line_numbers_to_the_widest() {
        let stream = stream_of("one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten");
        let excerpt = stream.get_lines_of_code(9, 10);
        assert_eq!(excerpt, "  9 | nine\n 10 | ten");
    }

    #[test]
    fn excerpt_clamps_to_the_available_lines() {
        let stream = stream_of("only");
        assert_eq!(stream.get_lines_of_code(1, 3), " 1 | only");
    }
}
