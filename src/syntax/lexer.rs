//! Gramarye Lexer - Single-Pass Tokenizer
//!
//! Converts source text into a linear token sequence with position metadata.
//! The lexer is grammar-agnostic: the only grammar-derived input is the set
//! of reserved keywords, which decides whether an identifier-shaped lexeme
//! becomes a `Keyword` or an `Identifier` token.
//!
//! Whitespace tokens are emitted so that concatenating every token's `value`
//! reproduces the source exactly; the `TokenStream` filters them out before
//! parsing. Comments are kept and skipped by the engine.

use std::collections::HashSet;

use crate::diagnostics::{ErrorContext, GramaryeError};
use crate::syntax::{Token, TokenKind};

const OPERATORS: &[char] = &['+', '-', '*', '/', '>', '<', '=', '%'];
const BRACKETS: &[char] = &['(', ')', '[', ']', '{', '}'];

/// Tokenize `source` left to right.
///
/// `keywords` is matched case-sensitively against identifier-shaped lexemes.
/// Fails only on an unterminated string literal. Characters outside the
/// recognized alphabet are skipped without producing a token.
pub fn lex(source: &str, keywords: &HashSet<String>) -> Result<Vec<Token>, GramaryeError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0usize;
    let mut line = 1usize;
    let mut column = 1usize;

    while position < chars.len() {
        let ch = chars[position];
        let index = position;
        let start_line = line;
        let start_column = column;

        // Whitespace runs. Newlines reset the column counter.
        if ch.is_whitespace() {
            let mut value = String::new();
            while position < chars.len() && chars[position].is_whitespace() {
                let ws = chars[position];
                value.push(ws);
                if ws == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
                position += 1;
            }
            tokens.push(Token::new(
                TokenKind::Whitespace,
                value,
                index,
                start_line,
                start_column,
            ));
            continue;
        }

        // Line comments: `//` up to but not including the newline.
        if ch == '/' && chars.get(position + 1) == Some(&'/') {
            let mut value = String::new();
            while position < chars.len() && chars[position] != '\n' {
                value.push(chars[position]);
                position += 1;
                column += 1;
            }
            tokens.push(Token::new(
                TokenKind::Comment,
                value,
                index,
                start_line,
                start_column,
            ));
            continue;
        }

        // Number literals are unsigned; a leading sign is an Operator token
        // and unary minus is a grammar concern.
        if ch.is_ascii_digit() {
            let mut value = String::new();
            while position < chars.len()
                && (chars[position].is_ascii_digit() || chars[position] == '.')
            {
                value.push(chars[position]);
                position += 1;
                column += 1;
            }
            tokens.push(Token::new(
                TokenKind::Number,
                value,
                index,
                start_line,
                start_column,
            ));
            continue;
        }

        // String literals: raw lexeme keeps the quotes. No escape processing.
        if ch == '"' {
            let mut value = String::from('"');
            position += 1;
            column += 1;
            loop {
                match chars.get(position) {
                    None => {
                        return Err(unterminated_string(source, start_line, start_column));
                    }
                    Some('"') => {
                        value.push('"');
                        position += 1;
                        column += 1;
                        break;
                    }
                    Some(&inner) => {
                        value.push(inner);
                        if inner == '\n' {
                            line += 1;
                            column = 1;
                        } else {
                            column += 1;
                        }
                        position += 1;
                    }
                }
            }
            tokens.push(Token::new(
                TokenKind::String,
                value,
                index,
                start_line,
                start_column,
            ));
            continue;
        }

        if OPERATORS.contains(&ch) {
            tokens.push(Token::new(
                TokenKind::Operator,
                ch,
                index,
                start_line,
                start_column,
            ));
            position += 1;
            column += 1;
            continue;
        }

        if BRACKETS.contains(&ch) {
            tokens.push(Token::new(
                TokenKind::Bracket,
                ch,
                index,
                start_line,
                start_column,
            ));
            position += 1;
            column += 1;
            continue;
        }

        // Identifiers and keywords: alphabetic head, alphanumeric tail.
        if ch.is_alphabetic() {
            let mut value = String::new();
            while position < chars.len() && chars[position].is_alphanumeric() {
                value.push(chars[position]);
                position += 1;
                column += 1;
            }
            let kind = if keywords.contains(&value) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, value, index, start_line, start_column));
            continue;
        }

        // Unknown character: advance without emitting.
        position += 1;
        column += 1;
    }

    Ok(tokens)
}

fn unterminated_string(source: &str, line: usize, column: usize) -> GramaryeError {
    GramaryeError::lex(
        format!("Unterminated string literal starting at line {line}:{column}"),
        ErrorContext::with_src(std::sync::Arc::new(source.to_string())),
    )
}
