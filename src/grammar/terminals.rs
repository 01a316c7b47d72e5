//! Terminal parse callbacks.
//!
//! A terminal rule consumes exactly one token and converts it to a CST
//! scalar through a `Terminal` implementation. The built-ins cover the
//! common cases; any closure of the right shape also works:
//!
//! ```
//! use gramarye::Rule;
//! use gramarye::cst::Cst;
//! use gramarye::syntax::Token;
//!
//! let upper = Rule::terminal(|token: &Token| -> Result<Cst, String> {
//!     Ok(Cst::String(token.value.to_uppercase()))
//! });
//! ```

use crate::cst::Cst;
use crate::syntax::{Token, TokenKind};

/// Converts one token into a CST value, or explains why it cannot.
///
/// The error string becomes the parse failure message attached to the
/// consumed token; wrapping the result in a tagged node is the job of an
/// enclosing capture rule.
pub trait Terminal {
    fn convert(&self, token: &Token) -> Result<Cst, String>;
}

impl<F> Terminal for F
where
    F: Fn(&Token) -> Result<Cst, String>,
{
    fn convert(&self, token: &Token) -> Result<Cst, String> {
        self(token)
    }
}

/// Accepts a string token and strips the surrounding quotes.
pub struct StringLiteral;

impl Terminal for StringLiteral {
    fn convert(&self, token: &Token) -> Result<Cst, String> {
        if token.kind != TokenKind::String {
            return Err(format!("Expected a string literal but got '{}'", token.value));
        }
        let inner = token
            .value
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| format!("Malformed string literal '{}'", token.value))?;
        Ok(Cst::String(inner.to_string()))
    }
}

/// Accepts a number token and converts it to an `f64`.
pub struct NumberLiteral;

impl Terminal for NumberLiteral {
    fn convert(&self, token: &Token) -> Result<Cst, String> {
        if token.kind != TokenKind::Number {
            return Err(format!("Expected a number but got '{}'", token.value));
        }
        token
            .value
            .parse::<f64>()
            .map(Cst::Number)
            .map_err(|_| format!("Invalid number literal '{}'", token.value))
    }
}

/// Accepts an identifier token and passes its text through.
pub struct Identifier;

impl Terminal for Identifier {
    fn convert(&self, token: &Token) -> Result<Cst, String> {
        if token.kind != TokenKind::Identifier {
            return Err(format!("Expected an identifier but got '{}'", token.value));
        }
        Ok(Cst::String(token.value.clone()))
    }
}
