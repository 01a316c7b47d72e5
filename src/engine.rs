//! Gramarye Parser Engine - Grammar Interpreter
//!
//! The engine evaluates a `Grammar` directly against a token stream:
//! recursive descent over the rule structure, with backtracking through
//! positional checkpoints. One dispatcher (`parse_rule`) interprets every
//! rule variant; the sub-parsers below it implement the variant semantics.
//!
//! ## Contract highlights
//!
//! - The order of the dispatcher's leading checks is fixed: an exhausted
//!   stream fails before anything else, then leading comment tokens are
//!   skipped, then the rule variant is matched.
//! - A sequence whose children produced exactly one value yields that value
//!   unwrapped; otherwise it yields the list. This keeps captures over
//!   keyword-heavy sequences from nesting singleton lists everywhere.
//! - A failure inside a repetition escalates to fatal: the repeated body is
//!   the user's real code, and an enclosing alternation must not mask its
//!   diagnostic by trying a shallower sibling.
//! - Alternation returns the leftmost match. When every alternative fails
//!   it reports the failure that reached furthest into the source; if
//!   several alternatives tie at the furthest token it generalizes to
//!   "Expected <rule> but got <token>". The furthest failure seen across
//!   the whole run wins over a shallower escaping error at the boundary.

use crate::cst::{Cst, CstNode};
use crate::diagnostics::{decorate, ErrorContext, Failure, GramaryeError, ParseError};
use crate::grammar::{Grammar, Rule, Terminal};
use crate::syntax::lexer::lex;
use crate::syntax::stream::TokenStream;
use crate::syntax::TokenKind;

/// The public parsing driver. Holds the grammar for its lifetime; all
/// per-parse state lives in a `ParseRun`, so a `Parser` can be reused
/// across calls.
pub struct Parser {
    grammar: Grammar,
    debug: bool,
}

impl Parser {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            debug: false,
        }
    }

    /// In debug mode, captured nodes record the line/column of their first
    /// token and matched keywords appear in the tree as `KEYWORD` nodes.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse `source` starting at the default entry rule.
    pub fn parse(&self, source: &str) -> Result<Option<Cst>, GramaryeError> {
        self.parse_entry(source, Grammar::DEFAULT_ENTRY)
    }

    /// Parse `source` starting at the named entry rule.
    ///
    /// Returns `Ok(None)` when the entry rule matched without producing a
    /// CST value (a bare keyword rule outside debug mode). There is no
    /// implicit end-of-input check: input past the entry rule's match is
    /// left unconsumed.
    pub fn parse_entry(&self, source: &str, entry: &str) -> Result<Option<Cst>, GramaryeError> {
        let Some(entry_rule) = self.grammar.rule(entry) else {
            return Err(GramaryeError::grammar(
                format!("Grammar has no rule named '{entry}'"),
                ErrorContext::none(),
            ));
        };

        let keywords = self.grammar.keywords();
        let tokens = lex(source, &keywords)?;
        let mut run = ParseRun {
            grammar: &self.grammar,
            stream: TokenStream::new(tokens, source),
            debug: self.debug,
            furthest: None,
            probing: false,
        };

        match run.parse_rule(entry_rule, entry, None) {
            Ok(value) => Ok(value),
            Err(failure) => {
                let escaped = failure.into_error();
                let surfaced = match run.furthest.take() {
                    Some(furthest) if furthest.depth() > escaped.depth() => furthest,
                    _ => escaped,
                };
                Err(decorate(surfaced, &run.stream))
            }
        }
    }
}

/// State of a single parse call.
struct ParseRun<'g> {
    grammar: &'g Grammar,
    stream: TokenStream,
    debug: bool,
    /// Deepest recoverable failure seen while trying alternatives.
    furthest: Option<ParseError>,
    /// True while speculatively matching a repetition's end sentinel;
    /// failures observed then are expected and not worth reporting.
    probing: bool,
}

impl<'g> ParseRun<'g> {
    /// The single dispatcher every rule evaluation goes through.
    ///
    /// `current_type` tags the CST node when a capture fires and names the
    /// rule in generalized alternation failures. `end` is the hint a
    /// sequence passes about what follows the current child; repetitions
    /// probe it to know when to stop.
    fn parse_rule(
        &mut self,
        rule: &Rule,
        current_type: &str,
        end: Option<&Rule>,
    ) -> Result<Option<Cst>, Failure> {
        if self.stream.is_exhausted() {
            return Err(Failure::Recoverable(ParseError::end_of_input(
                self.stream.last_token().cloned(),
            )));
        }
        self.skip_comments()?;

        match rule {
            Rule::Keyword(word) => self.parse_keyword(word),
            Rule::Capture { tag, inner } => self.parse_capture(tag, inner, end),
            Rule::Terminal(terminal) => self.parse_terminal(terminal.as_ref()),
            Rule::Sequence(children) => self.parse_sequence(children, current_type),
            Rule::Repeat { inner, separator } => {
                self.parse_repeat(inner, separator.as_deref(), current_type, end)
            }
            Rule::Optional(inner) => self.parse_optional(inner, current_type, end),
            Rule::Options(alternatives) => self.parse_options(alternatives, current_type, end),
            Rule::Ref(name) => {
                let grammar = self.grammar;
                let Some(target) = grammar.rule(name) else {
                    return Err(Failure::Fatal(ParseError::new(
                        format!("No matching rule found for '{name}'"),
                        self.stream.peek().cloned(),
                    )));
                };
                self.parse_rule(target, name, end)
            }
        }
    }

    fn skip_comments(&mut self) -> Result<(), Failure> {
        while matches!(self.stream.peek(), Some(token) if token.kind == TokenKind::Comment) {
            self.stream.consume()?;
        }
        Ok(())
    }

    /// Match a keyword literal against the next token, case-insensitively.
    /// Outside debug mode the keyword is discarded from the CST.
    fn parse_keyword(&mut self, word: &str) -> Result<Option<Cst>, Failure> {
        let token = self.stream.consume()?;
        if token.value.to_lowercase() != word.to_lowercase() {
            return Err(Failure::Recoverable(ParseError::expecting(
                format!("Expected '{}' but got '{}'", word, token.value),
                Some(token),
                word,
            )));
        }
        // A reserved word may only be matched by an alphanumeric literal;
        // punctuation literals colliding with reserved words are grammar
        // bugs.
        if token.kind == TokenKind::Keyword && !word.chars().all(char::is_alphanumeric) {
            return Err(Failure::Recoverable(ParseError::new(
                format!("Unexpected keyword '{}'", token.value),
                Some(token),
            )));
        }

        if self.debug {
            return Ok(Some(Cst::Node(CstNode {
                tag: "KEYWORD".to_string(),
                value: Box::new(Cst::String(token.value.clone())),
                line: Some(token.line),
                column: Some(token.column),
            })));
        }
        Ok(None)
    }

    /// Consume one token through the rule's conversion callback. The raw
    /// scalar is returned unwrapped; enclosing captures do the wrapping.
    fn parse_terminal(&mut self, terminal: &dyn Terminal) -> Result<Option<Cst>, Failure> {
        let token = self.stream.consume()?;
        match terminal.convert(&token) {
            Ok(value) => Ok(Some(value)),
            Err(message) => Err(Failure::Recoverable(ParseError::new(message, Some(token)))),
        }
    }

    fn parse_capture(
        &mut self,
        tag: &str,
        inner: &Rule,
        end: Option<&Rule>,
    ) -> Result<Option<Cst>, Failure> {
        let location = if self.debug {
            self.stream.peek().map(|token| (token.line, token.column))
        } else {
            None
        };

        let value = self.parse_rule(inner, tag, end)?;
        let (line, column) = match location {
            Some((line, column)) => (Some(line), Some(column)),
            None => (None, None),
        };
        Ok(Some(Cst::Node(CstNode {
            tag: tag.to_string(),
            value: Box::new(value.unwrap_or_else(|| Cst::List(Vec::new()))),
            line,
            column,
        })))
    }

    /// Evaluate children in order, handing each the next child as an end
    /// hint. Yields the lone captured value unwrapped, or the list.
    fn parse_sequence(
        &mut self,
        children: &[Rule],
        current_type: &str,
    ) -> Result<Option<Cst>, Failure> {
        let mut results = Vec::new();
        for (index, child) in children.iter().enumerate() {
            let hint = children.get(index + 1);
            if let Some(value) = self.parse_rule(child, current_type, hint)? {
                results.push(value);
            }
        }
        match results.len() {
            1 => Ok(results.pop()),
            _ => Ok(Some(Cst::List(results))),
        }
    }

    /// Match the inner shape zero or more times. Stops when the stream is
    /// exhausted or the end sentinel matches ahead (the sentinel is left
    /// for the enclosing sequence to consume). With a separator, the
    /// repetition continues only across separator tokens. Failures of the
    /// inner shape escalate to fatal.
    fn parse_repeat(
        &mut self,
        inner: &Rule,
        separator: Option<&str>,
        current_type: &str,
        end: Option<&Rule>,
    ) -> Result<Option<Cst>, Failure> {
        let mut items = Vec::new();
        let mut first = true;

        loop {
            // Comments may trail the last element.
            self.skip_comments()?;
            if self.stream.is_exhausted() {
                break;
            }
            if let Some(end_rule) = end {
                if self.probe(end_rule, current_type)? {
                    break;
                }
            }
            if !first {
                if let Some(word) = separator {
                    if !self.consume_separator(word, current_type)? {
                        break;
                    }
                }
            }

            match self.parse_rule(inner, current_type, end) {
                Ok(Some(value)) => items.push(value),
                Ok(None) => {}
                Err(failure) => return Err(failure.escalate()),
            }
            first = false;
        }

        Ok(Some(Cst::List(items)))
    }

    /// Speculatively match `rule` at the current position, then restore the
    /// cursor regardless of the outcome.
    fn probe(&mut self, rule: &Rule, current_type: &str) -> Result<bool, Failure> {
        let saved = self.stream.position();
        let was_probing = self.probing;
        self.probing = true;
        let outcome = self.parse_rule(rule, current_type, None);
        self.probing = was_probing;
        self.stream.seek(saved).map_err(Failure::Fatal)?;
        Ok(outcome.is_ok())
    }

    fn consume_separator(&mut self, word: &str, current_type: &str) -> Result<bool, Failure> {
        let saved = self.stream.position();
        let separator_rule = Rule::Keyword(word.to_string());
        match self.parse_rule(&separator_rule, current_type, None) {
            Ok(_) => Ok(true),
            Err(_) => {
                self.stream.seek(saved).map_err(Failure::Fatal)?;
                Ok(false)
            }
        }
    }

    /// Match the inner shape zero or one time. A recoverable failure
    /// restores the cursor and yields nothing; a fatal one propagates.
    fn parse_optional(
        &mut self,
        inner: &Rule,
        current_type: &str,
        end: Option<&Rule>,
    ) -> Result<Option<Cst>, Failure> {
        let saved = self.stream.position();
        match self.parse_rule(inner, current_type, end) {
            Ok(value) => Ok(value),
            Err(failure) if failure.is_fatal() => Err(failure),
            Err(_) => {
                self.stream.seek(saved).map_err(Failure::Fatal)?;
                Ok(None)
            }
        }
    }

    /// Try each alternative in order; the leftmost match wins. On total
    /// failure, report the alternative that reached furthest, or a
    /// generalized "Expected <rule>" when several tie at the same token.
    fn parse_options(
        &mut self,
        alternatives: &[Rule],
        current_type: &str,
        end: Option<&Rule>,
    ) -> Result<Option<Cst>, Failure> {
        let saved = self.stream.position();
        let mut best: Option<ParseError> = None;
        let mut ties = 0usize;

        for alternative in alternatives {
            match self.parse_rule(alternative, current_type, end) {
                Ok(value) => return Ok(value),
                Err(failure) if failure.is_fatal() => return Err(failure),
                Err(failure) => {
                    let error = failure.into_error();
                    self.note_failure(&error);
                    match best.as_ref().map(ParseError::depth) {
                        Some(depth) if error.depth() > depth => {
                            best = Some(error);
                            ties = 1;
                        }
                        Some(depth) if error.depth() == depth => ties += 1,
                        Some(_) => {}
                        None => {
                            best = Some(error);
                            ties = 1;
                        }
                    }
                    self.stream.seek(saved).map_err(Failure::Fatal)?;
                }
            }
        }

        let Some(best) = best else {
            // An empty options list; the validator reports these.
            return Err(Failure::Recoverable(ParseError::expecting(
                format!("Expected {current_type} but got nothing"),
                self.stream.peek().cloned(),
                current_type,
            )));
        };

        if ties > 1 {
            let got = best
                .token
                .as_ref()
                .map_or_else(|| "end of input".to_string(), |token| token.value.clone());
            let error = ParseError::expecting(
                format!("Expected {current_type} but got '{got}'"),
                best.token.clone(),
                current_type,
            );
            self.note_failure(&error);
            return Err(Failure::Recoverable(error));
        }
        Err(Failure::Recoverable(best))
    }

    /// Track the deepest failure of the run for boundary reporting; the
    /// deepest point the parser reached correlates with the user's actual
    /// mistake even when a shallower alternative failed later.
    fn note_failure(&mut self, error: &ParseError) {
        if self.probing {
            return;
        }
        let deeper = self
            .furthest
            .as_ref()
            .map_or(true, |furthest| error.depth() > furthest.depth());
        if deeper {
            self.furthest = Some(error.clone());
        }
    }
}
