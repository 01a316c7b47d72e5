//! Grammar data model for the Gramarye engine.
//!
//! A `Grammar` is an immutable mapping from rule name to `Rule`, authored by
//! the host (in Rust, or loaded from JSON) and interpreted directly by the
//! parser engine — no code generation step. The engine starts at an entry
//! rule (`SCRIPT` by default) and matches the rule structure against the
//! token stream.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::diagnostics::GramaryeError;

pub mod keywords;
pub mod loader;
pub mod terminals;
pub mod validator;

pub use terminals::Terminal;
pub use validator::ValidationResult;

/// One rule of a grammar.
///
/// `Keyword` matches a literal word or symbol and produces no CST value
/// (outside debug mode). `Terminal` consumes one token through a conversion
/// callback. `Ref` names another rule. `Sequence` matches all children in
/// order; when exactly one child produced a value the sequence yields that
/// value unwrapped, otherwise it yields the list. `Options` tries its
/// alternatives in order and the leftmost match wins. `Repeat` matches zero
/// or more occurrences, optionally separated by a literal. `Optional`
/// matches zero or one occurrence. `Capture` wraps its inner result in a
/// CST node tagged `tag`.
#[derive(Clone)]
pub enum Rule {
    Keyword(String),
    Terminal(Arc<dyn Terminal>),
    Ref(String),
    Sequence(Vec<Rule>),
    Options(Vec<Rule>),
    Repeat {
        inner: Box<Rule>,
        separator: Option<String>,
    },
    Optional(Box<Rule>),
    Capture {
        tag: String,
        inner: Box<Rule>,
    },
}

impl Rule {
    pub fn keyword(word: impl Into<String>) -> Rule {
        Rule::Keyword(word.into())
    }

    pub fn reference(name: impl Into<String>) -> Rule {
        Rule::Ref(name.into())
    }

    pub fn terminal(terminal: impl Terminal + 'static) -> Rule {
        Rule::Terminal(Arc::new(terminal))
    }

    pub fn sequence(children: impl IntoIterator<Item = Rule>) -> Rule {
        Rule::Sequence(children.into_iter().collect())
    }

    pub fn options(children: impl IntoIterator<Item = Rule>) -> Rule {
        Rule::Options(children.into_iter().collect())
    }

    pub fn repeat(inner: Rule) -> Rule {
        Rule::Repeat {
            inner: Box::new(inner),
            separator: None,
        }
    }

    pub fn repeat_with_separator(inner: Rule, separator: impl Into<String>) -> Rule {
        Rule::Repeat {
            inner: Box::new(inner),
            separator: Some(separator.into()),
        }
    }

    pub fn optional(inner: Rule) -> Rule {
        Rule::Optional(Box::new(inner))
    }

    pub fn capture(tag: impl Into<String>, inner: Rule) -> Rule {
        Rule::Capture {
            tag: tag.into(),
            inner: Box::new(inner),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Keyword(word) => f.debug_tuple("Keyword").field(word).finish(),
            Rule::Terminal(_) => f.write_str("Terminal(<callback>)"),
            Rule::Ref(name) => f.debug_tuple("Ref").field(name).finish(),
            Rule::Sequence(children) => f.debug_tuple("Sequence").field(children).finish(),
            Rule::Options(children) => f.debug_tuple("Options").field(children).finish(),
            Rule::Repeat { inner, separator } => f
                .debug_struct("Repeat")
                .field("inner", inner)
                .field("separator", separator)
                .finish(),
            Rule::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Rule::Capture { tag, inner } => f
                .debug_struct("Capture")
                .field("tag", tag)
                .field("inner", inner)
                .finish(),
        }
    }
}

/// A named collection of rules. Read-only during a parse.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: HashMap<String, Rule>,
}

impl Grammar {
    /// The rule name parsing starts at unless the caller names another.
    pub const DEFAULT_ENTRY: &'static str = "SCRIPT";

    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule.
    pub fn define(&mut self, name: impl Into<String>, rule: Rule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&String, &Rule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every bare keyword literal used in sequence/options lists, plus
    /// repetition separators. The lexer reserves these words.
    pub fn keywords(&self) -> HashSet<String> {
        keywords::extract(self)
    }

    /// Static checks against the grammar; see `validator`.
    pub fn validate(&self, entry: &str) -> ValidationResult {
        validator::validate(self, entry)
    }

    /// Loads a grammar from its JSON definition; see `loader`.
    pub fn from_json(text: &str) -> Result<Grammar, GramaryeError> {
        loader::from_json(text)
    }
}
