//! Loads grammars from their JSON definition.
//!
//! A grammar file is an object mapping rule names to open rule records:
//!
//! ```json
//! {
//!   "SCRIPT":    { "type": "STATEMENT", "repeat": true },
//!   "STATEMENT": { "type": "hello", "capture": true,
//!                  "sequence": ["hello", { "type": "noun" }] },
//!   "noun":      { "type": "noun", "capture": true, "parse": "identifier" }
//! }
//! ```
//!
//! Bare strings inside `sequence`/`options` are keyword literals. The
//! `parse` field names a built-in terminal (`"string"`, `"number"`,
//! `"identifier"`); custom terminal callbacks are API-only. Several fields
//! may coexist on one record; lowering resolves them in a fixed precedence —
//! capture, then parse, sequence, repeat, optional, options, type — so a
//! record such as `{"type": "STATEMENT", "repeat": true}` means "repeat the
//! STATEMENT rule", and `repeat`/`optional` apply to the shape described by
//! the remaining fields. Unrecognized combinations (an empty record, or
//! `capture` without a `type` tag) are load errors.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::diagnostics::{ErrorContext, GramaryeError};
use crate::grammar::terminals::{Identifier, NumberLiteral, StringLiteral};
use crate::grammar::{Grammar, Rule};

#[derive(Debug, Deserialize)]
struct RuleDef {
    #[serde(rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    capture: bool,
    parse: Option<String>,
    sequence: Option<Vec<RuleOrKeyword>>,
    options: Option<Vec<RuleOrKeyword>>,
    #[serde(default)]
    repeat: bool,
    #[serde(default)]
    optional: bool,
    separator: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleOrKeyword {
    Keyword(String),
    Rule(Box<RuleDef>),
}

pub fn from_json(text: &str) -> Result<Grammar, GramaryeError> {
    let defs: BTreeMap<String, RuleDef> = serde_json::from_str(text).map_err(|error| {
        GramaryeError::grammar(format!("Invalid grammar JSON: {error}"), ErrorContext::none())
    })?;

    let mut grammar = Grammar::new();
    for (name, def) in defs {
        let rule = lower(&name, def)?;
        grammar.define(name, rule);
    }
    Ok(grammar)
}

fn lower(rule_name: &str, mut def: RuleDef) -> Result<Rule, GramaryeError> {
    if def.capture {
        def.capture = false;
        let Some(tag) = def.type_name.clone() else {
            return Err(load_error(format!(
                "Rule '{rule_name}' sets 'capture' without a 'type' tag"
            )));
        };
        let inner = lower_body(rule_name, def)?;
        return Ok(Rule::Capture {
            tag,
            inner: Box::new(inner),
        });
    }
    lower_body(rule_name, def)
}

fn lower_body(rule_name: &str, mut def: RuleDef) -> Result<Rule, GramaryeError> {
    if let Some(terminal) = def.parse.take() {
        return builtin_terminal(rule_name, &terminal);
    }
    if let Some(children) = def.sequence.take() {
        return Ok(Rule::Sequence(lower_children(rule_name, children)?));
    }
    if def.repeat {
        def.repeat = false;
        let separator = def.separator.take();
        let inner = lower_body(rule_name, def)?;
        return Ok(Rule::Repeat {
            inner: Box::new(inner),
            separator,
        });
    }
    if def.optional {
        def.optional = false;
        let inner = lower_body(rule_name, def)?;
        return Ok(Rule::Optional(Box::new(inner)));
    }
    if let Some(children) = def.options.take() {
        return Ok(Rule::Options(lower_children(rule_name, children)?));
    }
    if let Some(target) = def.type_name.take() {
        return Ok(Rule::Ref(target));
    }
    Err(load_error(format!(
        "Rule '{rule_name}' matches no rule variant"
    )))
}

fn lower_children(
    rule_name: &str,
    children: Vec<RuleOrKeyword>,
) -> Result<Vec<Rule>, GramaryeError> {
    children
        .into_iter()
        .map(|child| match child {
            RuleOrKeyword::Keyword(word) => Ok(Rule::Keyword(word)),
            RuleOrKeyword::Rule(def) => lower(rule_name, *def),
        })
        .collect()
}

fn builtin_terminal(rule_name: &str, name: &str) -> Result<Rule, GramaryeError> {
    match name {
        "string" => Ok(Rule::terminal(StringLiteral)),
        "number" => Ok(Rule::terminal(NumberLiteral)),
        "identifier" => Ok(Rule::terminal(Identifier)),
        other => Err(load_error(format!(
            "Rule '{rule_name}' names unknown terminal '{other}' \
             (known: 'string', 'number', 'identifier')"
        ))),
    }
}

fn load_error(message: String) -> GramaryeError {
    GramaryeError::grammar(message, ErrorContext::none())
}
