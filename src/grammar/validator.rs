//! Static grammar checks.
//!
//! The engine interprets rules blindly, so grammar mistakes otherwise show
//! up as confusing mid-parse failures or non-termination. Validation is
//! advisory; `Parser::parse` does not run it implicitly. Each check covers
//! a single concern:
//!
//! - undefined rule references (a dangling `Ref` fails every parse);
//! - a missing entry rule;
//! - empty `sequence`/`options` lists;
//! - rules reachable from themselves in first position, which the
//!   recursive-descent interpreter cannot run (it has no left-recursion
//!   support — such grammars must be rewritten right-recursive);
//! - keyword literals that differ only by letter case. Keyword extraction
//!   is case-sensitive while the engine's match is case-insensitive, so
//!   such literals behave alike at match time but lex differently.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{ErrorContext, GramaryeError};
use crate::grammar::{Grammar, Rule};

/// Findings of a validation run. Errors describe grammars the engine cannot
/// run correctly; warnings describe suspicious but workable constructs.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<GramaryeError>,
    pub warnings: Vec<GramaryeError>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn report_error(&mut self, message: String) {
        self.errors
            .push(GramaryeError::grammar(message, ErrorContext::none()));
    }

    fn report_warning(&mut self, message: String) {
        self.warnings
            .push(GramaryeError::grammar(message, ErrorContext::none()));
    }
}

pub fn validate(grammar: &Grammar, entry: &str) -> ValidationResult {
    let mut result = ValidationResult::default();
    check_entry_rule(grammar, entry, &mut result);
    check_rule_references(grammar, &mut result);
    check_empty_combinators(grammar, &mut result);
    check_first_position_cycles(grammar, &mut result);
    check_keyword_case_collisions(grammar, &mut result);
    result
}

fn check_entry_rule(grammar: &Grammar, entry: &str, result: &mut ValidationResult) {
    if grammar.rule(entry).is_none() {
        result.report_error(format!("Entry rule '{entry}' is missing from the grammar"));
    }
}

fn check_rule_references(grammar: &Grammar, result: &mut ValidationResult) {
    for (name, rule) in grammar.rules() {
        let mut references = Vec::new();
        collect_references(rule, &mut references);
        for reference in references {
            if grammar.rule(&reference).is_none() {
                result.report_error(format!(
                    "Rule '{name}' references undefined rule '{reference}'"
                ));
            }
        }
    }
}

fn collect_references(rule: &Rule, references: &mut Vec<String>) {
    match rule {
        Rule::Ref(name) => references.push(name.clone()),
        Rule::Sequence(children) | Rule::Options(children) => {
            for child in children {
                collect_references(child, references);
            }
        }
        Rule::Repeat { inner, .. } | Rule::Optional(inner) | Rule::Capture { inner, .. } => {
            collect_references(inner, references);
        }
        Rule::Keyword(_) | Rule::Terminal(_) => {}
    }
}

fn check_empty_combinators(grammar: &Grammar, result: &mut ValidationResult) {
    for (name, rule) in grammar.rules() {
        walk_for_empty(name, rule, result);
    }
}

fn walk_for_empty(rule_name: &str, rule: &Rule, result: &mut ValidationResult) {
    match rule {
        Rule::Sequence(children) => {
            if children.is_empty() {
                result.report_error(format!("Rule '{rule_name}' has an empty sequence"));
            }
            for child in children {
                walk_for_empty(rule_name, child, result);
            }
        }
        Rule::Options(children) => {
            if children.is_empty() {
                result.report_error(format!("Rule '{rule_name}' has an empty options list"));
            }
            for child in children {
                walk_for_empty(rule_name, child, result);
            }
        }
        Rule::Repeat { inner, .. } | Rule::Optional(inner) | Rule::Capture { inner, .. } => {
            walk_for_empty(rule_name, inner, result);
        }
        Rule::Keyword(_) | Rule::Terminal(_) | Rule::Ref(_) => {}
    }
}

// ============================================================================
// FIRST-POSITION CYCLES
// ============================================================================

fn check_first_position_cycles(grammar: &Grammar, result: &mut ValidationResult) {
    let mut edges: HashMap<&str, Vec<String>> = HashMap::new();
    for (name, rule) in grammar.rules() {
        let mut firsts = Vec::new();
        first_position_refs(rule, &mut firsts);
        edges.insert(name.as_str(), firsts);
    }

    let mut flagged: Vec<&str> = Vec::new();
    for &start in edges.keys() {
        if reaches_itself(start, &edges) {
            flagged.push(start);
        }
    }
    flagged.sort_unstable();
    for name in flagged {
        result.report_error(format!(
            "Rule '{name}' is reachable from itself without consuming input \
             (left recursion is unsupported; rewrite the rule right-recursive)"
        ));
    }
}

/// Rule names this rule may invoke before consuming any token.
fn first_position_refs(rule: &Rule, firsts: &mut Vec<String>) {
    match rule {
        Rule::Ref(name) => firsts.push(name.clone()),
        Rule::Sequence(children) => {
            for child in children {
                first_position_refs(child, firsts);
                if !can_match_empty(child) {
                    break;
                }
            }
        }
        Rule::Options(children) => {
            for child in children {
                first_position_refs(child, firsts);
            }
        }
        Rule::Repeat { inner, .. } | Rule::Optional(inner) | Rule::Capture { inner, .. } => {
            first_position_refs(inner, firsts);
        }
        Rule::Keyword(_) | Rule::Terminal(_) => {}
    }
}

fn can_match_empty(rule: &Rule) -> bool {
    match rule {
        Rule::Repeat { .. } | Rule::Optional(_) => true,
        Rule::Capture { inner, .. } => can_match_empty(inner),
        Rule::Sequence(children) => children.iter().all(can_match_empty),
        Rule::Options(children) => children.iter().any(can_match_empty),
        Rule::Keyword(_) | Rule::Terminal(_) | Rule::Ref(_) => false,
    }
}

fn reaches_itself<'a>(start: &str, edges: &'a HashMap<&str, Vec<String>>) -> bool {
    let mut visited: HashSet<&'a str> = HashSet::new();
    let mut stack: Vec<&'a str> = edges.get(start).map_or(Vec::new(), |firsts| {
        firsts.iter().map(String::as_str).collect()
    });
    while let Some(name) = stack.pop() {
        if name == start {
            return true;
        }
        if !visited.insert(name) {
            continue;
        }
        if let Some(firsts) = edges.get(name) {
            stack.extend(firsts.iter().map(String::as_str));
        }
    }
    false
}

fn check_keyword_case_collisions(grammar: &Grammar, result: &mut ValidationResult) {
    let mut by_folded: HashMap<String, HashSet<String>> = HashMap::new();
    for keyword in grammar.keywords() {
        by_folded
            .entry(keyword.to_lowercase())
            .or_default()
            .insert(keyword);
    }
    let mut collisions: Vec<Vec<String>> = by_folded
        .into_values()
        .filter(|spellings| spellings.len() > 1)
        .map(|spellings| {
            let mut sorted: Vec<String> = spellings.into_iter().collect();
            sorted.sort_unstable();
            sorted
        })
        .collect();
    collisions.sort();
    for spellings in collisions {
        result.report_warning(format!(
            "Keyword literals {} differ only by case; they match the same \
             source words but reserve different spellings",
            spellings
                .iter()
                .map(|word| format!("'{word}'"))
                .collect::<Vec<_>>()
                .join(" and ")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::terminals::Identifier;

    fn messages(findings: &[GramaryeError]) -> Vec<String> {
        findings.iter().map(|error| error.to_string()).collect()
    }

    #[test]
    fn reports_undefined_references() {
        let mut grammar = Grammar::new();
        grammar.define("SCRIPT", Rule::reference("STATEMENT"));
        let result = validate(&grammar, "SCRIPT");
        assert!(!result.is_ok());
        assert!(messages(&result.errors)
            .iter()
            .any(|m| m.contains("references undefined rule 'STATEMENT'")));
    }

    #[test]
    fn reports_missing_entry_rule() {
        let grammar = Grammar::new();
        let result = validate(&grammar, "SCRIPT");
        assert!(messages(&result.errors)
            .iter()
            .any(|m| m.contains("Entry rule 'SCRIPT' is missing")));
    }

    #[test]
    fn reports_direct_left_recursion() {
        let mut grammar = Grammar::new();
        grammar.define(
            "E",
            Rule::options([
                Rule::sequence([Rule::reference("E"), Rule::keyword("+"), Rule::reference("T")]),
                Rule::reference("T"),
            ]),
        );
        grammar.define("T", Rule::terminal(Identifier));
        let result = validate(&grammar, "E");
        assert!(messages(&result.errors)
            .iter()
            .any(|m| m.contains("Rule 'E' is reachable from itself")));
    }

    #[test]
    fn recursion_behind_a_consumed_token_is_fine() {
        let mut grammar = Grammar::new();
        grammar.define(
            "E",
            Rule::options([
                Rule::sequence([Rule::reference("T"), Rule::keyword("+"), Rule::reference("E")]),
                Rule::reference("T"),
            ]),
        );
        grammar.define("T", Rule::terminal(Identifier));
        let result = validate(&grammar, "E");
        assert!(result.is_ok(), "{:?}", result.errors);
    }

    #[test]
    fn optional_prefixes_still_count_as_first_position() {
        let mut grammar = Grammar::new();
        grammar.define(
            "E",
            Rule::sequence([
                Rule::optional(Rule::keyword("not")),
                Rule::reference("E"),
            ]),
        );
        let result = validate(&grammar, "E");
        assert!(messages(&result.errors)
            .iter()
            .any(|m| m.contains("Rule 'E' is reachable from itself")));
    }

    #[test]
    fn warns_on_case_colliding_keywords() {
        let mut grammar = Grammar::new();
        grammar.define("A", Rule::sequence([Rule::keyword("Hello"), Rule::reference("B")]));
        grammar.define("B", Rule::sequence([Rule::keyword("hello")]));
        let result = validate(&grammar, "A");
        assert!(messages(&result.warnings)
            .iter()
            .any(|m| m.contains("'Hello' and 'hello'")));
    }

    #[test]
    fn reports_empty_combinators() {
        let mut grammar = Grammar::new();
        grammar.define("A", Rule::sequence([]));
        grammar.define("B", Rule::options([]));
        let result = validate(&grammar, "A");
        let all = messages(&result.errors);
        assert!(all.iter().any(|m| m.contains("empty sequence")));
        assert!(all.iter().any(|m| m.contains("empty options list")));
    }
}
