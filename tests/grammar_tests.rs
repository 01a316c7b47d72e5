//! Integration tests for JSON-defined grammars and grammar validation.

use gramarye::{Cst, Grammar, Parser};

const HELLO_GRAMMAR: &str = r#"{
    "SCRIPT":    { "type": "STATEMENT", "repeat": true },
    "STATEMENT": { "type": "hello", "capture": true,
                   "sequence": ["hello", { "type": "noun" }] },
    "noun":      { "type": "noun", "capture": true, "parse": "identifier" }
}"#;

#[test]
fn test_json_grammar_parses_like_a_rust_built_one() {
    let grammar = Grammar::from_json(HELLO_GRAMMAR).unwrap();
    let parser = Parser::new(grammar);
    let cst = parser.parse("hello world hello moon").unwrap().unwrap();
    assert_eq!(
        cst,
        Cst::List(vec![
            Cst::node("hello", Cst::node("noun", Cst::String("world".into()))),
            Cst::node("hello", Cst::node("noun", Cst::String("moon".into()))),
        ])
    );
}

#[test]
fn test_json_grammar_with_options_and_terminals() {
    let grammar = Grammar::from_json(
        r#"{
            "SCRIPT": { "type": "VALUE", "repeat": true },
            "VALUE":  { "type": "VALUE", "capture": true,
                        "options": [
                            { "parse": "number" },
                            { "parse": "string" },
                            { "parse": "identifier" }
                        ] }
        }"#,
    )
    .unwrap();
    let parser = Parser::new(grammar);
    let cst = parser.parse("12 \"text\" name").unwrap().unwrap();
    assert_eq!(
        cst,
        Cst::List(vec![
            Cst::node("VALUE", Cst::Number(12.0)),
            Cst::node("VALUE", Cst::String("text".into())),
            Cst::node("VALUE", Cst::String("name".into())),
        ])
    );
}

#[test]
fn test_json_grammar_with_separated_repetition() {
    let grammar = Grammar::from_json(
        r#"{
            "SCRIPT": { "type": "NAMES", "capture": true,
                        "repeat": true, "separator": "and" },
            "NAMES":  { "parse": "identifier" }
        }"#,
    )
    .unwrap();
    let parser = Parser::new(grammar);
    let cst = parser.parse("salt and pepper").unwrap().unwrap();
    assert_eq!(
        cst,
        Cst::node(
            "NAMES",
            Cst::List(vec![Cst::String("salt".into()), Cst::String("pepper".into())])
        )
    );
}

#[test]
fn test_unknown_record_fields_are_tolerated() {
    // Rule records are open; extra fields are author notes, not errors.
    let grammar = Grammar::from_json(
        r#"{ "SCRIPT": { "parse": "number", "note": "entry point" } }"#,
    )
    .unwrap();
    let parser = Parser::new(grammar);
    assert_eq!(parser.parse("7").unwrap(), Some(Cst::Number(7.0)));
}

#[test]
fn test_validation_passes_for_a_sound_grammar() {
    let grammar = Grammar::from_json(HELLO_GRAMMAR).unwrap();
    let result = grammar.validate("SCRIPT");
    assert!(result.is_ok(), "{:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validation_flags_undefined_references() {
    let grammar = Grammar::from_json(
        r#"{ "SCRIPT": { "type": "STATEMENT", "repeat": true } }"#,
    )
    .unwrap();
    let result = grammar.validate("SCRIPT");
    assert!(!result.is_ok());
    assert!(result.errors[0]
        .to_string()
        .contains("references undefined rule 'STATEMENT'"));
}

#[test]
fn test_validation_flags_self_referential_capture() {
    // `{"type": "X", "capture": true}` lowers to a capture around a
    // reference to itself, which can never consume input.
    let grammar =
        Grammar::from_json(r#"{ "X": { "type": "X", "capture": true } }"#).unwrap();
    let result = grammar.validate("X");
    assert!(result
        .errors
        .iter()
        .any(|error| error.to_string().contains("reachable from itself")));
}

#[test]
fn test_invalid_json_is_a_grammar_error() {
    let error = Grammar::from_json("{ not json").unwrap_err();
    assert!(error.to_string().contains("Invalid grammar JSON"));
}
