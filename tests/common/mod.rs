#![allow(dead_code)]

//! Shared grammar builders for the Gramarye integration test suite.
//!
//! Each builder returns a small, self-contained grammar exercising one
//! corner of the engine. Tests construct a `Parser` over these and assert
//! on the resulting trees or diagnostics.

use gramarye::grammar::terminals::{Identifier, NumberLiteral};
use gramarye::{Grammar, Rule};

/// `hello <noun>` — the smallest capture-over-sequence grammar.
pub fn hello_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define(
        "hello",
        Rule::capture(
            "hello",
            Rule::sequence([Rule::keyword("hello"), Rule::reference("noun")]),
        ),
    );
    grammar.define("noun", Rule::capture("noun", Rule::terminal(Identifier)));
    grammar
}

/// The hello grammar extended to a SCRIPT of repeated statements.
pub fn hello_script_grammar() -> Grammar {
    let mut grammar = hello_grammar();
    grammar.define("SCRIPT", Rule::repeat(Rule::reference("hello")));
    grammar
}

/// Right-recursive arithmetic with two precedence layers.
pub fn arithmetic_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define(
        "ADDITIVE",
        Rule::options([
            Rule::capture(
                "ADD",
                Rule::sequence([
                    Rule::reference("MULTIPLICATIVE"),
                    Rule::keyword("+"),
                    Rule::reference("ADDITIVE"),
                ]),
            ),
            Rule::capture(
                "SUBTRACT",
                Rule::sequence([
                    Rule::reference("MULTIPLICATIVE"),
                    Rule::keyword("-"),
                    Rule::reference("ADDITIVE"),
                ]),
            ),
            Rule::reference("MULTIPLICATIVE"),
        ]),
    );
    grammar.define(
        "MULTIPLICATIVE",
        Rule::options([
            Rule::capture(
                "MULTIPLY",
                Rule::sequence([
                    Rule::reference("VALUE"),
                    Rule::keyword("*"),
                    Rule::reference("MULTIPLICATIVE"),
                ]),
            ),
            Rule::capture(
                "DIVIDE",
                Rule::sequence([
                    Rule::reference("VALUE"),
                    Rule::keyword("/"),
                    Rule::reference("MULTIPLICATIVE"),
                ]),
            ),
            Rule::capture(
                "MODULO",
                Rule::sequence([
                    Rule::reference("VALUE"),
                    Rule::keyword("%"),
                    Rule::reference("MULTIPLICATIVE"),
                ]),
            ),
            Rule::reference("VALUE"),
        ]),
    );
    grammar.define("VALUE", Rule::terminal(NumberLiteral));
    grammar
}

/// `if c then { ... }` with an `else` form, for error-selection tests.
pub fn conditional_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define("SCRIPT", Rule::repeat(Rule::reference("STATEMENT")));
    grammar.define(
        "STATEMENT",
        Rule::options([Rule::reference("IF_ELSE"), Rule::reference("IF")]),
    );
    grammar.define(
        "IF_ELSE",
        Rule::capture(
            "IF_ELSE",
            Rule::sequence([
                Rule::keyword("if"),
                Rule::reference("COND"),
                Rule::keyword("then"),
                Rule::reference("BLOCK"),
                Rule::keyword("else"),
                Rule::reference("BLOCK"),
            ]),
        ),
    );
    grammar.define(
        "IF",
        Rule::capture(
            "IF",
            Rule::sequence([
                Rule::keyword("if"),
                Rule::reference("COND"),
                Rule::keyword("then"),
                Rule::reference("BLOCK"),
            ]),
        ),
    );
    grammar.define("COND", Rule::terminal(Identifier));
    grammar.define(
        "BLOCK",
        Rule::sequence([
            Rule::keyword("{"),
            Rule::repeat(Rule::reference("STATEMENT")),
            Rule::keyword("}"),
        ]),
    );
    grammar
}

/// `say <identifier>` statements, for diagnostics tests.
pub fn say_grammar() -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define("SCRIPT", Rule::repeat(Rule::reference("STATEMENT")));
    grammar.define(
        "STATEMENT",
        Rule::capture(
            "say",
            Rule::sequence([Rule::keyword("say"), Rule::reference("EXPRESSION")]),
        ),
    );
    grammar.define("EXPRESSION", Rule::terminal(Identifier));
    grammar
}
