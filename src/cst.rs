//! Concrete syntax tree values produced by the parser engine.
//!
//! The tree mirrors the grammar's rule structure: every rule the author
//! marked as a capture contributes a tagged `CstNode`, sequences and
//! repetitions contribute lists, and terminal callbacks contribute scalars.
//! The whole tree serializes to JSON-compatible records.

use serde::Serialize;

/// A value in the concrete syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cst {
    Node(CstNode),
    List(Vec<Cst>),
    String(String),
    Number(f64),
}

/// A tagged wrapper emitted by a capture rule.
///
/// `line` and `column` are recorded only when the parser runs in debug mode
/// and point at the first token that produced the node. A capture whose
/// inner shape matched without producing a value carries an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CstNode {
    #[serde(rename = "type")]
    pub tag: String,
    pub value: Box<Cst>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Cst {
    /// Wraps a value in a node tagged `tag`, without position data.
    pub fn node(tag: impl Into<String>, value: Cst) -> Cst {
        Cst::Node(CstNode {
            tag: tag.into(),
            value: Box::new(value),
            line: None,
            column: None,
        })
    }

    pub fn as_node(&self) -> Option<&CstNode> {
        match self {
            Cst::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Cst]> {
        match self {
            Cst::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cst::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cst::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the type name of this value as a string (for diagnostics and
    /// debugging).
    pub fn type_name(&self) -> &'static str {
        match self {
            Cst::Node(_) => "Node",
            Cst::List(_) => "List",
            Cst::String(_) => "String",
            Cst::Number(_) => "Number",
        }
    }

    /// Pretty-prints the value as a compact single-line string.
    pub fn pretty(&self) -> String {
        match self {
            Cst::Node(node) => format!("{}({})", node.tag, node.value.pretty()),
            Cst::List(items) => {
                let inner = items
                    .iter()
                    .map(|item| item.pretty())
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({inner})")
            }
            Cst::String(text) => format!("\"{text}\""),
            Cst::Number(number) => number.to_string(),
        }
    }
}

impl std::fmt::Display for Cst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
