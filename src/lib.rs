pub use crate::cst::{Cst, CstNode};
pub use crate::diagnostics::{ErrorContext, GramaryeError};
pub use crate::engine::Parser;
pub use crate::grammar::{Grammar, Rule};

pub mod cli;
pub mod cst;
pub mod diagnostics;
pub mod engine;
pub mod grammar;
pub mod syntax;
