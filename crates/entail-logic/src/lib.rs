//! Propositional logic front end.
//!
//! This crate owns everything that happens before a solver runs:
//!
//! - `lexer`: a `nom` tokenizer over clause text (with operator aliases)
//! - `parser`: a precedence-aware parser producing `Expr` trees
//! - `problem`: the `TELL ... ASK ...` problem reader
//! - `eval`: `Model` and the pure expression evaluator
//! - `symbols`: the sorted atom set of a knowledge base plus query
//!
//! Precedence, highest to lowest: `~`, `&`, `||`, `=>`, `<=>`.
//! `&` and `||` associate to the left, `=>` and `<=>` to the right.

pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod problem;
pub mod symbols;

pub use error::{FormatError, Location, Marker, ParseError, SyntaxError, SyntaxErrorKind};
pub use eval::{evaluate, Model, UnassignedAtom};
pub use expr::{Expr, Name};
pub use parser::{parse_clause, parse_query};
pub use problem::{parse_problem, KnowledgeBase, Problem};
pub use symbols::Symbols;
