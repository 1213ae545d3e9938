//! Error types for the TELL/ASK reader and the expression parser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a piece of expression text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum Location {
    /// A standalone expression (not read from a problem file).
    Expression,
    /// The `index`-th non-empty clause of the TELL section (0-based).
    Clause { index: usize },
    /// The ASK section.
    Query,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Expression => write!(f, "expression"),
            Location::Clause { index } => write!(f, "clause {index}"),
            Location::Query => write!(f, "query"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("empty expression")]
    EmptyExpression,
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("operator `{operator}` is missing an operand")]
    MissingOperand { operator: String },
    #[error("empty parentheses")]
    EmptyParens,
    #[error("`(` is never closed")]
    UnclosedParen,
    #[error("`)` has no matching `(`")]
    UnmatchedParen,
    #[error("unexpected `{found}`")]
    UnexpectedToken { found: String },
    #[error("ASK section holds more than one expression")]
    MultipleQueries,
    #[error("expression nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// A malformed expression, located by a character offset into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error in {location} at offset {offset}: {kind} (in `{text}`)")]
pub struct SyntaxError {
    pub location: Location,
    pub text: String,
    pub offset: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(text: &str, offset: usize, kind: SyntaxErrorKind) -> Self {
        Self {
            location: Location::Expression,
            text: text.to_string(),
            offset,
            kind,
        }
    }

    /// Re-tag the error with the section it was read from.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    Tell,
    Ask,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Tell => "TELL",
            Marker::Ask => "ASK",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The problem text does not have the `TELL ... ASK ...` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("missing `{marker}` section marker")]
    MissingMarker { marker: Marker },
    #[error("duplicate `{marker}` section marker")]
    DuplicateMarker { marker: Marker },
    #[error("`ASK` section appears before `TELL` section")]
    Misordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
