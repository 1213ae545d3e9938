use entail_logic::{ParseError, UnassignedAtom};
use thiserror::Error;

use crate::horn::UnsupportedShape;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A KB clause that forward/backward chaining cannot use. The whole KB
    /// is rejected; no solver runs on the remaining clauses.
    #[error("unsupported clause {clause_index} (`{clause}`): {shape}")]
    UnsupportedClause {
        clause_index: usize,
        clause: String,
        shape: UnsupportedShape,
    },

    #[error("unsupported query `{query}`: forward and backward chaining need an atom or a conjunction of atoms")]
    UnsupportedQuery { query: String },

    #[error("unknown method `{name}` (expected TT, FC or BC)")]
    UnknownMethod { name: String },

    #[error("truth table over {symbols} symbols is too large (at most {max} are supported)")]
    TooManySymbols { symbols: usize, max: usize },

    #[error("truth table needs {required} models but the budget allows {limit}")]
    ModelLimit { required: u64, limit: u64 },

    #[error("truth table timed out after {limit_ms} ms ({visited} of {total} models visited)")]
    Timeout {
        visited: u64,
        total: u64,
        limit_ms: u64,
    },

    #[error("internal error: {0}")]
    Unassigned(#[from] UnassignedAtom),
}
