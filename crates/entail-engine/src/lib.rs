//! Entailment engine: Horn compilation and the three solvers.
//!
//! - `TT`: exhaustive model enumeration, any propositional KB
//! - `FC`: forward chaining over Horn clauses
//! - `BC`: backward chaining over Horn clauses
//!
//! A query atom that appears nowhere in the KB is false under FC and BC
//! (closed world): it is simply never derived.

pub mod backward;
pub mod config;
pub mod error;
pub mod forward;
pub mod horn;
pub mod inferred;
pub mod truth_table;

use std::str::FromStr;

use entail_logic::{parse_problem, Name, Problem};
use serde::{Deserialize, Serialize};

pub use backward::backward_chain;
pub use config::{EngineConfig, TruthTableBudget};
pub use error::EngineError;
pub use forward::forward_chain;
pub use horn::{compile_horn, query_goals, HornClause, HornProgram, RuleId, UnsupportedShape};
pub use inferred::InferredSet;
pub use truth_table::{tt_entails, Entailment, MAX_SYMBOLS};

/// Result of a chaining solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub holds: bool,
    /// Sorted. FC: every inferred atom. BC: the atoms the proof used.
    pub atoms: Vec<Name>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "TT")]
    TruthTable,
    #[serde(rename = "FC")]
    ForwardChaining,
    #[serde(rename = "BC")]
    BackwardChaining,
}

impl Method {
    pub const ALL: [Method; 3] = [
        Method::TruthTable,
        Method::ForwardChaining,
        Method::BackwardChaining,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Method::TruthTable => "TT",
            Method::ForwardChaining => "FC",
            Method::BackwardChaining => "BC",
        }
    }
}

impl FromStr for Method {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownMethod {
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// TT: models satisfying both KB and query.
    ModelCount { count: u64 },
    /// FC/BC: sorted atoms.
    Atoms { atoms: Vec<Name> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub method: Method,
    pub entailed: bool,
    pub evidence: Evidence,
}

impl Verdict {
    fn from_entailment(result: Entailment) -> Self {
        Verdict {
            method: Method::TruthTable,
            entailed: result.holds,
            evidence: Evidence::ModelCount {
                count: result.model_count(),
            },
        }
    }

    fn from_derivation(method: Method, result: Derivation) -> Self {
        Verdict {
            method,
            entailed: result.holds,
            evidence: Evidence::Atoms {
                atoms: result.atoms,
            },
        }
    }
}

/// `YES: <n>`, `YES: a, b, c` or `NO`.
impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.entailed {
            return f.write_str("NO");
        }
        match &self.evidence {
            Evidence::ModelCount { count } => write!(f, "YES: {count}"),
            Evidence::Atoms { atoms } => write!(f, "YES: {}", atoms.join(", ")),
        }
    }
}

/// Runs one method against a parsed problem. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ask(&self, problem: &Problem, method: Method) -> Result<Verdict, EngineError> {
        tracing::debug!(%method, clauses = problem.kb.len(), query = %problem.query, "ask");
        match method {
            Method::TruthTable => {
                let result = tt_entails(&problem.kb, &problem.query, &self.config.truth_table)?;
                Ok(Verdict::from_entailment(result))
            }
            Method::ForwardChaining | Method::BackwardChaining => {
                let program = compile_horn(&problem.kb)?;
                let goals = query_goals(&problem.query)?;
                let derivation = if method == Method::ForwardChaining {
                    forward_chain(&program, &goals)
                } else {
                    backward_chain(&program, &goals)
                };
                Ok(Verdict::from_derivation(method, derivation))
            }
        }
    }

    /// Parse a `TELL ... ASK ...` problem and answer it.
    pub fn ask_text(&self, text: &str, method: Method) -> Result<Verdict, EngineError> {
        let problem = parse_problem(text)?;
        self.ask(&problem, method)
    }
}
