//! Horn-clause compilation.
//!
//! Forward and backward chaining only understand two clause shapes:
//!
//! - a fact: a bare atom, `p`
//! - a rule: a conjunction of atoms implying an atom, `a & b & c => q`
//!
//! `compile_horn` either compiles every clause of the KB or rejects the KB
//! at the first clause of any other shape.

use std::collections::{BTreeMap, BTreeSet};

use entail_logic::{Expr, KnowledgeBase, Name};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::EngineError;

/// Stable rule identifier: the rule's position in `HornProgram::rules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(usize);

impl RuleId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HornClause {
    pub id: RuleId,
    /// Index of the KB clause this rule was compiled from.
    pub clause_index: usize,
    /// Distinct positive premises.
    pub antecedents: BTreeSet<Name>,
    pub consequent: Name,
}

/// Why a clause is not a Horn clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsupportedShape {
    #[error("negation is not allowed")]
    Negation,
    #[error("disjunction is not allowed")]
    Disjunction,
    #[error("biconditional is not allowed")]
    Biconditional,
    #[error("implication inside a premise is not allowed")]
    NestedImplication,
    #[error("consequent must be a single atom, found a {0}")]
    NonAtomicConsequent(&'static str),
    #[error("a conjunction on its own is neither a fact nor a rule")]
    Conjunction,
}

impl UnsupportedShape {
    fn of(expr: &Expr) -> Self {
        match expr {
            Expr::Not { .. } => UnsupportedShape::Negation,
            Expr::Or { .. } => UnsupportedShape::Disjunction,
            Expr::Iff { .. } => UnsupportedShape::Biconditional,
            Expr::Implies { .. } => UnsupportedShape::NestedImplication,
            Expr::And { .. } | Expr::Atom { .. } => UnsupportedShape::Conjunction,
        }
    }
}

enum Compiled<'a> {
    Fact(&'a str),
    Rule {
        antecedents: BTreeSet<Name>,
        consequent: &'a str,
    },
}

fn compile_clause(expr: &Expr) -> Result<Compiled<'_>, UnsupportedShape> {
    match expr {
        Expr::Atom { name } => Ok(Compiled::Fact(name)),
        Expr::Implies {
            antecedent,
            consequent,
        } => {
            let consequent = consequent
                .as_atom()
                .ok_or(UnsupportedShape::NonAtomicConsequent(consequent.connective()))?;
            let antecedents = antecedent
                .conjuncts()
                .into_iter()
                .map(|premise| {
                    premise
                        .as_atom()
                        .map(str::to_string)
                        .ok_or_else(|| UnsupportedShape::of(premise))
                })
                .collect::<Result<BTreeSet<_>, _>>()?;
            Ok(Compiled::Rule {
                antecedents,
                consequent,
            })
        }
        other => Err(UnsupportedShape::of(other)),
    }
}

/// A KB compiled to facts and Horn rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HornProgram {
    /// Distinct facts in KB order.
    facts: Vec<Name>,
    rules: Vec<HornClause>,
    #[serde(skip)]
    fact_set: BTreeSet<Name>,
}

impl HornProgram {
    pub fn facts(&self) -> &[Name] {
        &self.facts
    }

    pub fn rules(&self) -> &[HornClause] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&HornClause> {
        self.rules.get(id.index())
    }

    pub fn is_fact(&self, atom: &str) -> bool {
        self.fact_set.contains(atom)
    }

    /// Rules grouped by consequent, each group in KB order.
    pub fn rules_by_consequent(&self) -> BTreeMap<&str, Vec<RuleId>> {
        let mut index: BTreeMap<&str, Vec<RuleId>> = BTreeMap::new();
        for rule in &self.rules {
            index.entry(rule.consequent.as_str()).or_default().push(rule.id);
        }
        index
    }

    /// Rules grouped by premise, each group in KB order.
    pub fn rules_by_antecedent(&self) -> BTreeMap<&str, Vec<RuleId>> {
        let mut index: BTreeMap<&str, Vec<RuleId>> = BTreeMap::new();
        for rule in &self.rules {
            for premise in &rule.antecedents {
                index.entry(premise.as_str()).or_default().push(rule.id);
            }
        }
        index
    }
}

/// Compile every KB clause to a fact or a rule, or reject the whole KB.
pub fn compile_horn(kb: &KnowledgeBase) -> Result<HornProgram, EngineError> {
    let mut program = HornProgram::default();

    for (clause_index, clause) in kb.iter().enumerate() {
        let compiled =
            compile_clause(clause).map_err(|shape| EngineError::UnsupportedClause {
                clause_index,
                clause: clause.to_string(),
                shape,
            })?;

        match compiled {
            Compiled::Fact(atom) => {
                if program.fact_set.insert(atom.to_string()) {
                    program.facts.push(atom.to_string());
                }
            }
            Compiled::Rule {
                antecedents,
                consequent,
            } => {
                let id = RuleId(program.rules.len());
                program.rules.push(HornClause {
                    id,
                    clause_index,
                    antecedents,
                    consequent: consequent.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        facts = program.facts.len(),
        rules = program.rules.len(),
        "compiled knowledge base to Horn form"
    );
    Ok(program)
}

/// The atoms a Horn query asks for: an atom, or a conjunction of atoms.
pub fn query_goals(query: &Expr) -> Result<Vec<&str>, EngineError> {
    query
        .conjuncts()
        .into_iter()
        .map(|conjunct| {
            conjunct.as_atom().ok_or_else(|| EngineError::UnsupportedQuery {
                query: query.to_string(),
            })
        })
        .collect()
}
