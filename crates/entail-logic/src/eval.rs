//! Models and expression evaluation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::expr::Expr;
use crate::symbols::Symbols;

/// A truth assignment from atom names to booleans.
///
/// Atoms missing from the model have no value; evaluation never falls back
/// to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model<'a> {
    values: BTreeMap<&'a str, bool>,
}

impl<'a> Model<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `index`-th row of the truth table over `symbols`.
    ///
    /// Symbol `i` takes bit `n - 1 - i` of `index`, so the first (smallest)
    /// symbol is the most significant and rows count up from all-false to
    /// all-true.
    pub fn from_index(symbols: &'a Symbols, index: u64) -> Self {
        let n = symbols.len();
        let values = symbols
            .iter()
            .enumerate()
            .map(|(i, name)| (name, (index >> (n - 1 - i)) & 1 == 1))
            .collect();
        Self { values }
    }

    pub fn assign(&mut self, atom: &'a str, value: bool) {
        self.values.insert(atom, value);
    }

    pub fn get(&self, atom: &str) -> Option<bool> {
        self.values.get(atom).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, bool)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }
}

impl<'a> FromIterator<(&'a str, bool)> for Model<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Model<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={}", if value { 'T' } else { 'F' })?;
        }
        f.write_str("}")
    }
}

/// Evaluation reached an atom the model does not assign.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("atom `{atom}` has no value in the model")]
pub struct UnassignedAtom {
    pub atom: String,
}

/// Evaluate `expr` under `model`.
///
/// `a => c` is `~a || c`; `a <=> c` is true when both sides agree.
pub fn evaluate(expr: &Expr, model: &Model<'_>) -> Result<bool, UnassignedAtom> {
    Ok(match expr {
        Expr::Atom { name } => model.get(name).ok_or_else(|| UnassignedAtom {
            atom: name.clone(),
        })?,
        Expr::Not { expr } => !evaluate(expr, model)?,
        Expr::And { left, right } => evaluate(left, model)? && evaluate(right, model)?,
        Expr::Or { left, right } => evaluate(left, model)? || evaluate(right, model)?,
        Expr::Implies {
            antecedent,
            consequent,
        } => !evaluate(antecedent, model)? || evaluate(consequent, model)?,
        Expr::Iff { left, right } => evaluate(left, model)? == evaluate(right, model)?,
    })
}
