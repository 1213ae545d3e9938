//! Propositional expression trees.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub type Name = String;

/// A parsed propositional expression.
///
/// Trees are immutable once built; every connective owns its operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    Atom {
        name: Name,
    },
    Not {
        expr: Box<Expr>,
    },
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Implies {
        antecedent: Box<Expr>,
        consequent: Box<Expr>,
    },
    Iff {
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn atom(name: impl Into<Name>) -> Self {
        Expr::Atom { name: name.into() }
    }

    pub fn not(expr: Expr) -> Self {
        Expr::Not {
            expr: Box::new(expr),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn implies(antecedent: Expr, consequent: Expr) -> Self {
        Expr::Implies {
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
        }
    }

    pub fn iff(left: Expr, right: Expr) -> Self {
        Expr::Iff {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The atom name, if this expression is a bare atom.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Expr::Atom { name } => Some(name),
            _ => None,
        }
    }

    /// Flatten a (possibly nested) conjunction into its conjuncts, left to right.
    ///
    /// A non-conjunction yields a single conjunct: itself.
    pub fn conjuncts(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::And { left, right } => {
                    stack.push(right);
                    stack.push(left);
                }
                other => out.push(other),
            }
        }
        out
    }

    /// All atom names occurring anywhere in the tree.
    pub fn atoms(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_atoms(&mut out);
        out
    }

    pub fn collect_atoms<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Atom { name } => {
                out.insert(name.as_str());
            }
            Expr::Not { expr } => expr.collect_atoms(out),
            Expr::And { left, right } | Expr::Or { left, right } | Expr::Iff { left, right } => {
                left.collect_atoms(out);
                right.collect_atoms(out);
            }
            Expr::Implies {
                antecedent,
                consequent,
            } => {
                antecedent.collect_atoms(out);
                consequent.collect_atoms(out);
            }
        }
    }

    /// Human-readable name of the top-level connective.
    pub fn connective(&self) -> &'static str {
        match self {
            Expr::Atom { .. } => "atom",
            Expr::Not { .. } => "negation",
            Expr::And { .. } => "conjunction",
            Expr::Or { .. } => "disjunction",
            Expr::Implies { .. } => "implication",
            Expr::Iff { .. } => "biconditional",
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Iff { .. } => 1,
            Expr::Implies { .. } => 2,
            Expr::Or { .. } => 3,
            Expr::And { .. } => 4,
            Expr::Not { .. } => 5,
            Expr::Atom { .. } => 6,
        }
    }
}

fn write_operand(
    f: &mut std::fmt::Formatter<'_>,
    operand: &Expr,
    parenthesize: bool,
) -> std::fmt::Result {
    if parenthesize {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

/// Renders with canonical ASCII operators and only the parentheses that
/// precedence and associativity require, so the output re-parses to an
/// equal tree.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prec = self.precedence();
        match self {
            Expr::Atom { name } => f.write_str(name),
            Expr::Not { expr } => {
                f.write_str("~")?;
                write_operand(f, expr, expr.precedence() < prec)
            }
            Expr::And { left, right } | Expr::Or { left, right } => {
                let op = if matches!(self, Expr::And { .. }) {
                    "&"
                } else {
                    "||"
                };
                write_operand(f, left, left.precedence() < prec)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right.precedence() <= prec)
            }
            Expr::Implies {
                antecedent: left,
                consequent: right,
            }
            | Expr::Iff { left, right } => {
                let op = if matches!(self, Expr::Implies { .. }) {
                    "=>"
                } else {
                    "<=>"
                };
                write_operand(f, left, left.precedence() <= prec)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right.precedence() < prec)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjuncts_flatten_any_nesting() {
        let e = Expr::and(
            Expr::atom("a"),
            Expr::and(Expr::and(Expr::atom("b"), Expr::atom("c")), Expr::atom("d")),
        );
        let names: Vec<_> = e.conjuncts().iter().filter_map(|c| c.as_atom()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn atoms_are_deduplicated_and_sorted() {
        let e = Expr::implies(
            Expr::and(Expr::atom("q"), Expr::not(Expr::atom("p"))),
            Expr::or(Expr::atom("p"), Expr::atom("a")),
        );
        let atoms: Vec<_> = e.atoms().into_iter().collect();
        assert_eq!(atoms, vec!["a", "p", "q"]);
    }

    #[test]
    fn display_keeps_only_required_parentheses() {
        let e = Expr::implies(
            Expr::and(Expr::atom("a"), Expr::or(Expr::atom("b"), Expr::atom("c"))),
            Expr::implies(Expr::atom("d"), Expr::not(Expr::atom("e"))),
        );
        assert_eq!(e.to_string(), "a & (b || c) => d => ~e");

        let left_nested = Expr::implies(
            Expr::implies(Expr::atom("a"), Expr::atom("b")),
            Expr::atom("c"),
        );
        assert_eq!(left_nested.to_string(), "(a => b) => c");

        let negated = Expr::not(Expr::and(Expr::atom("a"), Expr::atom("b")));
        assert_eq!(negated.to_string(), "~(a & b)");
    }
}
