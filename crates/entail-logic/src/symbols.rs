//! Symbol extraction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::expr::{Expr, Name};
use crate::problem::KnowledgeBase;

/// The sorted, duplicate-free set of atoms in scope for one problem.
///
/// Computed once, before any solver runs; every `Model` built for the
/// problem is total over exactly these names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbols {
    names: Vec<Name>,
}

impl Symbols {
    /// Union of the atoms of every KB clause and the query.
    pub fn collect(kb: &KnowledgeBase, query: &Expr) -> Self {
        Self::of(kb.iter().chain(std::iter::once(query)))
    }

    pub fn of<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Self {
        let mut set: BTreeSet<&str> = BTreeSet::new();
        for expr in exprs {
            expr.collect_atoms(&mut set);
        }
        Self {
            names: set.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .binary_search_by(|entry| entry.as_str().cmp(name))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[Name] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_clause, parse_query};

    #[test]
    fn union_of_kb_and_query_atoms() {
        let kb = KnowledgeBase::new(vec![
            parse_clause("p2 => p3").expect("parse"),
            parse_clause("p3 => p1").expect("parse"),
        ]);
        let query = parse_query("p2 => p4").expect("parse");
        let symbols = Symbols::collect(&kb, &query);
        assert_eq!(symbols.iter().collect::<Vec<_>>(), vec!["p1", "p2", "p3", "p4"]);
        assert!(symbols.contains("p4"));
        assert!(!symbols.contains("p5"));
    }

    #[test]
    fn empty_kb_uses_query_atoms_only() {
        let query = parse_query("p || ~p").expect("parse");
        let symbols = Symbols::collect(&KnowledgeBase::default(), &query);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols.as_slice(), ["p".to_string()]);
    }

    #[test]
    fn no_expressions_means_no_symbols() {
        let symbols = Symbols::of(std::iter::empty::<&Expr>());
        assert!(symbols.is_empty());
        assert!(symbols.as_slice().is_empty());
    }
}
