//! Grow-only atom set used by the chaining solvers.

use std::collections::BTreeSet;

use entail_logic::Name;

/// Atoms established true during one solve. Grows only; nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredSet {
    atoms: BTreeSet<Name>,
}

impl InferredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `atom` was not already present.
    pub fn insert(&mut self, atom: &str) -> bool {
        if self.atoms.contains(atom) {
            false
        } else {
            self.atoms.insert(atom.to_string())
        }
    }

    pub fn contains(&self, atom: &str) -> bool {
        self.atoms.contains(atom)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.atoms.iter().map(String::as_str)
    }

    /// Consume the set, yielding its atoms in sorted order.
    pub fn into_sorted_vec(self) -> Vec<Name> {
        self.atoms.into_iter().collect()
    }
}
