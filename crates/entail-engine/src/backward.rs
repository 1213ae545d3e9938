//! Backward chaining: goal-directed proof search with a cycle guard.
//!
//! The search is depth-first but runs on an explicit stack of frames, so
//! long rule chains cost heap, not call stack. The atoms of the open frames
//! are the ones currently being proved; meeting one of them again cuts that
//! branch. A cut is not a genuine failure: the atom may still be provable
//! once the frame higher up finishes. So a failed goal is only memoized
//! when every cut below it pointed at the goal itself or deeper.

use std::collections::{BTreeMap, BTreeSet};

use crate::horn::{HornProgram, RuleId};
use crate::inferred::InferredSet;
use crate::Derivation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Justification {
    Fact,
    Rule(RuleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Outcome {
    proved: bool,
    /// Shallowest stack depth a cycle cut pointed at, if any.
    cut: Option<usize>,
}

impl Outcome {
    const PROVED: Outcome = Outcome {
        proved: true,
        cut: None,
    };
    const FAILED: Outcome = Outcome {
        proved: false,
        cut: None,
    };
}

fn shallower(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// One open goal: which rule for `atom` is being tried, and how many of
/// that rule's premises are already proved.
#[derive(Debug)]
struct Frame<'p> {
    atom: &'p str,
    rules: Vec<RuleId>,
    rule: usize,
    premise: usize,
    cut: Option<usize>,
}

struct Prover<'p> {
    program: &'p HornProgram,
    by_head: BTreeMap<&'p str, Vec<RuleId>>,
    proven: BTreeMap<&'p str, Justification>,
    failed: BTreeSet<&'p str>,
    frames: Vec<Frame<'p>>,
    /// Depth of each atom that has an open frame.
    open: BTreeMap<&'p str, usize>,
    steps: usize,
}

impl<'p> Prover<'p> {
    fn new(program: &'p HornProgram) -> Self {
        Self {
            program,
            by_head: program.rules_by_consequent(),
            proven: BTreeMap::new(),
            failed: BTreeSet::new(),
            frames: Vec::new(),
            open: BTreeMap::new(),
            steps: 0,
        }
    }

    /// Settle `atom` immediately if possible, otherwise open a frame for it.
    fn enter(&mut self, atom: &'p str) -> Option<Outcome> {
        self.steps += 1;

        if self.proven.contains_key(atom) {
            return Some(Outcome::PROVED);
        }
        if self.program.is_fact(atom) {
            self.proven.insert(atom, Justification::Fact);
            tracing::trace!(atom, "fact");
            return Some(Outcome::PROVED);
        }
        if self.failed.contains(atom) {
            return Some(Outcome::FAILED);
        }
        if let Some(&depth) = self.open.get(atom) {
            tracing::trace!(atom, depth, "cycle cut");
            return Some(Outcome {
                proved: false,
                cut: Some(depth),
            });
        }

        let depth = self.frames.len();
        tracing::trace!(atom, depth, "proving");
        self.open.insert(atom, depth);
        self.frames.push(Frame {
            atom,
            rules: self.by_head.get(atom).cloned().unwrap_or_default(),
            rule: 0,
            premise: 0,
            cut: None,
        });
        None
    }

    fn succeed(&mut self, id: RuleId) -> Outcome {
        if let Some(frame) = self.frames.pop() {
            self.open.remove(frame.atom);
            self.proven.insert(frame.atom, Justification::Rule(id));
            tracing::trace!(atom = frame.atom, rule = %id, "proved");
        }
        Outcome::PROVED
    }

    fn fail(&mut self) -> Outcome {
        let depth = self.frames.len().saturating_sub(1);
        let Some(frame) = self.frames.pop() else {
            return Outcome::FAILED;
        };
        self.open.remove(frame.atom);
        match frame.cut {
            Some(shallowest) if shallowest < depth => Outcome {
                proved: false,
                cut: Some(shallowest),
            },
            _ => {
                self.failed.insert(frame.atom);
                tracing::trace!(atom = frame.atom, "failed");
                Outcome::FAILED
            }
        }
    }

    fn prove(&mut self, goal: &'p str) -> bool {
        let mut last: Option<Outcome> = match self.enter(goal) {
            Some(outcome) => return outcome.proved,
            None => None,
        };

        let program = self.program;
        while let Some(frame) = self.frames.last_mut() {
            if let Some(child) = last.take() {
                frame.cut = shallower(frame.cut, child.cut);
                if child.proved {
                    frame.premise += 1;
                } else {
                    frame.rule += 1;
                    frame.premise = 0;
                }
            }

            let Some(&id) = frame.rules.get(frame.rule) else {
                last = Some(self.fail());
                continue;
            };
            let Some(rule) = program.rule(id) else {
                frame.rule += 1;
                frame.premise = 0;
                continue;
            };
            last = match rule.antecedents.iter().nth(frame.premise) {
                Some(premise) => self.enter(premise.as_str()),
                None => Some(self.succeed(id)),
            };
        }

        last.is_some_and(|outcome| outcome.proved)
    }

    /// Every atom the proofs of `goals` rest on, goals included.
    fn relevant(&self, goals: &[&str]) -> InferredSet {
        let mut relevant = InferredSet::new();
        let mut pending: Vec<&str> = goals.to_vec();
        while let Some(atom) = pending.pop() {
            let Some(justification) = self.proven.get(atom) else {
                continue;
            };
            if !relevant.insert(atom) {
                continue;
            }
            if let Justification::Rule(id) = justification {
                if let Some(rule) = self.program.rule(*id) {
                    pending.extend(rule.antecedents.iter().map(String::as_str));
                }
            }
        }
        relevant
    }
}

/// Try to prove every goal from the program's facts and rules.
///
/// On success `atoms` holds exactly the atoms used by the proofs.
pub fn backward_chain(program: &HornProgram, goals: &[&str]) -> Derivation {
    let mut prover = Prover::new(program);

    let mut proved = Vec::with_capacity(goals.len());
    let mut holds = true;
    for &goal in goals {
        if prover.prove(goal) {
            proved.push(goal);
        } else {
            holds = false;
            break;
        }
    }

    let relevant = prover.relevant(&proved);
    tracing::debug!(
        holds,
        steps = prover.steps,
        proven = prover.proven.len(),
        relevant = relevant.len(),
        "backward chaining done"
    );

    Derivation {
        holds,
        atoms: relevant.into_sorted_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::forward_chain;
    use crate::horn::compile_horn;
    use entail_logic::{parse_clause, Expr, KnowledgeBase};

    fn program(clauses: &[&str]) -> HornProgram {
        let kb: KnowledgeBase = clauses
            .iter()
            .map(|c| parse_clause(c).expect("parse"))
            .collect();
        compile_horn(&kb).expect("horn")
    }

    fn atoms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn relevant_set_is_the_proof_support() {
        let p = program(&[
            "p2=> p3", "p3 => p1", "c => e", "b&e => f", "f&g => h", "p1=>d", "p1&p3 => c", "a",
            "b", "p2",
        ]);
        let result = backward_chain(&p, &["d"]);
        assert!(result.holds);
        assert_eq!(result.atoms, atoms(&["d", "p1", "p2", "p3"]));
    }

    #[test]
    fn two_atom_cycle_terminates_with_no() {
        let result = backward_chain(&program(&["a => b", "b => a"]), &["a"]);
        assert!(!result.holds);
        assert!(result.atoms.is_empty());
    }

    #[test]
    fn self_loop_terminates_with_no() {
        let result = backward_chain(&program(&["a => a"]), &["a"]);
        assert!(!result.holds);
    }

    #[test]
    fn single_fact() {
        let result = backward_chain(&program(&["p"]), &["p"]);
        assert!(result.holds);
        assert_eq!(result.atoms, atoms(&["p"]));
    }

    #[test]
    fn unknown_query_atom_is_not_entailed() {
        let result = backward_chain(&program(&["p", "p => q"]), &["z"]);
        assert!(!result.holds);
    }

    #[test]
    fn later_rule_succeeds_after_earlier_one_fails() {
        let p = program(&["x => q", "p => q", "p"]);
        let result = backward_chain(&p, &["q"]);
        assert!(result.holds);
        assert_eq!(result.atoms, atoms(&["p", "q"]));
    }

    #[test]
    fn cut_does_not_poison_the_memo() {
        // Proving `a` first tries `b`, whose only route loops back to `a`
        // and is cut. `b` must not be recorded as unprovable: once `a` is
        // proved through `c`, the second goal `b` follows from it.
        let p = program(&["b => a", "c => a", "a => b", "c"]);
        let result = backward_chain(&p, &["a", "b"]);
        assert!(result.holds);
        assert_eq!(result.atoms, atoms(&["a", "b", "c"]));
    }

    #[test]
    fn cycle_through_a_provable_branch() {
        let p = program(&["a & d => b", "b => a", "e => a", "e", "d"]);
        let result = backward_chain(&p, &["b"]);
        assert!(result.holds);
        assert_eq!(result.atoms, atoms(&["a", "b", "d", "e"]));
    }

    #[test]
    fn agrees_with_forward_chaining_on_every_atom() {
        let p = program(&[
            "a => b", "b => c", "c => a", "d & a => e", "f => d", "f", "g & h => i", "h",
        ]);
        for atom in ["a", "b", "c", "d", "e", "f", "g", "h", "i"] {
            assert_eq!(
                backward_chain(&p, &[atom]).holds,
                forward_chain(&p, &[atom]).holds,
                "atom {atom}"
            );
        }
    }

    fn chain(links: usize, closing: Option<Expr>) -> HornProgram {
        let rules = (1..=links).map(|i| {
            Expr::implies(Expr::atom(format!("a{}", i - 1)), Expr::atom(format!("a{i}")))
        });
        let kb: KnowledgeBase = closing.into_iter().chain(rules).collect();
        compile_horn(&kb).expect("horn")
    }

    #[test]
    fn long_chain_is_proved_on_the_heap() {
        let links = 50_000;
        let p = chain(links, Some(Expr::atom("a0")));
        let goal = format!("a{links}");

        let result = backward_chain(&p, &[goal.as_str()]);
        assert!(result.holds);
        assert_eq!(result.atoms.len(), links + 1);
        assert!(forward_chain(&p, &[goal.as_str()]).holds);
    }

    #[test]
    fn long_cycle_without_facts_fails() {
        let links = 50_000;
        let closing = Expr::implies(Expr::atom(format!("a{links}")), Expr::atom("a0"));
        let p = chain(links, Some(closing));
        let goal = format!("a{links}");

        let result = backward_chain(&p, &[goal.as_str()]);
        assert!(!result.holds);
        assert!(result.atoms.is_empty());
        assert!(!forward_chain(&p, &[goal.as_str()]).holds);
    }
}
