//! Forward chaining: the least fixed point of a Horn program.

use std::collections::VecDeque;

use crate::horn::HornProgram;
use crate::inferred::InferredSet;
use crate::Derivation;

/// Derive everything the program entails, then check `goals` against it.
///
/// Each rule keeps a count of premises not yet seen on the agenda; a rule
/// fires once, when its count reaches zero. Each atom enters the agenda at
/// most once, so the loop runs at most `facts + rules` times.
pub fn forward_chain(program: &HornProgram, goals: &[&str]) -> Derivation {
    let by_premise = program.rules_by_antecedent();
    let mut remaining: Vec<usize> = program
        .rules()
        .iter()
        .map(|rule| rule.antecedents.len())
        .collect();

    let mut inferred = InferredSet::new();
    let mut agenda = VecDeque::new();
    for fact in program.facts() {
        if inferred.insert(fact) {
            agenda.push_back(fact.as_str());
        }
    }

    let mut pops = 0usize;
    while let Some(atom) = agenda.pop_front() {
        pops += 1;
        let Some(rule_ids) = by_premise.get(atom) else {
            continue;
        };
        for &id in rule_ids {
            let count = &mut remaining[id.index()];
            *count -= 1;
            if *count > 0 {
                continue;
            }
            let Some(rule) = program.rule(id) else {
                continue;
            };
            if inferred.insert(&rule.consequent) {
                tracing::trace!(rule = %id, atom = %rule.consequent, "rule fired");
                agenda.push_back(rule.consequent.as_str());
            }
        }
    }

    let holds = goals.iter().all(|goal| inferred.contains(goal));
    tracing::debug!(
        holds,
        pops,
        inferred = inferred.len(),
        "forward chaining done"
    );

    Derivation {
        holds,
        atoms: inferred.into_sorted_vec(),
    }
}
