//! Entailment by exhaustive model enumeration.
//!
//! `KB ⊨ q` holds iff at least one model satisfies the KB and every model
//! that satisfies the KB also satisfies `q`. All `2^n` rows are visited
//! even once the answer is known, so the reported counts are exact.

use std::time::{Duration, Instant};

use entail_logic::{evaluate, Expr, KnowledgeBase, Model, Symbols};
use serde::{Deserialize, Serialize};

use crate::config::TruthTableBudget;
use crate::error::EngineError;

/// Rows are counted in a `u64`.
pub const MAX_SYMBOLS: usize = 63;

/// Tables at least this wide get a warning when no budget is set.
const LARGE_TABLE_SYMBOLS: usize = 28;

/// How many rows to enumerate between wall-clock checks.
const CLOCK_CHECK_INTERVAL: u64 = 1 << 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entailment {
    pub holds: bool,
    /// Number of distinct atoms in KB and query.
    pub symbols: usize,
    /// `2^symbols`.
    pub total_models: u64,
    pub models_kb_true: u64,
    pub models_both: u64,
}

impl Entailment {
    /// The count reported on success: models satisfying both KB and query.
    pub fn model_count(&self) -> u64 {
        self.models_both
    }
}

fn kb_holds(kb: &KnowledgeBase, model: &Model<'_>) -> Result<bool, EngineError> {
    for clause in kb {
        if !evaluate(clause, model)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Check `kb ⊨ query` over every model of the combined symbol set.
pub fn tt_entails(
    kb: &KnowledgeBase,
    query: &Expr,
    budget: &TruthTableBudget,
) -> Result<Entailment, EngineError> {
    let symbols = Symbols::collect(kb, query);
    let n = symbols.len();
    if n > MAX_SYMBOLS {
        return Err(EngineError::TooManySymbols {
            symbols: n,
            max: MAX_SYMBOLS,
        });
    }

    let total_models = 1u64 << n;
    if let Some(limit) = budget.max_models {
        if total_models > limit {
            return Err(EngineError::ModelLimit {
                required: total_models,
                limit,
            });
        }
    }
    if budget.is_unlimited() && n >= LARGE_TABLE_SYMBOLS {
        tracing::warn!(
            symbols = n,
            total_models,
            "enumerating a very large truth table without a budget"
        );
    }

    tracing::debug!(symbols = n, total_models, clauses = kb.len(), "truth table start");

    let time_limit = budget.max_millis.map(Duration::from_millis);
    let started = Instant::now();
    let mut models_kb_true = 0u64;
    let mut models_both = 0u64;

    for index in 0..total_models {
        if let Some(limit) = time_limit {
            if index % CLOCK_CHECK_INTERVAL == 0 && started.elapsed() > limit {
                return Err(EngineError::Timeout {
                    visited: index,
                    total: total_models,
                    limit_ms: budget.max_millis.unwrap_or_default(),
                });
            }
        }

        let model = Model::from_index(&symbols, index);
        let kb_true = kb_holds(kb, &model)?;
        let query_true = kb_true && evaluate(query, &model)?;
        if kb_true {
            models_kb_true += 1;
            if query_true {
                models_both += 1;
            }
        }
        tracing::trace!(row = %model, kb_true, query_true, "truth table row");
    }

    let holds = models_kb_true > 0 && models_both == models_kb_true;
    tracing::debug!(
        holds,
        models_kb_true,
        models_both,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "truth table done"
    );

    Ok(Entailment {
        holds,
        symbols: n,
        total_models,
        models_kb_true,
        models_both,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use entail_logic::{parse_clause, parse_query};

    fn kb(clauses: &[&str]) -> KnowledgeBase {
        clauses
            .iter()
            .map(|c| parse_clause(c).expect("parse"))
            .collect()
    }

    fn tt(clauses: &[&str], query: &str) -> Entailment {
        tt_entails(
            &kb(clauses),
            &parse_query(query).expect("parse"),
            &TruthTableBudget::unlimited(),
        )
        .expect("tt")
    }

    #[test]
    fn chain_of_implications_counts_by_hand() {
        // Rows over (p1, p2, p3) satisfying p2=>p3 and p3=>p1:
        // FFF, TFF, TFT, TTT. Each also satisfies p2=>p1.
        let result = tt(&["p2=>p3", "p3=>p1"], "p2=>p1");
        assert_eq!(result.symbols, 3);
        assert_eq!(result.total_models, 8);
        assert_eq!(result.models_kb_true, 4);
        assert_eq!(result.models_both, 4);
        assert!(result.holds);
        assert_eq!(result.model_count(), 4);
    }

    #[test]
    fn non_entailed_query_is_no() {
        let result = tt(&["p2=>p3", "p3=>p1"], "p1=>p2");
        assert_eq!(result.models_kb_true, 4);
        assert_eq!(result.models_both, 2);
        assert!(!result.holds);
    }

    #[test]
    fn classic_horn_problem() {
        let result = tt(
            &[
                "p2=> p3", "p3 => p1", "c => e", "b&e => f", "f&g => h", "p1=>d", "p1&p3 => c",
                "a", "b", "p2",
            ],
            "d",
        );
        assert!(result.holds);
        assert_eq!(result.model_count(), 3);
    }

    #[test]
    fn empty_kb_entails_only_tautologies() {
        let result = tt(&[], "p || ~p");
        assert_eq!(result.models_kb_true, 2);
        assert_eq!(result.models_both, 2);
        assert!(result.holds);

        let result = tt(&[], "p");
        assert!(!result.holds);
    }

    #[test]
    fn unsatisfiable_kb_entails_nothing() {
        let result = tt(&["a", "~a"], "a");
        assert_eq!(result.models_kb_true, 0);
        assert!(!result.holds);
    }

    #[test]
    fn query_atoms_outside_the_kb_widen_the_table() {
        let result = tt(&["a"], "a || z");
        assert_eq!(result.total_models, 4);
        assert_eq!(result.models_kb_true, 2);
        assert!(result.holds);
    }

    #[test]
    fn model_budget_is_checked_before_enumerating() {
        let err = tt_entails(
            &kb(&["a & b & c & d"]),
            &parse_query("a").expect("parse"),
            &TruthTableBudget {
                max_models: Some(8),
                max_millis: None,
            },
        )
        .expect_err("16 rows exceed a budget of 8");
        assert_eq!(
            err,
            EngineError::ModelLimit {
                required: 16,
                limit: 8
            }
        );
    }

    #[test]
    fn zero_millisecond_budget_times_out_on_a_large_table() {
        let clause = (0..24)
            .map(|i| format!("x{i}"))
            .collect::<Vec<_>>()
            .join(" || ");
        let err = tt_entails(
            &kb(&[clause.as_str()]),
            &parse_query("x0").expect("parse"),
            &TruthTableBudget {
                max_models: None,
                max_millis: Some(0),
            },
        )
        .expect_err("should time out");
        assert!(matches!(err, EngineError::Timeout { limit_ms: 0, .. }), "err={err:?}");
    }

    #[test]
    fn too_many_symbols_is_rejected() {
        let clause = (0..64)
            .map(|i| format!("x{i}"))
            .collect::<Vec<_>>()
            .join(" & ");
        let err = tt_entails(
            &kb(&[clause.as_str()]),
            &parse_query("x0").expect("parse"),
            &TruthTableBudget::unlimited(),
        )
        .expect_err("should refuse");
        assert_eq!(err, EngineError::TooManySymbols { symbols: 64, max: 63 });
    }
}
