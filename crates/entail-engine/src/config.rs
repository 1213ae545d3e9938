//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Limits for truth-table enumeration, the only solver whose cost is
/// exponential in the input.
///
/// `None` means unlimited. When a limit is hit the run fails; a partial
/// count is never reported as an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruthTableBudget {
    /// Refuse tables with more rows than this (checked before enumerating).
    pub max_models: Option<u64>,
    /// Abort enumeration after this many milliseconds of wall-clock time.
    pub max_millis: Option<u64>,
}

impl TruthTableBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_models.is_none() && self.max_millis.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub truth_table: TruthTableBudget,
}
