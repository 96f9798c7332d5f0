use serde::{Deserialize, Serialize};

/// Limits for the closure family worklist.
///
/// Fields missing from a serialized config take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    /// Maximum number of worklist steps before giving up with
    /// [`ZornError::StepLimit`](crate::ZornError::StepLimit).
    pub max_steps: usize,
    /// Check totality and successor monotonicity after every insertion.
    pub check_invariants: bool,
}

impl ClosureConfig {
    pub const DEFAULT_MAX_STEPS: usize = 100_000;

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_invariants(mut self, check_invariants: bool) -> Self {
        self.check_invariants = check_invariants;
        self
    }
}

impl Default for ClosureConfig {
    fn default() -> Self {
        ClosureConfig { max_steps: Self::DEFAULT_MAX_STEPS, check_invariants: true }
    }
}
