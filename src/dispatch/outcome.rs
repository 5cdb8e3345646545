use std::fmt;

use crate::engine::EngineError;
use crate::trial::{ResultRow, TrialSpec};

/// A trial that did not produce a row, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFailure {
    pub spec: TrialSpec,
    pub error: EngineError,
}

impl fmt::Display for TrialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with {} players (seed {}): {}",
            self.spec.agent_label,
            self.spec.player_count,
            self.spec
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.error
        )
    }
}

/// Everything a batch produced.
///
/// Every submitted trial ends up in exactly one of the three lists.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// One row per successful trial, in completion order
    pub rows: Vec<ResultRow>,
    pub failures: Vec<TrialFailure>,
    /// Trials skipped after a failure under fail-fast
    pub cancelled: Vec<TrialSpec>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.rows.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of trials submitted
    pub fn total(&self) -> usize {
        self.rows.len() + self.failures.len() + self.cancelled.len()
    }

    /// Did every trial produce a row?
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let spec = TrialSpec::new(10, 2).with_seed(3);
        let outcome = BatchOutcome {
            rows: vec![ResultRow::from_spec(&spec, 4)],
            failures: vec![TrialFailure {
                spec: spec.clone(),
                error: EngineError::Playout("boom".to_string()),
            }],
            cancelled: vec![spec.clone(), spec],
        };
        assert_eq!(outcome.succeeded(), 1);
        assert_eq!(outcome.failed(), 1);
        assert_eq!(outcome.total(), 4);
        assert!(!outcome.is_complete());
        assert!(BatchOutcome::default().is_complete());
    }

    #[test]
    fn test_failure_display() {
        let failure = TrialFailure {
            spec: TrialSpec::new(100, 3).with_seed(9),
            error: EngineError::Playout("boom".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "MCTS_100 with 3 players (seed 9): Game failed during playout: boom"
        );
    }
}
