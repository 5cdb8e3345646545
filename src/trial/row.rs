use serde::{Deserialize, Serialize};

use super::TrialSpec;

/// The observation produced by one completed trial.
///
/// Rows are observations, not entities. Two identical rows are two games that
/// happened to end the same way, so the store never deduplicates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct ResultRow {
    /// Terminal score of the game
    pub score: u8,
    /// Label of the agent that played every seat
    pub agent_label: String,
    pub player_count: usize,
    pub policy_variant: Option<u8>,
    pub deterministic_samples: Option<u64>,
}

impl ResultRow {
    /// Record the terminal score of the trial described by `spec`.
    pub fn from_spec(spec: &TrialSpec, score: u8) -> Self {
        Self {
            score,
            agent_label: spec.agent_label.clone(),
            player_count: spec.player_count,
            policy_variant: spec.policy_variant,
            deterministic_samples: spec.deterministic_samples,
        }
    }

    /// Did this game end with the winning score?
    pub fn is_win(&self, win_score: u8) -> bool {
        self.score == win_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spec_copies_configuration() {
        let spec = TrialSpec::new(1000, 3)
            .with_policy_variant(2)
            .with_deterministic_samples(1000)
            .with_seed(99);
        let row = ResultRow::from_spec(&spec, 7);

        assert_eq!(row.score, 7);
        assert_eq!(row.agent_label, "MCTS_1000");
        assert_eq!(row.player_count, 3);
        assert_eq!(row.policy_variant, Some(2));
        assert_eq!(row.deterministic_samples, Some(1000));
    }

    #[test]
    fn test_is_win() {
        let spec = TrialSpec::baseline(1);
        assert!(ResultRow::from_spec(&spec, 12).is_win(12));
        assert!(!ResultRow::from_spec(&spec, 11).is_win(12));
    }
}
