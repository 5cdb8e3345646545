use serde::{Deserialize, Serialize};

use super::AgentLabel;

/// Everything needed to play one trial.
///
/// Specs are built once by the grid generator and then only read. The
/// `with_*` methods consume the value and return a new one, so a trial is never
/// mutated after it has been handed to the dispatcher.
///
/// # Example
///
/// ```
/// use trial_grid::trial::TrialSpec;
///
/// let spec = TrialSpec::new(1_000, 3)
///     .with_policy_variant(0)
///     .with_deterministic_samples(1_000)
///     .with_seed(42);
///
/// assert_eq!(spec.agent_label, "MCTS_1000");
/// assert_eq!(spec.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct TrialSpec {
    /// Label written to the result row, e.g. `MCTS_1000` or `Random`
    pub agent_label: String,
    /// Number of seats at the table. Every seat gets the same agent.
    pub player_count: usize,
    /// Search iterations per decision. Zero is the non-search baseline.
    pub search_budget: u64,
    /// Which tree policy formula the search agent uses
    pub policy_variant: Option<u8>,
    /// Number of determinizations the search agent samples
    pub deterministic_samples: Option<u64>,
    /// Threads each agent may use for its own search
    pub thread_hint: usize,
    /// Seed for the game. `None` lets the engine draw fresh randomness.
    pub seed: Option<u64>,
}

impl TrialSpec {
    /// Create a spec for an agent with the given search budget.
    ///
    /// The label is derived from the budget, a budget of zero is the
    /// baseline agent.
    pub fn new(search_budget: u64, player_count: usize) -> Self {
        Self {
            agent_label: AgentLabel::for_budget(search_budget),
            player_count,
            search_budget,
            policy_variant: None,
            deterministic_samples: None,
            thread_hint: 1,
            seed: None,
        }
    }

    /// Create a spec for the non-search baseline agent.
    pub fn baseline(player_count: usize) -> Self {
        Self::new(0, player_count)
    }

    pub fn with_policy_variant(mut self, policy_variant: u8) -> Self {
        self.policy_variant = Some(policy_variant);
        self
    }

    pub fn with_deterministic_samples(mut self, samples: u64) -> Self {
        self.deterministic_samples = Some(samples);
        self
    }

    pub fn with_thread_hint(mut self, thread_hint: usize) -> Self {
        self.thread_hint = thread_hint;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the derived label.
    pub fn with_agent_label(mut self, agent_label: impl Into<String>) -> Self {
        self.agent_label = agent_label.into();
        self
    }

    /// Is this the non-search baseline agent?
    pub fn is_baseline(&self) -> bool {
        self.search_budget == 0
    }
}
