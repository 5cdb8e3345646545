use std::path::Path;

use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::{debug, event};

use crate::trial::TrialSpec;

use super::error::{GridError, Result};
use super::seed::SeedPolicy;

/// A rule linking two axes. Tuples that break it are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AxisConstraint {
    /// Keep every tuple
    #[default]
    None,
    /// Keep a tuple only if `search_budget * deterministic_samples == target`.
    /// Tuples without a sample count never satisfy it.
    ProductEquals { target: u64 },
}

impl AxisConstraint {
    /// Does a search agent with this budget and sample count pass?
    pub fn admits(&self, search_budget: u64, deterministic_samples: Option<u64>) -> bool {
        match self {
            AxisConstraint::None => true,
            AxisConstraint::ProductEquals { target } => deterministic_samples
                .and_then(|samples| search_budget.checked_mul(samples))
                .is_some_and(|product| product == *target),
        }
    }
}

/// The axes of a grid search.
///
/// Empty `policy_variants` or `deterministic_samples` mean the value is left
/// unspecified on every trial. Empty `search_budgets` or `player_counts`
/// produce an empty grid.
///
/// A search budget of zero is the non-search baseline. It is an ordinary
/// tuple: it goes through the constraint and the full cross product like any
/// other budget, and its trials record the tuple's policy and sample values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridAxes {
    pub search_budgets: Vec<u64>,
    pub player_counts: Vec<usize>,
    pub policy_variants: Vec<u8>,
    pub deterministic_samples: Vec<u64>,
    /// How many times the whole grid is repeated
    pub repeats: usize,
    /// Threads each agent may use for its own search
    pub thread_hint: usize,
    pub constraint: AxisConstraint,
}

impl Default for GridAxes {
    fn default() -> Self {
        Self {
            search_budgets: Vec::new(),
            player_counts: Vec::new(),
            policy_variants: Vec::new(),
            deterministic_samples: Vec::new(),
            repeats: 1,
            thread_hint: 1,
            constraint: AxisConstraint::None,
        }
    }
}

impl GridAxes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_budgets(mut self, budgets: impl IntoIterator<Item = u64>) -> Self {
        self.search_budgets = budgets.into_iter().collect();
        self
    }

    pub fn player_counts(mut self, counts: impl IntoIterator<Item = usize>) -> Self {
        self.player_counts = counts.into_iter().collect();
        self
    }

    pub fn policy_variants(mut self, variants: impl IntoIterator<Item = u8>) -> Self {
        self.policy_variants = variants.into_iter().collect();
        self
    }

    pub fn deterministic_samples(mut self, samples: impl IntoIterator<Item = u64>) -> Self {
        self.deterministic_samples = samples.into_iter().collect();
        self
    }

    pub fn repeats(mut self, repeats: usize) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn thread_hint(mut self, thread_hint: usize) -> Self {
        self.thread_hint = thread_hint;
        self
    }

    pub fn constraint(mut self, constraint: AxisConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Parse axes from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load axes from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| GridError::ParseFile {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check the axes for values no trial could be built from.
    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            return Err(GridError::InvalidAxis(
                "repeats must be at least 1".to_string(),
            ));
        }
        if self.thread_hint == 0 {
            return Err(GridError::InvalidAxis(
                "thread_hint must be at least 1".to_string(),
            ));
        }
        if self.player_counts.contains(&0) {
            return Err(GridError::InvalidAxis(
                "player counts must be positive".to_string(),
            ));
        }
        if self.deterministic_samples.contains(&0) {
            return Err(GridError::InvalidAxis(
                "deterministic sample counts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of the unfiltered cross product, repeats included.
    pub fn estimated_trials(&self) -> usize {
        self.search_budgets.len()
            * self.player_counts.len()
            * self.policy_variants.len().max(1)
            * self.deterministic_samples.len().max(1)
            * self.repeats
    }

    /// Expand the axes into trials.
    ///
    /// Trials come out repeat by repeat, and within a repeat in the order
    /// policy variant, player count, search budget, sample count. The order
    /// only depends on the axes, so logs are reproducible.
    pub fn generate(&self, seed_policy: &SeedPolicy) -> Result<Vec<TrialSpec>> {
        self.validate()?;

        let policies = optional_axis(&self.policy_variants);
        let samples = optional_axis(&self.deterministic_samples);
        let seeds = seed_policy.seeds(self.repeats);

        let mut trials = Vec::new();
        let mut skipped = 0usize;
        for seed in seeds {
            let tuples = iproduct!(&policies, &self.player_counts, &self.search_budgets, &samples);
            for (policy, &player_count, &budget, sample) in tuples {
                if !self.constraint.admits(budget, *sample) {
                    skipped += 1;
                    continue;
                }

                let mut spec =
                    TrialSpec::new(budget, player_count).with_thread_hint(self.thread_hint);
                if let Some(policy) = policy {
                    spec = spec.with_policy_variant(*policy);
                }
                if let Some(sample) = sample {
                    spec = spec.with_deterministic_samples(*sample);
                }
                trials.push(with_seed(spec, seed));
            }
        }

        debug!(
            generated = trials.len(),
            skipped,
            estimated = self.estimated_trials(),
            "Expanded grid"
        );
        if trials.is_empty() {
            event!(
                tracing::Level::WARN,
                budgets = self.search_budgets.len(),
                player_counts = self.player_counts.len(),
                policy_variants = self.policy_variants.len(),
                deterministic_samples = self.deterministic_samples.len(),
                constraint = ?self.constraint,
                "Grid produced zero trials"
            );
        }

        Ok(trials)
    }
}

/// An empty axis stands for a single unspecified value.
fn optional_axis<T: Copy>(values: &[T]) -> Vec<Option<T>> {
    if values.is_empty() {
        vec![None]
    } else {
        values.iter().copied().map(Some).collect()
    }
}

fn with_seed(spec: TrialSpec, seed: Option<u64>) -> TrialSpec {
    match seed {
        Some(seed) => spec.with_seed(seed),
        None => spec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POWERS: [u64; 7] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000];

    #[test]
    fn test_full_cross_product() {
        let axes = GridAxes::new()
            .search_budgets([10, 100])
            .player_counts([1, 2, 3])
            .policy_variants([0, 1])
            .repeats(2);

        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert_eq!(trials.len(), 2 * 3 * 2 * 2);
        assert_eq!(trials.len(), axes.estimated_trials());
        assert!(trials.iter().all(|t| t.seed.is_none()));
        assert!(trials.iter().all(|t| t.deterministic_samples.is_none()));
    }

    #[test]
    fn test_product_constraint_pairs_axes() {
        let axes = GridAxes::new()
            .search_budgets(POWERS)
            .player_counts([3])
            .policy_variants([0])
            .deterministic_samples(POWERS)
            .constraint(AxisConstraint::ProductEquals { target: 1_000_000 });

        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert_eq!(trials.len(), 7);
        for trial in &trials {
            assert_eq!(
                trial.search_budget * trial.deterministic_samples.unwrap(),
                1_000_000
            );
        }
        assert_eq!(trials[0].agent_label, "MCTS_1");
        assert_eq!(trials[0].deterministic_samples, Some(1_000_000));
    }

    #[test_log::test]
    fn test_unsatisfiable_constraint_is_empty_not_error() {
        let axes = GridAxes::new()
            .search_budgets([3, 7])
            .player_counts([2])
            .deterministic_samples([5])
            .constraint(AxisConstraint::ProductEquals { target: 1_000 });

        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert!(trials.is_empty());
    }

    #[test]
    fn test_constraint_rejects_missing_samples() {
        let constraint = AxisConstraint::ProductEquals { target: 100 };
        assert!(!constraint.admits(100, None));
        assert!(constraint.admits(10, Some(10)));
        assert!(!constraint.admits(u64::MAX, Some(2)));
        assert!(AxisConstraint::None.admits(5, None));
    }

    #[test]
    fn test_repeat_group_shares_seed() {
        let axes = GridAxes::new()
            .search_budgets([1, 10, 100])
            .player_counts([2, 3])
            .repeats(3);

        let trials = axes
            .generate(&SeedPolicy::PerRepeat { base: 11 })
            .unwrap();
        assert_eq!(trials.len(), 18);

        for group in trials.chunks(6) {
            let seed = group[0].seed;
            assert!(seed.is_some());
            assert!(group.iter().all(|t| t.seed == seed));
        }
        assert_ne!(trials[0].seed, trials[6].seed);
    }

    #[test]
    fn test_baseline_is_an_ordinary_tuple() {
        let axes = GridAxes::new()
            .search_budgets([0])
            .player_counts([2])
            .policy_variants([0, 1, 2]);

        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert_eq!(trials.len(), 3);
        assert_eq!(trials.len(), axes.estimated_trials());
        assert!(trials.iter().all(|t| t.is_baseline() && t.agent_label == "Random"));
        assert_eq!(
            trials.iter().map(|t| t.policy_variant).collect::<Vec<_>>(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn test_constraint_applies_to_baseline() {
        let axes = GridAxes::new()
            .search_budgets([0, 100])
            .player_counts([2])
            .deterministic_samples([100])
            .constraint(AxisConstraint::ProductEquals { target: 10_000 });

        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].agent_label, "MCTS_100");

        // Only a zero target admits the baseline
        let axes = axes.constraint(AxisConstraint::ProductEquals { target: 0 });
        let trials = axes.generate(&SeedPolicy::Unseeded).unwrap();
        assert_eq!(trials.len(), 1);
        assert!(trials[0].is_baseline());
        assert_eq!(trials[0].deterministic_samples, Some(100));
    }

    #[test]
    fn test_order_is_stable() {
        let axes = GridAxes::new()
            .search_budgets([1, 10])
            .player_counts([2, 3])
            .policy_variants([0, 1]);
        let labels: Vec<_> = axes
            .generate(&SeedPolicy::Unseeded)
            .unwrap()
            .into_iter()
            .map(|t| (t.policy_variant, t.player_count, t.search_budget))
            .collect();
        assert_eq!(
            labels,
            vec![
                (Some(0), 2, 1),
                (Some(0), 2, 10),
                (Some(0), 3, 1),
                (Some(0), 3, 10),
                (Some(1), 2, 1),
                (Some(1), 2, 10),
                (Some(1), 3, 1),
                (Some(1), 3, 10),
            ]
        );
    }

    #[test]
    fn test_validate() {
        assert!(GridAxes::new().validate().is_ok());
        assert!(GridAxes::new().repeats(0).validate().is_err());
        assert!(GridAxes::new().thread_hint(0).validate().is_err());
        assert!(GridAxes::new().player_counts([0]).validate().is_err());
        assert!(GridAxes::new().deterministic_samples([0]).validate().is_err());
        assert!(matches!(
            GridAxes::new().player_counts([0]).generate(&SeedPolicy::Unseeded),
            Err(GridError::InvalidAxis(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let axes = GridAxes::from_json(
            r#"{
                "search_budgets": [1, 1000],
                "player_counts": [3],
                "deterministic_samples": [1000, 1],
                "repeats": 4,
                "constraint": {"type": "product_equals", "target": 1000}
            }"#,
        )
        .unwrap();
        assert_eq!(axes.repeats, 4);
        assert_eq!(axes.thread_hint, 1);
        assert!(axes.policy_variants.is_empty());
        assert_eq!(
            axes.constraint,
            AxisConstraint::ProductEquals { target: 1000 }
        );
        assert_eq!(axes.generate(&SeedPolicy::Unseeded).unwrap().len(), 8);
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, "{ not json").unwrap();

        match GridAxes::from_file(&path) {
            Err(GridError::ParseFile { path: p, .. }) => assert!(p.ends_with("grid.json")),
            other => panic!("Expected ParseFile error, got {:?}", other),
        }
        assert!(matches!(
            GridAxes::from_file(dir.path().join("missing.json")),
            Err(GridError::Io(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_size_matches_filtered_product(
            budgets in proptest::collection::vec(0u64..50, 0..5),
            players in proptest::collection::vec(1usize..5, 0..4),
            policies in proptest::collection::vec(0u8..4, 0..3),
            samples in proptest::collection::vec(1u64..50, 0..5),
            target in 0u64..200,
            repeats in 1usize..3,
        ) {
            let axes = GridAxes::new()
                .search_budgets(budgets.clone())
                .player_counts(players.clone())
                .policy_variants(policies.clone())
                .deterministic_samples(samples.clone())
                .constraint(AxisConstraint::ProductEquals { target })
                .repeats(repeats);

            let trials = axes.generate(&SeedPolicy::Fixed { seed: 1 }).unwrap();

            let matching = budgets
                .iter()
                .flat_map(|b| samples.iter().map(move |s| b * s))
                .filter(|p| *p == target)
                .count();
            let expected = matching * players.len() * policies.len().max(1) * repeats;
            prop_assert_eq!(trials.len(), expected);

            for trial in &trials {
                prop_assert_eq!(
                    trial.search_budget * trial.deterministic_samples.unwrap(),
                    target
                );
                prop_assert_eq!(trial.seed, Some(1));
            }
        }
    }
}
