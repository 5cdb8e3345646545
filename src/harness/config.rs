use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dispatch::{DispatchConfig, FailurePolicy};
use crate::grid::{GridAxes, SeedPolicy};
use crate::trial::MAX_SCORE;

use super::error::{HarnessError, Result};

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// File the results accumulate in
    pub store_path: PathBuf,
    pub axes: GridAxes,
    pub seed_policy: SeedPolicy,
    /// Maximum number of trials in flight
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Completed trials between progress events
    pub progress_interval: usize,
    pub use_heuristics: bool,
    /// A trial scoring exactly this much counts as a win
    pub win_score: u8,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let dispatch = DispatchConfig::default();
        Self {
            store_path: PathBuf::from("results.csv"),
            axes: GridAxes::default(),
            seed_policy: SeedPolicy::default(),
            workers: dispatch.workers,
            failure_policy: dispatch.failure_policy,
            progress_interval: dispatch.progress_interval,
            use_heuristics: false,
            win_score: MAX_SCORE,
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(HarnessError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.win_score == 0 || self.win_score > MAX_SCORE {
            return Err(HarnessError::InvalidConfig(format!(
                "win_score ({}) must be between 1 and {}",
                self.win_score, MAX_SCORE
            )));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(HarnessError::InvalidConfig(
                "store_path must not be empty".to_string(),
            ));
        }
        self.axes.validate()?;
        Ok(())
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig::new(self.workers)
            .failure_policy(self.failure_policy)
            .progress_interval(self.progress_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.workers, 6);
        assert_eq!(config.axes.repeats, 1);
        assert_eq!(config.axes.thread_hint, 1);
        assert_eq!(config.win_score, 12);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.progress_interval, 100);
        assert!(!config.use_heuristics);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = HarnessConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));

        let config = HarnessConfig {
            win_score: 13,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));

        let config = HarnessConfig {
            axes: GridAxes::new().player_counts([0]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(HarnessError::Grid(_))));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "store_path": "out/results.csv",
            "workers": 2,
            "failure_policy": "fail_fast",
            "seed_policy": { "type": "per_repeat", "base": 42 },
            "axes": { "search_budgets": [0, 100], "player_counts": [2], "repeats": 3 }
        }"#;
        let config: HarnessConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.seed_policy, SeedPolicy::PerRepeat { base: 42 });
        assert_eq!(config.axes.repeats, 3);
        assert_eq!(config.win_score, 12);
        assert_eq!(config.dispatch_config().workers, 2);
    }
}
