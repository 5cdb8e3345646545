use std::path::PathBuf;

use crate::adapter::{EngineAdapter, SimulationAdapter};
use crate::dispatch::FailurePolicy;
use crate::engine::GameEngine;
use crate::grid::{GridAxes, SeedPolicy};

use super::config::HarnessConfig;
use super::error::{HarnessError, Result};
use super::runner::Harness;

/// Builder for [`Harness`] instances.
///
/// # Example
///
/// ```
/// use trial_grid::engine::SurrogateEngine;
/// use trial_grid::grid::{GridAxes, SeedPolicy};
/// use trial_grid::harness::HarnessBuilder;
///
/// let dir = tempfile::tempdir().unwrap();
/// let harness = HarnessBuilder::new()
///     .store_path(dir.path().join("results.csv"))
///     .axes(GridAxes::new().search_budgets([0, 100]).player_counts([2, 3]))
///     .seed_policy(SeedPolicy::Fixed { seed: 7 })
///     .workers(2)
///     .build(SurrogateEngine::new())
///     .unwrap();
///
/// let summary = harness.run().unwrap();
/// assert_eq!(summary.succeeded, 4);
/// ```
#[derive(Debug, Default)]
pub struct HarnessBuilder {
    store_path: Option<PathBuf>,
    axes: Option<GridAxes>,
    seed_policy: Option<SeedPolicy>,
    workers: Option<usize>,
    failure_policy: Option<FailurePolicy>,
    progress_interval: Option<usize>,
    use_heuristics: Option<bool>,
    win_score: Option<u8>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file results are appended to
    pub fn store_path<P: Into<PathBuf>>(mut self, store_path: P) -> Self {
        self.store_path = Some(store_path.into());
        self
    }

    pub fn axes(mut self, axes: GridAxes) -> Self {
        self.axes = Some(axes);
        self
    }

    pub fn seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = Some(seed_policy);
        self
    }

    /// Set the maximum number of trials in flight
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = Some(failure_policy);
        self
    }

    pub fn progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = Some(progress_interval);
        self
    }

    pub fn use_heuristics(mut self, use_heuristics: bool) -> Self {
        self.use_heuristics = Some(use_heuristics);
        self
    }

    pub fn win_score(mut self, win_score: u8) -> Self {
        self.win_score = Some(win_score);
        self
    }

    /// Fill in defaults and validate.
    ///
    /// The store path has no default; leaving it unset is an error.
    pub fn build_config(self) -> Result<HarnessConfig> {
        let defaults = HarnessConfig::default();
        let store_path = self.store_path.ok_or_else(|| {
            HarnessError::MissingConfig("No store path configured. Use store_path()".to_string())
        })?;

        let config = HarnessConfig {
            store_path,
            axes: self.axes.unwrap_or(defaults.axes),
            seed_policy: self.seed_policy.unwrap_or(defaults.seed_policy),
            workers: self.workers.unwrap_or(defaults.workers),
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
            use_heuristics: self.use_heuristics.unwrap_or(defaults.use_heuristics),
            win_score: self.win_score.unwrap_or(defaults.win_score),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a harness playing trials on `engine`.
    pub fn build<E: GameEngine>(self, engine: E) -> Result<Harness<EngineAdapter<E>>> {
        let config = self.build_config()?;
        let adapter = EngineAdapter::new(engine).use_heuristics(config.use_heuristics);
        Harness::new(config, adapter)
    }

    /// Build a harness around an adapter that is already set up.
    pub fn build_with_adapter<A: SimulationAdapter>(self, adapter: A) -> Result<Harness<A>> {
        Harness::new(self.build_config()?, adapter)
    }
}
