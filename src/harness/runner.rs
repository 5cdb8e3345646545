use tracing::{event, instrument};

use crate::adapter::SimulationAdapter;
use crate::aggregate::{AggregateTable, GroupField, aggregate, sort_for_report};
use crate::dispatch::Dispatcher;
use crate::store::ResultStore;
use crate::trial::TrialSpec;

use super::config::HarnessConfig;
use super::error::Result;
use super::summary::RunSummary;

/// Runs a grid of trials against a result store.
#[derive(Debug)]
pub struct Harness<A> {
    config: HarnessConfig,
    adapter: A,
    store: ResultStore,
    dispatcher: Dispatcher,
}

impl<A: SimulationAdapter> Harness<A> {
    /// Validate `config` and set up the store handle and worker pool.
    pub fn new(config: HarnessConfig, adapter: A) -> Result<Self> {
        config.validate()?;
        let store = ResultStore::open(&config.store_path);
        let dispatcher = Dispatcher::new(config.dispatch_config())?;
        Ok(Self {
            config,
            adapter,
            store,
            dispatcher,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// The trials a run would play, without playing them.
    ///
    /// Under [`crate::grid::SeedPolicy::RandomPerRepeat`] each call draws new
    /// seeds, so a later run will not reuse these.
    pub fn plan(&self) -> Result<Vec<TrialSpec>> {
        Ok(self.config.axes.generate(&self.config.seed_policy)?)
    }

    /// Play the whole grid and append the results to the store.
    ///
    /// The store is loaded before any trial runs, so a corrupt store aborts
    /// the run without wasting work. It is written exactly once, after the
    /// batch is finished. Failed trials do not make the run fail; they are
    /// reported in the summary.
    #[instrument(level = "debug", skip(self), fields(store = %self.store.path().display()))]
    pub fn run(&self) -> Result<RunSummary> {
        let existing = self.store.load()?;
        let trials = self.plan()?;
        let planned = trials.len();

        event!(
            tracing::Level::INFO,
            trials = planned,
            workers = self.config.workers,
            store_rows = existing.len(),
            "Starting run"
        );

        let outcome = self.dispatcher.dispatch(&self.adapter, trials);
        let store_rows_after = self.store.merge_and_persist(&existing, &outcome.rows)?;

        let summary = RunSummary {
            planned,
            succeeded: outcome.succeeded(),
            failed: outcome.failed(),
            cancelled: outcome.cancelled.len(),
            store_rows_before: existing.len(),
            store_rows_after,
            failures: outcome.failures,
        };
        event!(
            tracing::Level::INFO,
            succeeded = summary.succeeded,
            failed = summary.failed,
            cancelled = summary.cancelled,
            store_rows = summary.store_rows_after,
            "Run finished"
        );
        Ok(summary)
    }

    /// Aggregate everything in the store.
    pub fn report(&self, group_by: &[GroupField]) -> Result<AggregateTable> {
        report(&self.store, group_by, self.config.win_score)
    }
}

/// Load `store` and aggregate its rows, ordered for reading.
pub fn report(
    store: &ResultStore,
    group_by: &[GroupField],
    win_score: u8,
) -> Result<AggregateTable> {
    let mut rows = store.load()?;
    sort_for_report(&mut rows);
    let records = aggregate(&rows, group_by, win_score);
    Ok(AggregateTable::new(group_by.to_vec(), records))
}
