//! Adapters for exercising the dispatcher and harness without a real engine.
use std::collections::HashMap;
use std::sync::Mutex;

use crate::adapter::SimulationAdapter;
use crate::engine::EngineError;
use crate::trial::{ResultRow, TrialSpec};

/// An adapter backed by a closure.
pub struct FnAdapter<F> {
    run: F,
}

impl<F> FnAdapter<F>
where
    F: Fn(&TrialSpec) -> Result<ResultRow, EngineError> + Send + Sync,
{
    pub fn new(run: F) -> Self {
        Self { run }
    }
}

impl<F> SimulationAdapter for FnAdapter<F>
where
    F: Fn(&TrialSpec) -> Result<ResultRow, EngineError> + Send + Sync,
{
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError> {
        (self.run)(spec)
    }
}

/// Wraps an adapter and counts how often each seed was played.
pub struct CountingAdapter<A> {
    inner: A,
    calls: Mutex<HashMap<Option<u64>, usize>>,
}

impl<A: SimulationAdapter> CountingAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Number of calls per seed so far.
    pub fn calls_by_seed(&self) -> HashMap<Option<u64>, usize> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn total_calls(&self) -> usize {
        self.calls_by_seed().values().sum()
    }
}

impl<A: SimulationAdapter> SimulationAdapter for CountingAdapter<A> {
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError> {
        {
            let mut calls = self
                .calls
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *calls.entry(spec.seed).or_insert(0) += 1;
        }
        self.inner.run(spec)
    }
}

/// A row with the given label and score and no optional fields.
pub fn row(agent_label: &str, player_count: usize, score: u8) -> ResultRow {
    ResultRow {
        score,
        agent_label: agent_label.to_string(),
        player_count,
        policy_variant: None,
        deterministic_samples: None,
    }
}
