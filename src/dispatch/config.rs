use serde::{Deserialize, Serialize};

use super::error::DispatchError;

/// What to do with the rest of a batch once a trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep going
    #[default]
    Continue,
    /// Record the failure and cancel every trial that has not started
    FailFast,
}

/// Configuration for a [`super::Dispatcher`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of trials in flight at once
    pub workers: usize,
    pub failure_policy: FailurePolicy,
    /// Log progress every this many completed trials, 0 disables it
    pub progress_interval: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 6,
            failure_policy: FailurePolicy::Continue,
            progress_interval: 100,
        }
    }
}

impl DispatchConfig {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    pub fn failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.workers == 0 {
            return Err(DispatchError::InvalidWorkers);
        }
        Ok(())
    }
}
