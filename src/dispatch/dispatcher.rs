use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;

use tracing::{debug, event, instrument, warn};

use crate::adapter::SimulationAdapter;
use crate::engine::EngineError;
use crate::trial::{ResultRow, TrialSpec};

use super::config::{DispatchConfig, FailurePolicy};
use super::error::DispatchError;
use super::outcome::{BatchOutcome, TrialFailure};

/// What a worker reports back for one trial.
enum TrialEvent {
    Finished(TrialSpec, Result<ResultRow, EngineError>),
    Cancelled(TrialSpec),
}

/// A bounded pool of workers that plays batches of trials.
///
/// The pool is owned by the dispatcher rather than being rayon's global
/// pool, so two dispatchers with different worker counts can coexist.
#[derive(Debug)]
pub struct Dispatcher {
    config: DispatchConfig,
    pool: rayon::ThreadPool,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Result<Self, DispatchError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|idx| format!("trial-worker-{}", idx))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Play every trial and collect the results.
    ///
    /// Blocks until every trial has finished, failed or been cancelled. At
    /// most `workers` trials are in flight at once. A panic inside the
    /// adapter is caught and recorded as a failure of that trial.
    #[instrument(
        level = "debug",
        skip_all,
        fields(trials = trials.len(), workers = self.config.workers)
    )]
    pub fn dispatch<A>(&self, adapter: &A, trials: Vec<TrialSpec>) -> BatchOutcome
    where
        A: SimulationAdapter + ?Sized,
    {
        let total = trials.len();
        let fail_fast = self.config.failure_policy == FailurePolicy::FailFast;
        let progress_interval = self.config.progress_interval;

        let aborted = AtomicBool::new(false);
        let completed = AtomicUsize::new(0);
        let (sender, receiver) = mpsc::channel();

        self.pool.scope_fifo(|scope| {
            for spec in trials {
                let sender = sender.clone();
                let aborted = &aborted;
                let completed = &completed;
                scope.spawn_fifo(move |_| {
                    if aborted.load(Ordering::Acquire) {
                        // The receiver outlives the scope, so this cannot fail
                        let _ = sender.send(TrialEvent::Cancelled(spec));
                        return;
                    }

                    let result = run_guarded(adapter, &spec);
                    if let Err(error) = &result {
                        warn!(agent = %spec.agent_label, seed = ?spec.seed, %error, "Trial failed");
                        if fail_fast {
                            aborted.store(true, Ordering::Release);
                        }
                    }

                    let done = completed.fetch_add(1, Ordering::AcqRel) + 1;
                    if progress_interval > 0 && done % progress_interval == 0 {
                        let percent = (done as f64 / total as f64) * 100.0;
                        event!(tracing::Level::INFO, done, total, "Progress: {:.1}%", percent);
                    }

                    let _ = sender.send(TrialEvent::Finished(spec, result));
                });
            }
        });
        drop(sender);

        let mut outcome = BatchOutcome::default();
        for trial_event in receiver {
            match trial_event {
                TrialEvent::Finished(_, Ok(row)) => outcome.rows.push(row),
                TrialEvent::Finished(spec, Err(error)) => {
                    outcome.failures.push(TrialFailure { spec, error })
                }
                TrialEvent::Cancelled(spec) => outcome.cancelled.push(spec),
            }
        }

        debug!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            cancelled = outcome.cancelled.len(),
            "Batch finished"
        );
        outcome
    }
}

fn run_guarded<A>(adapter: &A, spec: &TrialSpec) -> Result<ResultRow, EngineError>
where
    A: SimulationAdapter + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| adapter.run(spec)))
        .unwrap_or_else(|payload| Err(EngineError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
