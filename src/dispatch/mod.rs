//! Runs trials on a bounded pool of worker threads.
//!
//! Every trial is handed to exactly one worker, exactly once. A worker plays
//! the trial through a [`crate::adapter::SimulationAdapter`] and reports
//! either a row or a failure. Results are collected in the order they
//! complete, which is not the order they were submitted.
//!
//! A failing trial never takes the batch down with it. Under
//! [`FailurePolicy::Continue`] the remaining trials run as normal, under
//! [`FailurePolicy::FailFast`] trials that have not started yet are cancelled.
mod config;
mod dispatcher;
mod error;
mod outcome;

pub use config::{DispatchConfig, FailurePolicy};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use outcome::{BatchOutcome, TrialFailure};
