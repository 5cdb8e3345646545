//! One run of the experiment, end to end.
//!
//! A run loads the result store, expands the grid, plays every trial on the
//! worker pool and writes the merged results back once. Trial failures are
//! collected into the [`RunSummary`]; only store, grid and configuration
//! problems stop a run.
mod builder;
mod config;
mod error;
mod runner;
mod summary;

pub use builder::HarnessBuilder;
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use runner::{Harness, report};
pub use summary::RunSummary;
