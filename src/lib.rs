//! Grid search experiments over a game engine.
//!
//! `trial_grid` sweeps the cross product of agent configurations (search
//! budget, player count, policy variant, deterministic samples), plays every
//! combination as an independent trial on a bounded worker pool, and
//! accumulates the results in a tabular store that survives across runs.
//! Stored results can then be grouped and summarised as win rate, mean
//! score and count per group.
//!
//! The pieces, in the order data flows through them:
//!
//! - [`grid`] expands [`grid::GridAxes`] into [`trial::TrialSpec`]s.
//! - [`adapter`] plays one trial on an [`engine::GameEngine`] and produces a
//!   [`trial::ResultRow`].
//! - [`dispatch`] runs a batch of trials with bounded concurrency and
//!   collects rows and failures.
//! - [`store`] loads, merges and atomically persists rows.
//! - [`aggregate`] groups stored rows and renders report tables.
//! - [`harness`] ties it together for one run.
//!
//! ```
//! use trial_grid::aggregate::GroupField;
//! use trial_grid::engine::SurrogateEngine;
//! use trial_grid::grid::{AxisConstraint, GridAxes, SeedPolicy};
//! use trial_grid::harness::HarnessBuilder;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let axes = GridAxes::new()
//!     .search_budgets([0, 100, 1000])
//!     .player_counts([2])
//!     .deterministic_samples([10, 100])
//!     .constraint(AxisConstraint::ProductEquals { target: 10_000 })
//!     .repeats(3);
//!
//! let harness = HarnessBuilder::new()
//!     .store_path(dir.path().join("results.csv"))
//!     .axes(axes)
//!     .seed_policy(SeedPolicy::PerRepeat { base: 1 })
//!     .workers(4)
//!     .build(SurrogateEngine::new())
//!     .unwrap();
//!
//! // Per repeat: MCTS_100 x 100 samples and MCTS_1000 x 10 samples. The
//! // baseline's product is zero, so the constraint drops it.
//! let summary = harness.run().unwrap();
//! assert_eq!(summary.succeeded, 6);
//!
//! let table = harness.report(&[GroupField::Agent]).unwrap();
//! assert_eq!(table.records().len(), 2);
//! ```
pub mod adapter;
pub mod aggregate;
pub mod dispatch;
pub mod engine;
pub mod grid;
pub mod harness;
pub mod store;
pub mod trial;

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub use adapter::{EngineAdapter, SimulationAdapter};
pub use harness::{Harness, HarnessBuilder, HarnessConfig, HarnessError, RunSummary};
pub use trial::{ResultRow, TrialSpec};
