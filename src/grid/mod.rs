//! Expands parameter axes into the list of trials to run.
//!
//! A grid is the cross product of search budgets, player counts, policy
//! variants and deterministic sample counts, repeated `repeats` times. An
//! optional [`AxisConstraint`] links two axes, and tuples that break it are
//! skipped. Seeds are assigned per repeat group by a [`SeedPolicy`] so every
//! agent variant in a group can face the same deal.
//!
//! # Example
//!
//! ```
//! use trial_grid::grid::{AxisConstraint, GridAxes, SeedPolicy};
//!
//! // Budgets and samples must multiply to one million
//! let axes = GridAxes::new()
//!     .search_budgets([1, 10, 100, 1_000, 10_000, 100_000, 1_000_000])
//!     .player_counts([3])
//!     .policy_variants([0])
//!     .deterministic_samples([1, 10, 100, 1_000, 10_000, 100_000, 1_000_000])
//!     .constraint(AxisConstraint::ProductEquals { target: 1_000_000 })
//!     .repeats(2);
//!
//! let trials = axes.generate(&SeedPolicy::PerRepeat { base: 7 }).unwrap();
//! assert_eq!(trials.len(), 14);
//! ```
mod axes;
mod error;
mod seed;

pub use axes::{AxisConstraint, GridAxes};
pub use error::{GridError, Result};
pub use seed::SeedPolicy;
