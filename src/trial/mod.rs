//! The data that flows through a grid search: one [`TrialSpec`] describing a
//! game to play, and one [`ResultRow`] recording how it ended.
//!
//! Both are immutable values. A spec has no identity beyond its fields, two
//! equal specs describe interchangeable trials.
mod label;
mod row;
mod spec;

pub use label::AgentLabel;
pub use row::ResultRow;
pub use spec::TrialSpec;

/// The terminal score of a won game. Scores range over `0..=MAX_SCORE`.
pub const MAX_SCORE: u8 = 12;

/// Label used for the non-search baseline agent.
pub const BASELINE_LABEL: &str = "Random";

/// Label prefix used for tree-search agents, followed by `_<budget>`.
pub const SEARCH_LABEL_PREFIX: &str = "MCTS";
