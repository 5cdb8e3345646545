//! The boundary to the game engine.
//!
//! The harness never looks inside a game. It needs four capabilities: build
//! an agent from its settings, build a game from a list of agents and an
//! optional seed, play the game to the end, and read the terminal reward.
//! Anything that implements [`GameEngine`] can be dropped into the
//! [`crate::adapter::EngineAdapter`].
//!
//! Two engines ship with the crate:
//!
//! - [`SurrogateEngine`] plays a cheap seeded stand-in game whose scores
//!   improve with the search budget. It is what the CLI runs and what the
//!   tests exercise.
//! - [`FailingEngine`] wraps another engine and fails selected games, for
//!   testing partial-failure handling.
mod error;
mod failing;
mod surrogate;

pub use error::EngineError;
pub use failing::{FailingEngine, FailingGame};
pub use surrogate::{SurrogateAgent, SurrogateEngine, SurrogateGame};

use serde::{Deserialize, Serialize};

use crate::trial::TrialSpec;

/// How to build one agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Search iterations per decision, zero for the non-search baseline
    pub search_budget: u64,
    /// Threads the agent may use for its own search
    pub thread_hint: usize,
    pub policy_variant: Option<u8>,
    pub deterministic_samples: Option<u64>,
    /// Whether the search should use domain heuristics in its rollouts
    pub use_heuristics: bool,
}

impl AgentSettings {
    pub fn from_spec(spec: &TrialSpec, use_heuristics: bool) -> Self {
        Self {
            search_budget: spec.search_budget,
            thread_hint: spec.thread_hint,
            policy_variant: spec.policy_variant,
            deterministic_samples: spec.deterministic_samples,
            use_heuristics,
        }
    }
}

/// A game that has been set up and can be played to completion.
pub trait EngineGame {
    /// Play the game until it reaches a terminal state. This blocks for the
    /// whole game.
    fn playout(&mut self) -> Result<(), EngineError>;

    /// The terminal score. Only meaningful after a successful `playout`.
    fn reward(&self) -> u8;
}

/// Constructs agents and games.
///
/// Engines are shared between worker threads, so construction must not
/// touch shared mutable state. Every game owns its agents.
pub trait GameEngine: Send + Sync {
    type Agent;
    type Game: EngineGame;

    fn construct_agent(&self, settings: &AgentSettings) -> Result<Self::Agent, EngineError>;

    fn construct_game(
        &self,
        agents: Vec<Self::Agent>,
        seed: Option<u64>,
    ) -> Result<Self::Game, EngineError>;
}
