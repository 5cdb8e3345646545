//! The one place the harness calls into a game engine.
use tracing::{instrument, trace};

use crate::engine::{AgentSettings, EngineError, EngineGame, GameEngine};
use crate::trial::{MAX_SCORE, ResultRow, TrialSpec};

/// Turns a [`TrialSpec`] into a [`ResultRow`] by playing the game.
///
/// Implementations are called from many worker threads at once. Each call
/// must own everything it mutates.
pub trait SimulationAdapter: Send + Sync {
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError>;
}

impl<A: SimulationAdapter + ?Sized> SimulationAdapter for &A {
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError> {
        (**self).run(spec)
    }
}

impl<A: SimulationAdapter + ?Sized> SimulationAdapter for std::sync::Arc<A> {
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError> {
        (**self).run(spec)
    }
}

/// Plays trials on a [`GameEngine`].
///
/// Every seat gets an identical agent built from the [`TrialSpec`], then one
/// game is built with the trial's seed and played to the end.
#[derive(Debug, Clone)]
pub struct EngineAdapter<E> {
    engine: E,
    use_heuristics: bool,
    max_score: u8,
}

impl<E: GameEngine> EngineAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            use_heuristics: false,
            max_score: MAX_SCORE,
        }
    }

    /// Let search agents use domain heuristics.
    pub fn use_heuristics(mut self, use_heuristics: bool) -> Self {
        self.use_heuristics = use_heuristics;
        self
    }

    /// The highest reward the engine may report. Anything above is treated
    /// as an engine failure.
    pub fn max_score(mut self, max_score: u8) -> Self {
        self.max_score = max_score;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: GameEngine> SimulationAdapter for EngineAdapter<E> {
    #[instrument(level = "trace", skip(self), fields(agent = %spec.agent_label))]
    fn run(&self, spec: &TrialSpec) -> Result<ResultRow, EngineError> {
        let settings = AgentSettings::from_spec(spec, self.use_heuristics);
        let agents = (0..spec.player_count)
            .map(|_| self.engine.construct_agent(&settings))
            .collect::<Result<Vec<_>, _>>()?;

        let mut game = self.engine.construct_game(agents, spec.seed)?;
        game.playout()?;

        let reward = game.reward();
        if reward > self.max_score {
            return Err(EngineError::RewardOutOfRange {
                reward,
                max: self.max_score,
            });
        }
        trace!(reward, "Trial complete");
        Ok(ResultRow::from_spec(spec, reward))
    }
}
