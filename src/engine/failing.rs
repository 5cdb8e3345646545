use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use super::{AgentSettings, EngineError, EngineGame, GameEngine};

type FailPredicate = dyn Fn(Option<u64>, usize) -> bool + Send + Sync;

/// An engine that fails chosen games during playout.
///
/// Whether a game fails is decided from its seed and player count when the
/// game is constructed, so the same trial always fails the same way. This
/// engine is useful for testing how the dispatcher and harness handle
/// partial failure.
#[derive(Clone)]
pub struct FailingEngine<E> {
    inner: E,
    should_fail: Arc<FailPredicate>,
}

impl<E> std::fmt::Debug for FailingEngine<E>
where
    E: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailingEngine")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<E: GameEngine> FailingEngine<E> {
    /// Fail every game for which `should_fail(seed, player_count)` is true.
    pub fn new<F>(inner: E, should_fail: F) -> Self
    where
        F: Fn(Option<u64>, usize) -> bool + Send + Sync + 'static,
    {
        Self {
            inner,
            should_fail: Arc::new(should_fail),
        }
    }

    /// Fail every game.
    pub fn always(inner: E) -> Self {
        Self::new(inner, |_, _| true)
    }

    /// Fail games whose seed is in `seeds`. Unseeded games never fail.
    pub fn failing_seeds(inner: E, seeds: impl IntoIterator<Item = u64>) -> Self {
        let seeds: HashSet<u64> = seeds.into_iter().collect();
        Self::new(inner, move |seed, _| seed.is_some_and(|s| seeds.contains(&s)))
    }
}

/// Either the wrapped game, or a game that will fail when played.
pub enum FailingGame<G> {
    Healthy(G),
    Doomed,
}

impl<G: EngineGame> EngineGame for FailingGame<G> {
    fn playout(&mut self) -> Result<(), EngineError> {
        match self {
            FailingGame::Healthy(game) => game.playout(),
            FailingGame::Doomed => {
                warn!("FailingEngine intentionally failing playout");
                Err(EngineError::Playout("injected failure".to_string()))
            }
        }
    }

    fn reward(&self) -> u8 {
        match self {
            FailingGame::Healthy(game) => game.reward(),
            FailingGame::Doomed => 0,
        }
    }
}

impl<E: GameEngine> GameEngine for FailingEngine<E> {
    type Agent = E::Agent;
    type Game = FailingGame<E::Game>;

    fn construct_agent(&self, settings: &AgentSettings) -> Result<E::Agent, EngineError> {
        self.inner.construct_agent(settings)
    }

    fn construct_game(
        &self,
        agents: Vec<E::Agent>,
        seed: Option<u64>,
    ) -> Result<Self::Game, EngineError> {
        if (self.should_fail)(seed, agents.len()) {
            return Ok(FailingGame::Doomed);
        }
        Ok(FailingGame::Healthy(self.inner.construct_game(agents, seed)?))
    }
}
