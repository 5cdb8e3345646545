use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use crate::trial::MAX_SCORE;

use super::{AgentSettings, EngineError, EngineGame, GameEngine};

/// Budget at which a surrogate agent reaches full strength.
const FULL_STRENGTH_BUDGET: f64 = 1_000_000.0;

/// Chance of clearing a level with no search at all.
const BASE_CLEAR_PROBABILITY: f64 = 0.7;

/// Highest chance of clearing a level, reached at full strength.
const MAX_CLEAR_PROBABILITY: f64 = 0.97;

/// A stand-in engine with the same shape as the real one.
///
/// A surrogate game climbs through `max_score` levels. Each level is cleared
/// with a probability that grows with the logarithm of the agents' search
/// budget, and the game ends at the first level that is not cleared. The
/// terminal reward is the number of cleared levels, so a reward of
/// `max_score` is a win.
///
/// Games are fully determined by their seed.
#[derive(Debug, Clone)]
pub struct SurrogateEngine {
    max_players: usize,
    max_score: u8,
}

impl Default for SurrogateEngine {
    fn default() -> Self {
        Self {
            max_players: 4,
            max_score: MAX_SCORE,
        }
    }
}

impl SurrogateEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the largest table the engine accepts.
    pub fn max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Change the number of levels, which is also the winning score.
    pub fn max_score(mut self, max_score: u8) -> Self {
        self.max_score = max_score;
        self
    }
}

/// A surrogate agent is nothing more than its settings.
#[derive(Debug, Clone)]
pub struct SurrogateAgent {
    settings: AgentSettings,
}

impl SurrogateAgent {
    /// How strong this agent plays, from 0.0 (no search) to 1.0.
    fn strength(&self) -> f64 {
        if self.settings.search_budget == 0 {
            return 0.0;
        }
        let budget = self.settings.search_budget as f64;
        let strength = (1.0 + budget).ln() / (1.0 + FULL_STRENGTH_BUDGET).ln();
        let heuristic_bonus = if self.settings.use_heuristics { 0.05 } else { 0.0 };
        (strength + heuristic_bonus).min(1.0)
    }
}

#[derive(Debug)]
pub struct SurrogateGame {
    agents: Vec<SurrogateAgent>,
    rng: StdRng,
    max_score: u8,
    reward: u8,
    finished: bool,
}

impl SurrogateGame {
    fn clear_probability(&self) -> f64 {
        let total: f64 = self.agents.iter().map(SurrogateAgent::strength).sum();
        let strength = total / self.agents.len() as f64;
        // Bigger tables share the work but pay for coordination
        let table_penalty = 0.01 * (self.agents.len() as f64 - 1.0);
        let p = BASE_CLEAR_PROBABILITY
            + (MAX_CLEAR_PROBABILITY - BASE_CLEAR_PROBABILITY) * strength
            - table_penalty;
        p.clamp(0.0, 1.0)
    }
}

impl EngineGame for SurrogateGame {
    fn playout(&mut self) -> Result<(), EngineError> {
        if self.finished {
            return Err(EngineError::Playout(
                "game has already been played".to_string(),
            ));
        }
        let p = self.clear_probability();
        let mut level = 0;
        while level < self.max_score && self.rng.random_bool(p) {
            level += 1;
        }
        trace!(level, clear_probability = p, "Surrogate game finished");
        self.reward = level;
        self.finished = true;
        Ok(())
    }

    fn reward(&self) -> u8 {
        self.reward
    }
}

impl GameEngine for SurrogateEngine {
    type Agent = SurrogateAgent;
    type Game = SurrogateGame;

    fn construct_agent(&self, settings: &AgentSettings) -> Result<SurrogateAgent, EngineError> {
        if settings.thread_hint == 0 {
            return Err(EngineError::AgentConstruction(
                "thread_hint must be at least 1".to_string(),
            ));
        }
        if settings.deterministic_samples == Some(0) {
            return Err(EngineError::AgentConstruction(
                "deterministic_samples must be positive".to_string(),
            ));
        }
        Ok(SurrogateAgent {
            settings: settings.clone(),
        })
    }

    fn construct_game(
        &self,
        agents: Vec<SurrogateAgent>,
        seed: Option<u64>,
    ) -> Result<SurrogateGame, EngineError> {
        if agents.is_empty() || agents.len() > self.max_players {
            return Err(EngineError::UnsupportedPlayerCount {
                count: agents.len(),
                max: self.max_players,
            });
        }
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        Ok(SurrogateGame {
            agents,
            rng: StdRng::seed_from_u64(seed),
            max_score: self.max_score,
            reward: 0,
            finished: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(search_budget: u64) -> AgentSettings {
        AgentSettings {
            search_budget,
            thread_hint: 1,
            policy_variant: None,
            deterministic_samples: None,
            use_heuristics: false,
        }
    }

    fn play(engine: &SurrogateEngine, budget: u64, players: usize, seed: Option<u64>) -> u8 {
        let agents = (0..players)
            .map(|_| engine.construct_agent(&settings(budget)).unwrap())
            .collect();
        let mut game = engine.construct_game(agents, seed).unwrap();
        game.playout().unwrap();
        game.reward()
    }

    #[test]
    fn test_same_seed_same_reward() {
        let engine = SurrogateEngine::new();
        for seed in 0..20 {
            assert_eq!(
                play(&engine, 1000, 3, Some(seed)),
                play(&engine, 1000, 3, Some(seed))
            );
        }
    }

    #[test]
    fn test_reward_is_bounded() {
        let engine = SurrogateEngine::new().max_score(5);
        for seed in 0..50 {
            assert!(play(&engine, 1_000_000, 1, Some(seed)) <= 5);
        }
    }

    #[test]
    fn test_more_search_scores_higher_on_average() {
        let engine = SurrogateEngine::new();
        let mean = |budget| {
            (0..400u64)
                .map(|seed| play(&engine, budget, 2, Some(seed)) as f64)
                .sum::<f64>()
                / 400.0
        };
        assert!(mean(1_000_000) > mean(0));
    }

    #[test]
    fn test_rejects_bad_player_counts() {
        let engine = SurrogateEngine::new();
        assert!(matches!(
            engine.construct_game(vec![], None),
            Err(EngineError::UnsupportedPlayerCount { count: 0, max: 4 })
        ));

        let agents = (0..5)
            .map(|_| engine.construct_agent(&settings(1)).unwrap())
            .collect();
        assert!(matches!(
            engine.construct_game(agents, None),
            Err(EngineError::UnsupportedPlayerCount { count: 5, max: 4 })
        ));
    }

    #[test]
    fn test_rejects_zero_samples() {
        let engine = SurrogateEngine::new();
        let mut bad = settings(10);
        bad.deterministic_samples = Some(0);
        assert!(engine.construct_agent(&bad).is_err());
    }

    #[test]
    fn test_cannot_play_twice() {
        let engine = SurrogateEngine::new();
        let agent = engine.construct_agent(&settings(10)).unwrap();
        let mut game = engine.construct_game(vec![agent], Some(1)).unwrap();
        game.playout().unwrap();
        assert!(game.playout().is_err());
    }
}
