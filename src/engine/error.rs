use thiserror::Error;

/// A failure raised while setting up or playing a game.
#[derive(Error, Debug, PartialEq, Eq, Clone, Hash)]
pub enum EngineError {
    #[error("Failed to construct agent: {0}")]
    AgentConstruction(String),

    #[error("Unsupported player count {count}, the engine supports 1 to {max}")]
    UnsupportedPlayerCount { count: usize, max: usize },

    #[error("Game failed during playout: {0}")]
    Playout(String),

    #[error("Reward {reward} is above the maximum score {max}")]
    RewardOutOfRange { reward: u8, max: u8 },

    #[error("Engine panicked: {0}")]
    Panicked(String),
}
