use crate::{CountdownError, GamePhase};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("player name cannot be empty")]
    EmptyName,
    #[error("player name is longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("a player named {0:?} already exists")]
    DuplicateName(String),
    #[error("roster is full ({max} players)")]
    RosterFull { max: usize },
    #[error("players cannot be changed once the game has started")]
    RosterLocked,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("no players")]
    NoPlayers,
    #[error("at least {min} players are required")]
    NotEnoughPlayers { min: usize },
    #[error("player index {0} is out of range")]
    PlayerIndexOutOfRange(usize),
    #[error("no next round available")]
    NoNextRound,
    #[error("action not allowed during {0}")]
    InvalidPhase(GamePhase),
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: GamePhase, to: GamePhase },
    #[error("every player needs a personal card before the round starts")]
    PersonalCardsMissing,
    #[error("countdown error: {0}")]
    Countdown(#[from] CountdownError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("category {0:?} not found")]
    CategoryNotFound(String),
    #[error("no cards available")]
    NoCardsAvailable,
    #[error("failed to load category {name:?}: {reason}")]
    ResourceLoad { name: String, reason: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}

impl From<CountdownError> for GameError {
    fn from(value: CountdownError) -> Self {
        Self::Orchestration(OrchestrationError::Countdown(value))
    }
}
