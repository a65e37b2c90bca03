use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    PlayersSetup,
    RoundInstruction { needs_setup: bool },
    PlayerInstruction,
    Playing,
    PlayerTurnResult,
    RoundResult,
    GameResult,
}

impl GamePhase {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayersSetup => "players setup",
            Self::RoundInstruction { needs_setup: true } => "round instruction (setup pending)",
            Self::RoundInstruction { needs_setup: false } => "round instruction",
            Self::PlayerInstruction => "player instruction",
            Self::Playing => "playing",
            Self::PlayerTurnResult => "turn result",
            Self::RoundResult => "round result",
            Self::GameResult => "game result",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoundNumber {
    #[default]
    One,
    Two,
    Three,
}

impl RoundNumber {
    pub const ALL: [RoundNumber; 3] = [RoundNumber::One, RoundNumber::Two, RoundNumber::Three];

    pub fn ordinal(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ordinal())
    }
}
