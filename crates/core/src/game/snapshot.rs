use super::Game;
use crate::*;
use serde::{Deserialize, Serialize};

/// Read-only view of everything a presentation layer renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub round: RoundNumber,
    pub round_title: String,
    pub players: Vec<Player>,
    pub current_index: Option<usize>,
    pub current_card: Option<Card>,
    pub deck_exhausted: bool,
    pub countdown_state: CountdownState,
    pub countdown_remaining: u32,
    pub countdown_progress: f32,
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase(),
            round: self.round(),
            round_title: self.round_config().title.clone(),
            players: self.players().to_vec(),
            current_index: self.current_player().ok().map(|_| self.current_index()),
            current_card: self.current_card().cloned(),
            deck_exhausted: self.deck_exhausted(),
            countdown_state: self.countdown_state(),
            countdown_remaining: self.countdown_remaining(),
            countdown_progress: self.countdown_progress(),
        }
    }
}
