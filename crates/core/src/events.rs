use crate::{GamePhase, PlayerId, RoundNumber};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    PlayerAdded { id: PlayerId, name: String },
    PlayerRemoved { id: PlayerId, name: String },
    GameStarted { players: usize },
    RoundStarted { round: RoundNumber, cards: usize },
    PhaseChanged { from: GamePhase, to: GamePhase },
    CurrentPlayerChanged { index: usize, id: PlayerId },
    CardDrawn { title: String, category: String },
    CardValidated { player: PlayerId, points: i64 },
    CardPassed { player: PlayerId, penalty: i64 },
    PlayerEliminated { player: PlayerId, by: PlayerId },
    HotSeatWon { player: PlayerId, bonus: i64 },
    PersonalCardAssigned { player: PlayerId },
    TimerTick { remaining: u32 },
    TimerFinished,
    TimerPaused { remaining: u32 },
    TimerResumed { remaining: u32 },
    GameReset,
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
