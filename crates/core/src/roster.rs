use crate::{Card, ValidationError};
use serde::{Deserialize, Serialize};

pub const MAX_PLAYERS: usize = 9;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_NAME_LEN: usize = 20;
pub const DEFAULT_ICON: &str = "person";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub icon: String,
    pub score: i64,
    pub round_score: i64,
    pub turn_score: i64,
    pub remaining_turns: u32,
    pub is_main_player: bool,
    pub has_been_main_player: bool,
    pub is_eliminated: bool,
    pub passed_count: u32,
    #[serde(default)]
    pub personal_card: Option<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: DEFAULT_ICON.to_string(),
            score: 0,
            round_score: 0,
            turn_score: 0,
            remaining_turns: 0,
            is_main_player: false,
            has_been_main_player: false,
            is_eliminated: false,
            passed_count: 0,
            personal_card: None,
        }
    }

    pub fn has_turns_left(&self) -> bool {
        !self.is_eliminated && self.remaining_turns > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims and checks `name` against the roster.
    pub fn validate_name(&self, name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::NameTooLong { max: MAX_NAME_LEN });
        }
        let lowered = name.to_lowercase();
        if self
            .players
            .iter()
            .any(|player| player.name.to_lowercase() == lowered)
        {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        Ok(name.to_string())
    }

    pub fn add(&mut self, name: &str) -> Result<PlayerId, ValidationError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(ValidationError::RosterFull { max: MAX_PLAYERS });
        }
        let name = self.validate_name(name)?;
        let id = PlayerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.players.push(Player::new(id, name));
        Ok(id)
    }

    pub fn remove(&mut self, index: usize) -> Option<Player> {
        if index >= self.players.len() {
            return None;
        }
        Some(self.players.remove(index))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Player> {
        self.players.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> + '_ {
        self.players.iter_mut()
    }

    pub fn main_player_index(&self) -> Option<usize> {
        self.players.iter().position(|player| player.is_main_player)
    }

    pub fn non_eliminated_count(&self) -> usize {
        self.players.iter().filter(|player| !player.is_eliminated).count()
    }

    pub fn reset_scores(&mut self) {
        for player in &mut self.players {
            player.score = 0;
            player.round_score = 0;
            player.turn_score = 0;
        }
    }

    pub fn reset_round_scores(&mut self) {
        for player in &mut self.players {
            player.round_score = 0;
            player.turn_score = 0;
        }
    }

    pub fn set_remaining_turns(&mut self, turns: u32) {
        for player in &mut self.players {
            player.remaining_turns = turns;
        }
    }

    pub fn reset_main_player_flags(&mut self) {
        for player in &mut self.players {
            player.is_main_player = false;
            player.has_been_main_player = false;
        }
    }

    pub fn reset_elimination_flags(&mut self) {
        for player in &mut self.players {
            player.is_eliminated = false;
        }
    }

    pub fn reset_passed_counts(&mut self) {
        for player in &mut self.players {
            player.passed_count = 0;
        }
    }

    pub fn clear_personal_cards(&mut self) {
        for player in &mut self.players {
            player.personal_card = None;
        }
    }

    /// Adds `points` to the player's turn score. Scores may go negative.
    pub fn add_turn_score(&mut self, index: usize, points: i64) {
        if let Some(player) = self.players.get_mut(index) {
            player.turn_score += points;
        }
    }

    pub fn validate_turn(&mut self, index: usize) {
        if let Some(player) = self.players.get_mut(index) {
            player.round_score += player.turn_score;
            player.turn_score = 0;
        }
    }

    /// Adds the round score to the aggregate. The round score stays visible
    /// until the next round resets it.
    pub fn validate_round(&mut self, index: usize) {
        if let Some(player) = self.players.get_mut(index) {
            player.score += player.round_score;
        }
    }

    /// Players ordered by aggregate score, best first; ties keep name order.
    pub fn ranking(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        ranked
    }
}
