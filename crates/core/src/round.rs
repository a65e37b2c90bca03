//! Per-round rules. Each round is a value type implementing [`RoundRules`];
//! [`RoundStrategy`] closes the set so dispatch stays exhaustive.

use crate::{DeckError, Event, GameError, GamePhase, RoundNumber, Table};
use tracing::info;

mod hot_seat;
mod speed;
mod timed;

pub use hot_seat::HotSeatRound;
pub use speed::SpeedRound;
pub use timed::TimedRound;

pub trait RoundRules {
    /// Seeds the deck for the round.
    fn setup_round(&mut self, table: &mut Table) -> Result<(), GameError>;

    /// Runs every time the table enters `Playing`.
    fn start_turn(&mut self, table: &mut Table) -> Result<(), GameError>;

    fn validate_card(&mut self, table: &mut Table) -> Result<(), GameError>;

    fn pass_card(&mut self, table: &mut Table) -> Result<(), GameError>;

    fn timer_finished(&mut self, table: &mut Table) -> Result<(), GameError>;

    fn end_player_turn(&mut self, table: &mut Table) -> Result<(), GameError>;

    fn expected_response_count(&self, _table: &Table) -> i64 {
        1
    }

    /// Whether the round still needs per-player preparation before play.
    fn needs_setup(&self, _table: &Table) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub enum RoundStrategy {
    Speed(SpeedRound),
    Timed(TimedRound),
    HotSeat(HotSeatRound),
}

impl RoundStrategy {
    pub fn for_round(round: RoundNumber) -> Self {
        match round {
            RoundNumber::One => Self::Speed(SpeedRound),
            RoundNumber::Two => Self::Timed(TimedRound),
            RoundNumber::Three => Self::HotSeat(HotSeatRound),
        }
    }

    pub fn round(&self) -> RoundNumber {
        match self {
            Self::Speed(_) => RoundNumber::One,
            Self::Timed(_) => RoundNumber::Two,
            Self::HotSeat(_) => RoundNumber::Three,
        }
    }

    fn rules(&self) -> &dyn RoundRules {
        match self {
            Self::Speed(rules) => rules,
            Self::Timed(rules) => rules,
            Self::HotSeat(rules) => rules,
        }
    }

    fn rules_mut(&mut self) -> &mut dyn RoundRules {
        match self {
            Self::Speed(rules) => rules,
            Self::Timed(rules) => rules,
            Self::HotSeat(rules) => rules,
        }
    }
}

impl RoundRules for RoundStrategy {
    fn setup_round(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().setup_round(table)
    }

    fn start_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().start_turn(table)
    }

    fn validate_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().validate_card(table)
    }

    fn pass_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().pass_card(table)
    }

    fn timer_finished(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().timer_finished(table)
    }

    fn end_player_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.rules_mut().end_player_turn(table)
    }

    fn expected_response_count(&self, table: &Table) -> i64 {
        self.rules().expected_response_count(table)
    }

    fn needs_setup(&self, table: &Table) -> bool {
        self.rules().needs_setup(table)
    }
}

/// Regenerates the shared deck with the round's size and the current
/// category selection.
fn seed_deck(table: &mut Table) -> Result<(), GameError> {
    let round = table.round();
    let count = table.config().deck_size;
    let cards = table
        .deck
        .generate(&table.catalog, count, None, round, &mut table.rng)?;
    info!(round = round.ordinal(), cards, "round deck ready");
    table.events.push(Event::RoundStarted { round, cards });
    Ok(())
}

/// Fails before any score moves when the deck cannot produce another card.
fn ensure_drawable(table: &Table) -> Result<(), GameError> {
    if table.deck.is_exhausted() {
        return Err(DeckError::NoCardsAvailable.into());
    }
    Ok(())
}

/// Marks the current player as the one playing and clears their counters.
fn begin_turn(table: &mut Table) -> Result<usize, GameError> {
    let index = table.current_checked()?;
    if let Some(player) = table.roster.get_mut(index) {
        player.is_main_player = true;
        player.has_been_main_player = true;
        player.passed_count = 0;
    }
    Ok(index)
}

/// Closes a single-player turn: uses up one turn and shows the result.
fn finish_turn(table: &mut Table) -> Result<(), GameError> {
    let index = table.current_checked()?;
    table.stop_countdown();
    if let Some(player) = table.roster.get_mut(index) {
        player.remaining_turns = player.remaining_turns.saturating_sub(1);
        player.is_main_player = false;
    }
    table.transition(GamePhase::PlayerTurnResult);
    Ok(())
}

fn record_pass(table: &mut Table, index: usize, penalty: i64) {
    if let Some(player) = table.roster.get_mut(index) {
        player.passed_count += 1;
        let id = player.id;
        table.roster.add_turn_score(index, -penalty);
        table.events.push(Event::CardPassed {
            player: id,
            penalty,
        });
    }
}

fn record_points(table: &mut Table, index: usize, points: i64) {
    table.roster.add_turn_score(index, points);
    if let Some(player) = table.roster.get(index) {
        let id = player.id;
        table.events.push(Event::CardValidated { player: id, points });
    }
}
