use super::{begin_turn, seed_deck, RoundRules};
use crate::{Event, GameError, GamePhase, OrchestrationError, RoundNumber, Table};
use tracing::debug;

/// Round 3: the main player describes their personal card while the others
/// take turns guessing under a shared countdown. A wrong or late guess
/// eliminates the guesser and scores for the main player.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotSeatRound;

impl HotSeatRound {
    fn restart_countdown(table: &mut Table) -> Result<(), GameError> {
        let seconds = table.config().timer_seconds;
        table.start_countdown(seconds)?;
        Ok(())
    }

    fn rotate(table: &mut Table) -> Result<(), GameError> {
        if let Some(next) = table.next_player_index() {
            table.set_current(next);
        }
        Self::restart_countdown(table)
    }

    /// Wrong answer or timeout for the acting player.
    fn miss(&mut self, table: &mut Table) -> Result<(), GameError> {
        let acting = table.current_checked()?;
        let Some(main) = table.roster.main_player_index() else {
            return self.end_player_turn(table);
        };
        if acting == main {
            return self.end_player_turn(table);
        }
        let (Some(guesser), Some(main_player)) = (table.roster.get(acting), table.roster.get(main))
        else {
            return Ok(());
        };
        let (guesser_id, main_id) = (guesser.id, main_player.id);
        if let Some(player) = table.roster.get_mut(acting) {
            player.is_eliminated = true;
        }
        table.roster.add_turn_score(main, 1);
        table.events.push(Event::PlayerEliminated {
            player: guesser_id,
            by: main_id,
        });
        debug!(player = guesser_id.0, main = main_id.0, "player eliminated");
        self.check_victory(table, main)
    }

    fn check_victory(&mut self, table: &mut Table, main: usize) -> Result<(), GameError> {
        if table.roster.non_eliminated_count() == 1 {
            let bonus = 2 * table.roster.len() as i64;
            table.roster.add_turn_score(main, bonus);
            if let Some(player) = table.roster.get(main) {
                let id = player.id;
                table.events.push(Event::HotSeatWon { player: id, bonus });
            }
            return self.end_player_turn(table);
        }
        Self::rotate(table)
    }
}

impl RoundRules for HotSeatRound {
    fn setup_round(&mut self, table: &mut Table) -> Result<(), GameError> {
        seed_deck(table)
    }

    fn start_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        if self.needs_setup(table) {
            return Err(OrchestrationError::PersonalCardsMissing.into());
        }
        let main = begin_turn(table)?;
        if let Some(card) = table
            .roster
            .get(main)
            .and_then(|player| player.personal_card.clone())
        {
            table.show_card(card);
        }
        Self::rotate(table)
    }

    fn validate_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        table.current_checked()?;
        Self::rotate(table)
    }

    fn pass_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.miss(table)
    }

    fn timer_finished(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.miss(table)
    }

    fn end_player_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        table.stop_countdown();
        if let Some(main) = table.roster.main_player_index() {
            table.set_current(main);
            if let Some(player) = table.roster.get_mut(main) {
                player.is_main_player = false;
            }
        }
        table.roster.reset_elimination_flags();
        table.transition(GamePhase::PlayerTurnResult);
        Ok(())
    }

    fn needs_setup(&self, table: &Table) -> bool {
        table.round() == RoundNumber::Three
            && table
                .roster
                .players()
                .iter()
                .any(|player| player.personal_card.is_none())
    }
}
