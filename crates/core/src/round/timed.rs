use super::{
    begin_turn, ensure_drawable, finish_turn, record_pass, record_points, seed_deck, RoundRules,
};
use crate::{GameError, Table};

/// Round 2: one card per turn against the clock. Validating scores the
/// seconds left; every pass costs the number of answers the turn expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimedRound;

impl RoundRules for TimedRound {
    fn setup_round(&mut self, table: &mut Table) -> Result<(), GameError> {
        seed_deck(table)
    }

    fn start_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        begin_turn(table)?;
        table.draw_card()?;
        let seconds = table.config().timer_seconds;
        table.start_countdown(seconds)?;
        Ok(())
    }

    fn validate_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        let index = table.current_checked()?;
        let points = i64::from(table.countdown().remaining());
        record_points(table, index, points);
        self.end_player_turn(table)
    }

    fn pass_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        let index = table.current_checked()?;
        ensure_drawable(table)?;
        let penalty = self.expected_response_count(table);
        record_pass(table, index, penalty);
        table.draw_card()?;
        Ok(())
    }

    fn timer_finished(&mut self, table: &mut Table) -> Result<(), GameError> {
        let index = table.current_checked()?;
        let penalty = self.expected_response_count(table);
        table.roster.add_turn_score(index, -penalty);
        finish_turn(table)
    }

    fn end_player_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        finish_turn(table)
    }

    /// Later turns ask for more answers: 3, then 4, then 5.
    fn expected_response_count(&self, table: &Table) -> i64 {
        match table.current_player().map(|player| player.remaining_turns) {
            Ok(3) => 3,
            Ok(2) => 4,
            Ok(1) => 5,
            _ => 3,
        }
    }
}
