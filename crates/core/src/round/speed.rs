use super::{
    begin_turn, ensure_drawable, finish_turn, record_pass, record_points, seed_deck, RoundRules,
};
use crate::{GameError, Table};

/// Round 1: name as many cards as possible. No countdown; the player stops
/// the turn themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedRound;

impl RoundRules for SpeedRound {
    fn setup_round(&mut self, table: &mut Table) -> Result<(), GameError> {
        seed_deck(table)
    }

    fn start_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        begin_turn(table)?;
        table.draw_card()?;
        Ok(())
    }

    fn validate_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        let index = table.current_checked()?;
        ensure_drawable(table)?;
        record_points(table, index, 1);
        table.draw_card()?;
        Ok(())
    }

    fn pass_card(&mut self, table: &mut Table) -> Result<(), GameError> {
        let index = table.current_checked()?;
        ensure_drawable(table)?;
        record_pass(table, index, 0);
        table.draw_card()?;
        Ok(())
    }

    // Only reachable when the presentation runs its own clock for this round.
    fn timer_finished(&mut self, table: &mut Table) -> Result<(), GameError> {
        self.end_player_turn(table)
    }

    fn end_player_turn(&mut self, table: &mut Table) -> Result<(), GameError> {
        finish_turn(table)
    }
}
