use super::Game;
use crate::*;
use tracing::info;

impl Game {
    /// Applies a single-step transition that needs no other input.
    pub fn set_phase(&mut self, target: GamePhase) -> Result<(), GameError> {
        let from = self.phase();
        match (from, target) {
            (GamePhase::RoundInstruction { needs_setup: true }, GamePhase::PlayerInstruction) => {
                Err(OrchestrationError::PersonalCardsMissing.into())
            }
            (GamePhase::RoundInstruction { needs_setup: false }, GamePhase::PlayerInstruction) => {
                self.table.transition(target);
                Ok(())
            }
            (GamePhase::PlayerInstruction, GamePhase::Playing) => {
                let index = self.table.current_checked()?;
                let saved = self.table.roster.get(index).cloned();
                let card = self.table.deck.current().cloned();
                self.table.transition(target);
                if let Err(err) = self.strategy.start_turn(&mut self.table) {
                    self.table.transition(GamePhase::PlayerInstruction);
                    if let (Some(saved), Some(player)) = (saved, self.table.roster.get_mut(index)) {
                        player.is_main_player = saved.is_main_player;
                        player.has_been_main_player = saved.has_been_main_player;
                        player.passed_count = saved.passed_count;
                    }
                    self.table.set_current(index);
                    self.table.deck.set_current(card);
                    return Err(err);
                }
                Ok(())
            }
            (GamePhase::Playing, GamePhase::PlayerTurnResult) => {
                self.strategy.end_player_turn(&mut self.table)
            }
            (GamePhase::RoundResult, GamePhase::GameResult) if self.round().is_last() => {
                self.table.transition(target);
                Ok(())
            }
            _ => Err(OrchestrationError::InvalidTransition { from, to: target }.into()),
        }
    }

    pub fn start_turn(&mut self) -> Result<(), GameError> {
        self.set_phase(GamePhase::Playing)
    }

    pub fn validate_card(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Playing)?;
        self.strategy.validate_card(&mut self.table)
    }

    pub fn pass_card(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Playing)?;
        self.strategy.pass_card(&mut self.table)
    }

    /// The acting player stops their turn.
    pub fn end_turn(&mut self) -> Result<(), GameError> {
        self.set_phase(GamePhase::PlayerTurnResult)
    }

    pub fn advance_to_next_player(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::PlayerTurnResult)?;
        for index in 0..self.table.roster.len() {
            self.table.roster.validate_turn(index);
        }
        match self.table.next_player_index() {
            Some(next) => {
                self.table.set_current(next);
                self.table.transition(GamePhase::PlayerInstruction);
            }
            None => {
                for index in 0..self.table.roster.len() {
                    self.table.roster.validate_round(index);
                }
                info!(round = self.round().ordinal(), "round finished");
                self.table.transition(GamePhase::RoundResult);
            }
        }
        Ok(())
    }

    pub fn advance_to_next_round(&mut self) -> Result<(), GameError> {
        let next = self.round().next().ok_or(OrchestrationError::NoNextRound)?;
        self.require_phase(GamePhase::RoundResult)?;
        self.begin_round(next)
    }

    pub fn finish_game(&mut self) -> Result<(), GameError> {
        if !self.round().is_last() {
            return Err(OrchestrationError::InvalidTransition {
                from: self.phase(),
                to: GamePhase::GameResult,
            }
            .into());
        }
        self.set_phase(GamePhase::GameResult)
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Playing)?;
        if self.table.countdown().state() == CountdownState::Running {
            self.table.countdown_mut().pause();
            let remaining = self.table.countdown().remaining();
            self.table.events.push(Event::TimerPaused { remaining });
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Playing)?;
        if self.table.countdown().state() == CountdownState::Paused {
            self.table.countdown_mut().resume();
            let remaining = self.table.countdown().remaining();
            self.table.events.push(Event::TimerResumed { remaining });
        }
        Ok(())
    }
}
