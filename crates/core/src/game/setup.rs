use super::Game;
use crate::*;
use tracing::info;

impl Game {
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, ValidationError> {
        if self.phase() != GamePhase::PlayersSetup {
            return Err(ValidationError::RosterLocked);
        }
        let id = self.table.roster.add(name)?;
        let name = self
            .table
            .roster
            .players()
            .last()
            .map(|player| player.name.clone())
            .unwrap_or_default();
        self.table.events.push(Event::PlayerAdded { id, name });
        Ok(id)
    }

    pub fn remove_player(&mut self, index: usize) -> Result<Player, OrchestrationError> {
        self.require_phase(GamePhase::PlayersSetup)?;
        let player = self
            .table
            .roster
            .remove(index)
            .ok_or(OrchestrationError::PlayerIndexOutOfRange(index))?;
        self.table.clamp_current();
        self.table.events.push(Event::PlayerRemoved {
            id: player.id,
            name: player.name.clone(),
        });
        Ok(player)
    }

    pub fn start_game(&mut self) -> Result<(), GameError> {
        self.require_phase(GamePhase::PlayersSetup)?;
        match self.table.roster.len() {
            0 => return Err(OrchestrationError::NoPlayers.into()),
            len if len < MIN_PLAYERS => {
                return Err(OrchestrationError::NotEnoughPlayers { min: MIN_PLAYERS }.into())
            }
            _ => {}
        }
        self.table.roster.reset_scores();
        self.begin_round(RoundNumber::One)?;
        info!(players = self.table.roster.len(), "game started");
        self.table.events.push(Event::GameStarted {
            players: self.table.roster.len(),
        });
        Ok(())
    }

    /// Back to player setup with the same players and a clean slate.
    pub fn reset_game(&mut self) {
        self.table.stop_countdown();
        let roster = &mut self.table.roster;
        roster.reset_scores();
        roster.reset_elimination_flags();
        roster.reset_main_player_flags();
        roster.reset_passed_counts();
        roster.clear_personal_cards();
        roster.set_remaining_turns(0);
        self.table.deck.reset();
        let settings = self.settings.settings();
        self.table
            .set_config(RoundConfig::for_round(RoundNumber::One, &settings));
        self.strategy = RoundStrategy::for_round(RoundNumber::One);
        self.table.set_current(0);
        self.table.clamp_current();
        self.table.transition(GamePhase::PlayersSetup);
        self.table.events.push(Event::GameReset);
    }

    /// Prepares `round`: fresh per-round player state, new rules, new deck.
    pub(super) fn begin_round(&mut self, round: RoundNumber) -> Result<(), GameError> {
        let settings = self.settings.settings();
        if self
            .table
            .catalog
            .eligible_themes(round, None, &settings.selected_categories)
            .is_empty()
        {
            return Err(DeckError::NoCardsAvailable.into());
        }

        let config = RoundConfig::for_round(round, &settings);
        let roster = &mut self.table.roster;
        roster.reset_round_scores();
        roster.reset_elimination_flags();
        roster.reset_main_player_flags();
        roster.reset_passed_counts();
        roster.set_remaining_turns(config.turns_per_player);
        self.table
            .deck
            .set_selected_categories(settings.selected_categories);
        self.table.set_config(config);
        self.table.set_current(0);
        self.strategy = RoundStrategy::for_round(round);
        self.strategy.setup_round(&mut self.table)?;

        let needs_setup = self.strategy.needs_setup(&self.table);
        self.table
            .transition(GamePhase::RoundInstruction { needs_setup });
        Ok(())
    }

    /// Regenerates the current round's deck.
    pub fn generate_cards_for_current_round(&mut self) -> Result<(), GameError> {
        match self.phase() {
            GamePhase::PlayersSetup | GamePhase::GameResult => {
                Err(OrchestrationError::InvalidPhase(self.phase()).into())
            }
            _ => self.strategy.setup_round(&mut self.table),
        }
    }

    /// The player who still has to pick a personal card, if any.
    pub fn personal_card_candidate(&self) -> Option<usize> {
        self.table
            .roster
            .players()
            .iter()
            .position(|player| player.personal_card.is_none())
    }

    /// Draws a personal card from `category` for the next player without one.
    pub fn generate_personal_card(&mut self, category: &str) -> Result<Card, GameError> {
        let phase = self.phase();
        if self.round() != RoundNumber::Three
            || !matches!(phase, GamePhase::RoundInstruction { .. })
        {
            return Err(OrchestrationError::InvalidPhase(phase).into());
        }
        let index = self
            .personal_card_candidate()
            .ok_or(OrchestrationError::InvalidPhase(phase))?;
        let card = self.table.deck.generate_personal_card(
            &self.table.catalog,
            category,
            &mut self.table.rng,
        )?;
        if let Some(player) = self.table.roster.get_mut(index) {
            player.personal_card = Some(card.clone());
            let id = player.id;
            self.table
                .events
                .push(Event::PersonalCardAssigned { player: id });
        }
        let needs_setup = self.strategy.needs_setup(&self.table);
        self.table
            .transition(GamePhase::RoundInstruction { needs_setup });
        Ok(card)
    }
}
