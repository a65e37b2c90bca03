use crate::{
    Card, CategoryCatalog, CountdownState, Event, GamePhase, OrchestrationError, Player,
    RoundConfig, RoundNumber, RoundRules, RoundStrategy, SettingsStore, Table, TimerEvent,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

mod flow;
mod setup;
mod snapshot;
mod timer;

pub use snapshot::GameSnapshot;

/// The whole game: phase machine, roster, deck, countdown and the rules of
/// the round being played. Presentation layers drive it through its actions
/// and observe it through accessors, [`Game::snapshot`] and
/// [`Game::drain_events`].
pub struct Game {
    table: Table,
    strategy: RoundStrategy,
    settings: Box<dyn SettingsStore + Send>,
    timer_rx: UnboundedReceiver<TimerEvent>,
}

impl Game {
    pub fn new(
        catalog: CategoryCatalog,
        settings: impl SettingsStore + Send + 'static,
        seed: u64,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let table = Table::new(catalog, &settings.settings(), seed, timer_tx);
        Self {
            table,
            strategy: RoundStrategy::for_round(RoundNumber::One),
            settings: Box::new(settings),
            timer_rx,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Direct access for tooling and tests. Bypasses phase checks.
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn phase(&self) -> GamePhase {
        self.table.phase()
    }

    pub fn round(&self) -> RoundNumber {
        self.table.round()
    }

    pub fn round_config(&self) -> &RoundConfig {
        self.table.config()
    }

    pub fn players(&self) -> &[Player] {
        self.table.roster.players()
    }

    pub fn current_index(&self) -> usize {
        self.table.current_index()
    }

    pub fn current_player(&self) -> Result<&Player, OrchestrationError> {
        self.table.current_player()
    }

    pub fn next_player(&self) -> Option<usize> {
        self.table.next_player_index()
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.table.deck.current()
    }

    pub fn deck_exhausted(&self) -> bool {
        self.table.deck.is_exhausted()
    }

    pub fn countdown_remaining(&self) -> u32 {
        self.table.countdown().remaining()
    }

    pub fn countdown_progress(&self) -> f32 {
        self.table.countdown().progress()
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.table.countdown().state()
    }

    pub fn expected_response_count(&self) -> i64 {
        self.strategy.expected_response_count(&self.table)
    }

    pub fn ranking(&self) -> Vec<&Player> {
        self.table.roster.ranking()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.table.events.drain().collect()
    }

    fn require_phase(&self, expected: GamePhase) -> Result<(), OrchestrationError> {
        if self.phase() != expected {
            return Err(OrchestrationError::InvalidPhase(self.phase()));
        }
        Ok(())
    }
}
