use crate::{
    Card, CategoryCatalog, Countdown, CountdownError, Deck, DeckError, Event, EventBus, GamePhase,
    OrchestrationError, Player, RngState, RoundConfig, RoundNumber, Roster, Settings,
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimerEventKind {
    Tick(u32),
    Finished,
}

/// Countdown report tagged with the run that produced it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerEvent {
    pub run: u64,
    pub kind: TimerEventKind,
}

/// Everything a round strategy may touch while applying its rules.
#[derive(Debug)]
pub struct Table {
    pub roster: Roster,
    pub deck: Deck,
    pub catalog: CategoryCatalog,
    pub rng: RngState,
    pub events: EventBus,
    countdown: Countdown,
    phase: GamePhase,
    config: RoundConfig,
    current: usize,
    timer_tx: UnboundedSender<TimerEvent>,
    timer_run: u64,
}

impl Table {
    pub(crate) fn new(
        catalog: CategoryCatalog,
        settings: &Settings,
        seed: u64,
        timer_tx: UnboundedSender<TimerEvent>,
    ) -> Self {
        let mut deck = Deck::new();
        deck.set_selected_categories(settings.selected_categories.clone());
        Self {
            roster: Roster::new(),
            deck,
            catalog,
            rng: RngState::from_seed(seed),
            events: EventBus::default(),
            countdown: Countdown::new(),
            phase: GamePhase::PlayersSetup,
            config: RoundConfig::for_round(RoundNumber::One, settings),
            current: 0,
            timer_tx,
            timer_run: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> RoundNumber {
        self.config.round
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: RoundConfig) {
        self.config = config;
    }

    /// Moves to `to` and reports it. Leaving `Playing` stops the countdown.
    pub fn transition(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        if from.is_playing() {
            self.stop_countdown();
        }
        self.phase = to;
        debug!(%from, %to, round = self.round().ordinal(), "phase transition");
        self.events.push(Event::PhaseChanged { from, to });
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn set_current(&mut self, index: usize) {
        let Some(player) = self.roster.get(index) else {
            return;
        };
        let id = player.id;
        if self.current != index {
            self.current = index;
            self.events.push(Event::CurrentPlayerChanged { index, id });
        }
    }

    pub(crate) fn clamp_current(&mut self) {
        if self.roster.is_empty() {
            self.current = 0;
        } else if self.current >= self.roster.len() {
            self.current = self.roster.len() - 1;
        }
    }

    pub fn current_player(&self) -> Result<&Player, OrchestrationError> {
        if self.roster.is_empty() {
            return Err(OrchestrationError::NoPlayers);
        }
        self.roster
            .get(self.current)
            .ok_or(OrchestrationError::PlayerIndexOutOfRange(self.current))
    }

    pub(crate) fn current_checked(&self) -> Result<usize, OrchestrationError> {
        self.current_player().map(|_| self.current)
    }

    fn is_eligible(&self, player: &Player) -> bool {
        if !player.has_turns_left() {
            return false;
        }
        if self.round() == RoundNumber::Three && !self.phase.is_playing() {
            return !player.has_been_main_player;
        }
        true
    }

    /// Next eligible player after the current one, wrapping around once.
    /// The current player is examined last.
    pub fn next_player_index(&self) -> Option<usize> {
        let len = self.roster.len();
        (1..=len)
            .map(|offset| (self.current + offset) % len)
            .find(|&index| {
                self.roster
                    .get(index)
                    .is_some_and(|player| self.is_eligible(player))
            })
    }

    pub fn draw_card(&mut self) -> Result<Card, DeckError> {
        let card = self.deck.next_card(&mut self.rng)?;
        self.events.push(Event::CardDrawn {
            title: card.title().to_string(),
            category: card.category().to_string(),
        });
        Ok(card)
    }

    pub fn show_card(&mut self, card: Card) {
        self.events.push(Event::CardDrawn {
            title: card.title().to_string(),
            category: card.category().to_string(),
        });
        self.deck.set_current(Some(card));
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub(crate) fn countdown_mut(&mut self) -> &mut Countdown {
        &mut self.countdown
    }

    pub fn timer_run(&self) -> u64 {
        self.timer_run
    }

    /// Starts a fresh countdown whose reports come back through the timer
    /// channel tagged with a new run id.
    pub fn start_countdown(&mut self, seconds: u32) -> Result<(), CountdownError> {
        self.timer_run += 1;
        let run = self.timer_run;
        let tick_tx = self.timer_tx.clone();
        let finish_tx = self.timer_tx.clone();
        self.countdown.start(
            seconds,
            move |remaining| {
                let _ = tick_tx.send(TimerEvent {
                    run,
                    kind: TimerEventKind::Tick(remaining),
                });
            },
            move || {
                let _ = finish_tx.send(TimerEvent {
                    run,
                    kind: TimerEventKind::Finished,
                });
            },
        )
    }

    /// Stops the countdown and invalidates anything it already queued.
    pub fn stop_countdown(&mut self) {
        self.countdown.stop();
        self.timer_run += 1;
    }
}
