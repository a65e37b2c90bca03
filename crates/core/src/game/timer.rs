use super::Game;
use crate::*;
use tokio::sync::mpsc::error::TryRecvError;

impl Game {
    /// Waits for the next report from the running countdown and applies it.
    /// Reports from stopped or replaced countdowns are skipped. Pending
    /// forever while no countdown is running.
    pub async fn next_timer_event(&mut self) -> Result<TimerEvent, GameError> {
        loop {
            let Some(event) = self.timer_rx.recv().await else {
                return std::future::pending().await;
            };
            if self.apply_timer_event(event)? {
                return Ok(event);
            }
        }
    }

    /// Applies every report already queued. Returns how many were current.
    pub fn poll_timer_events(&mut self) -> Result<usize, GameError> {
        let mut applied = 0;
        loop {
            match self.timer_rx.try_recv() {
                Ok(event) => {
                    if self.apply_timer_event(event)? {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return Ok(applied),
            }
        }
    }

    /// Returns `false` for stale reports, which leave the game untouched.
    pub fn apply_timer_event(&mut self, event: TimerEvent) -> Result<bool, GameError> {
        if event.run != self.table.timer_run() {
            return Ok(false);
        }
        match event.kind {
            TimerEventKind::Tick(remaining) => {
                self.table.events.push(Event::TimerTick { remaining });
            }
            TimerEventKind::Finished => {
                self.table.events.push(Event::TimerFinished);
                if self.phase().is_playing() {
                    self.strategy.timer_finished(&mut self.table)?;
                }
            }
        }
        Ok(true)
    }
}
