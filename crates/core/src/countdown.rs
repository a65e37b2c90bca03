//! One-second countdown running on a tokio task.
//!
//! Callbacks run on the countdown task. Owners that keep their state on a
//! single context forward them through a channel (see `Game`).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CountdownError {
    #[error("countdown requires a running tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl CountdownState {
    fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Paused => 2,
            Self::Finished => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Finished,
            _ => Self::Idle,
        }
    }
}

#[derive(Debug)]
struct Shared {
    remaining: AtomicU32,
    state: AtomicU8,
}

impl Shared {
    fn new(remaining: u32, state: CountdownState) -> Self {
        Self {
            remaining: AtomicU32::new(remaining),
            state: AtomicU8::new(state.to_u8()),
        }
    }

    fn state(&self) -> CountdownState {
        CountdownState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn set_state(&self, state: CountdownState) {
        self.state.store(state.to_u8(), Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct Countdown {
    duration: u32,
    shared: Arc<Shared>,
    paused: Option<watch::Sender<bool>>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            duration: 0,
            shared: Arc::new(Shared::new(0, CountdownState::Idle)),
            paused: None,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// Counts down from `duration` to zero, one step per second.
    ///
    /// `on_tick` receives every value below `duration`, including zero.
    /// `on_finish` fires once after the zero tick. Any previous run is
    /// cancelled first.
    pub fn start<T, F>(&mut self, duration: u32, on_tick: T, on_finish: F) -> Result<(), CountdownError>
    where
        T: FnMut(u32) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| CountdownError::NoRuntime)?;
        self.stop();

        let shared = Arc::new(Shared::new(duration, CountdownState::Running));
        let (paused_tx, paused_rx) = watch::channel(false);
        let cancel = CancellationToken::new();

        self.duration = duration;
        self.shared = Arc::clone(&shared);
        self.paused = Some(paused_tx);
        self.cancel = cancel.clone();
        self.handle = Some(runtime.spawn(run(shared, paused_rx, cancel, on_tick, on_finish)));
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.shared.state() != CountdownState::Running {
            return;
        }
        if let Some(paused) = &self.paused {
            self.shared.set_state(CountdownState::Paused);
            let _ = paused.send(true);
        }
    }

    pub fn resume(&mut self) {
        if self.shared.state() != CountdownState::Paused {
            return;
        }
        if let Some(paused) = &self.paused {
            self.shared.set_state(CountdownState::Running);
            let _ = paused.send(false);
        }
    }

    /// Cancels the current run without firing `on_finish`. Safe to repeat.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.paused = None;
        if self.shared.state() != CountdownState::Idle {
            self.shared.set_state(CountdownState::Idle);
        }
    }

    pub fn state(&self) -> CountdownState {
        self.shared.state()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state(), CountdownState::Running | CountdownState::Paused)
    }

    pub fn remaining(&self) -> u32 {
        self.shared.remaining.load(Ordering::SeqCst)
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Fraction of the duration still left, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.duration == 0 {
            return 0.0;
        }
        self.remaining() as f32 / self.duration as f32
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run<T, F>(
    shared: Arc<Shared>,
    mut paused: watch::Receiver<bool>,
    cancel: CancellationToken,
    mut on_tick: T,
    on_finish: F,
) where
    T: FnMut(u32) + Send + 'static,
    F: FnOnce() + Send + 'static,
{
    loop {
        let remaining = shared.remaining.load(Ordering::SeqCst);
        if remaining == 0 {
            break;
        }

        loop {
            let is_paused = *paused.borrow_and_update();
            if !is_paused {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = paused.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        // A pause mid-second restarts that second on resume.
        tokio::select! {
            _ = cancel.cancelled() => return,
            changed = paused.changed() => {
                if changed.is_err() {
                    return;
                }
                continue;
            }
            _ = tokio::time::sleep(TICK) => {}
        }

        if cancel.is_cancelled() {
            return;
        }
        let next = remaining - 1;
        shared.remaining.store(next, Ordering::SeqCst);
        on_tick(next);
    }

    if cancel.is_cancelled() {
        return;
    }
    shared.set_state(CountdownState::Finished);
    on_finish();
    shared.set_state(CountdownState::Idle);
}
