//! Step sequencer: replays one operation's steps, one per tick.
//!
//! `Idle → Running → Idle`. Starting schedules an immediate first tick; each
//! applied step schedules the next tick after the fixed delay. The tick that
//! finds the list exhausted returns the resting payload and goes back to
//! `Idle`. Under [`Pacing::Manual`] nothing is scheduled and the host calls
//! [`StepSequencer::step_now`] instead.

use log::debug;
use std::time::Duration;
use thiserror::Error;

use crate::config::Pacing;
use crate::scheduler::{Scheduler, TimerHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("an animation is already running")]
    Busy,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick<S, R> {
    /// `step` (at position `index`) must be applied and redrawn.
    Applied { index: usize, step: S },
    /// The list is exhausted; `resting` is the state to settle on.
    Completed { resting: R },
}

#[derive(Debug)]
pub struct StepSequencer<S, R> {
    steps: Vec<S>,
    cursor: usize,
    resting: Option<R>,
    state: SequencerState,
    delay: Duration,
    pacing: Pacing,
    pending: Option<TimerHandle>,
    ticks_applied: usize,
}

impl<S: Clone, R> StepSequencer<S, R> {
    pub fn new(delay: Duration, pacing: Pacing) -> Self {
        Self {
            steps: Vec::new(),
            cursor: 0,
            resting: None,
            state: SequencerState::Idle,
            delay,
            pacing,
            pending: None,
            ticks_applied: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Steps applied since the last `start`.
    pub fn ticks_applied(&self) -> usize {
        self.ticks_applied
    }

    /// (applied, total) for the current run.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.steps.len())
    }

    /// Timer of the next scheduled tick, if any.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Begin replaying `steps`. Rejected, with no state change, while running.
    pub fn start<T>(
        &mut self,
        steps: Vec<S>,
        resting: R,
        scheduler: &mut impl Scheduler<T>,
        token: T,
    ) -> Result<(), SequencerError> {
        if self.is_running() {
            return Err(SequencerError::Busy);
        }
        debug!("sequencer start: {} steps", steps.len());
        self.steps = steps;
        self.cursor = 0;
        self.resting = Some(resting);
        self.ticks_applied = 0;
        self.state = SequencerState::Running;
        if self.pacing == Pacing::Timed {
            self.pending = Some(scheduler.schedule_after(Duration::ZERO, token));
        }
        Ok(())
    }

    /// Handle a fired timer. Returns `None` for stale timers (sequencer idle).
    pub fn on_timer<T>(
        &mut self,
        scheduler: &mut impl Scheduler<T>,
        token: T,
    ) -> Option<Tick<S, R>> {
        self.pending = None;
        let tick = self.advance()?;
        if matches!(tick, Tick::Applied { .. }) && self.pacing == Pacing::Timed {
            self.pending = Some(scheduler.schedule_after(self.delay, token));
        }
        Some(tick)
    }

    /// Advance one step without the timer (manual pacing).
    pub fn step_now(&mut self) -> Option<Tick<S, R>> {
        self.advance()
    }

    /// Abandon the current run and drop its pending timer.
    pub fn cancel<T>(&mut self, scheduler: &mut impl Scheduler<T>) -> bool {
        if !self.is_running() {
            return false;
        }
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.steps.clear();
        self.cursor = 0;
        self.resting = None;
        self.state = SequencerState::Idle;
        true
    }

    fn advance(&mut self) -> Option<Tick<S, R>> {
        if !self.is_running() {
            return None;
        }
        match self.steps.get(self.cursor) {
            Some(step) => {
                let tick = Tick::Applied {
                    index: self.cursor,
                    step: step.clone(),
                };
                self.cursor += 1;
                self.ticks_applied += 1;
                Some(tick)
            }
            None => {
                self.state = SequencerState::Idle;
                self.steps.clear();
                debug!("sequencer complete after {} steps", self.ticks_applied);
                self.resting.take().map(|resting| Tick::Completed { resting })
            }
        }
    }
}
