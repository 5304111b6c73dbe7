//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Finished)
//! Paused -> Running
//! Finished -> Running
//! ```
//!
//! Commands that do not apply to the current state are no-ops and return the
//! unchanged snapshot.
//!
//! ## Usage
//!
//! ```ignore
//! let clock = SystemClock;
//! let mut engine = TimerEngine::new(default_preset());
//! engine.start(&clock);
//! // In a loop, roughly once per second:
//! let tick = engine.tick(&clock);
//! if let Some(done) = tick.completion { /* reward the user */ }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::phase::{PhaseCompletion, TimerPhase, TimerSnapshot, TimerState};
use crate::clock::Clock;
use crate::modes::Mode;

/// Commands accepted by [`TimerEngine::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerAction {
    Start,
    Pause,
    Resume,
    Skip,
    Reset,
    AddMinute,
    SubtractMinute,
    Tick,
}

/// Result of a tick: the fresh snapshot plus the phase completion, if one
/// happened during this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub snapshot: TimerSnapshot,
    pub completion: Option<PhaseCompletion>,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread. Serializable so the
/// caller can persist it between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: Mode,
    state: TimerState,
    phase: TimerPhase,
    /// Remaining time in whole seconds for the current phase.
    remaining_secs: u64,
    completed_cycles: u32,
    /// Timestamp (ms since epoch) the countdown was last rebased to.
    /// Only set while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<i64>,
}

impl TimerEngine {
    /// Create a new timer engine in `Idle`, loaded with a focus phase.
    pub fn new(mode: Mode) -> Self {
        Self {
            remaining_secs: mode.focus_secs,
            mode,
            state: TimerState::Idle,
            phase: TimerPhase::Focus,
            completed_cycles: 0,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let total = self.mode.duration_for(self.phase);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            completed_cycles: self.completed_cycles,
            mode: self.mode.clone(),
            is_last_minute: self.remaining_secs > 0 && self.remaining_secs <= 60,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, clock: &dyn Clock) -> TimerSnapshot {
        if matches!(self.state, TimerState::Idle | TimerState::Finished) {
            self.state = TimerState::Running;
            self.last_tick_epoch_ms = Some(clock.now_ms());
            debug!(phase = ?self.phase, remaining = self.remaining_secs, "timer started");
        }
        self.snapshot()
    }

    pub fn pause(&mut self, clock: &dyn Clock) -> TimerSnapshot {
        if self.state == TimerState::Running {
            if let Some(last) = self.last_tick_epoch_ms {
                let elapsed = whole_secs_between(last, clock.now_ms());
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
            }
            self.state = TimerState::Paused;
            self.last_tick_epoch_ms = None;
            debug!(remaining = self.remaining_secs, "timer paused");
        }
        self.snapshot()
    }

    /// Elapsed time while paused never counts; the remaining value is kept as-is.
    pub fn resume(&mut self, clock: &dyn Clock) -> TimerSnapshot {
        if self.state == TimerState::Paused {
            self.state = TimerState::Running;
            self.last_tick_epoch_ms = Some(clock.now_ms());
            debug!(remaining = self.remaining_secs, "timer resumed");
        }
        self.snapshot()
    }

    /// Jump to the next phase without waiting for the current one to elapse.
    ///
    /// Skipping out of focus still counts the cycle toward the long break but
    /// is not a completion, so no [`PhaseCompletion`] is produced.
    pub fn skip(&mut self) -> TimerSnapshot {
        if matches!(self.state, TimerState::Running | TimerState::Paused) {
            let from = self.phase;
            if from == TimerPhase::Focus {
                self.completed_cycles += 1;
            }
            self.load_phase(from.next(self.completed_cycles, self.mode.cycles_until_long_break));
            self.state = TimerState::Finished;
            self.last_tick_epoch_ms = None;
            debug!(?from, to = ?self.phase, "phase skipped");
        }
        self.snapshot()
    }

    /// Back to `Idle` with the current phase's full duration. Phase and cycle
    /// count are kept.
    pub fn reset(&mut self) -> TimerSnapshot {
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.remaining_secs = self.mode.duration_for(self.phase);
        self.snapshot()
    }

    pub fn add_minute(&mut self) -> TimerSnapshot {
        self.remaining_secs = self.remaining_secs.saturating_add(60);
        self.snapshot()
    }

    /// Never goes below one minute.
    pub fn subtract_minute(&mut self) -> TimerSnapshot {
        self.remaining_secs = self.remaining_secs.saturating_sub(60).max(60);
        self.snapshot()
    }

    /// Swap the mode and start over from the first focus phase.
    pub fn set_mode(&mut self, mode: Mode) -> TimerSnapshot {
        debug!(mode = %mode.id, "timer mode changed");
        *self = Self::new(mode);
        self.snapshot()
    }

    /// Call periodically (about 1 Hz) while running.
    ///
    /// Each tick only trusts the delta since the previous one, so delayed or
    /// irregular calls do not accumulate drift. Sub-second remainders carry
    /// over to the next tick.
    pub fn tick(&mut self, clock: &dyn Clock) -> Tick {
        let mut completion = None;
        if self.state == TimerState::Running {
            if let Some(last) = self.last_tick_epoch_ms {
                let now = clock.now_ms();
                let elapsed = whole_secs_between(last, now);
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
                // Rebase by the seconds consumed; a clock that jumped backwards
                // rebases to now.
                let rebased = last + (elapsed as i64) * 1000;
                self.last_tick_epoch_ms = Some(if now < last { now } else { rebased });

                if self.remaining_secs == 0 {
                    completion = Some(self.complete_phase());
                }
            }
        }
        Tick {
            snapshot: self.snapshot(),
            completion,
        }
    }

    /// Dispatch a command. Only `Tick` can produce a completion.
    pub fn apply(&mut self, action: TimerAction, clock: &dyn Clock) -> Tick {
        let snapshot = match action {
            TimerAction::Start => self.start(clock),
            TimerAction::Pause => self.pause(clock),
            TimerAction::Resume => self.resume(clock),
            TimerAction::Skip => self.skip(),
            TimerAction::Reset => self.reset(),
            TimerAction::AddMinute => self.add_minute(),
            TimerAction::SubtractMinute => self.subtract_minute(),
            TimerAction::Tick => return self.tick(clock),
        };
        Tick {
            snapshot,
            completion: None,
        }
    }

    /// Pure form of [`apply`](Self::apply): leaves `self` untouched and
    /// returns the successor state.
    pub fn transition(&self, action: TimerAction, clock: &dyn Clock) -> (TimerEngine, Tick) {
        let mut next = self.clone();
        let tick = next.apply(action, clock);
        (next, tick)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> PhaseCompletion {
        let completed = self.phase;
        if completed == TimerPhase::Focus {
            self.completed_cycles += 1;
        }
        let next = completed.next(self.completed_cycles, self.mode.cycles_until_long_break);
        self.load_phase(next);
        self.state = TimerState::Finished;
        self.last_tick_epoch_ms = None;
        info!(?completed, ?next, cycles = self.completed_cycles, "phase completed");
        PhaseCompletion {
            completed,
            next,
            completed_cycles: self.completed_cycles,
        }
    }

    fn load_phase(&mut self, phase: TimerPhase) {
        self.phase = phase;
        self.remaining_secs = self.mode.duration_for(phase);
    }
}

fn whole_secs_between(from_ms: i64, to_ms: i64) -> u64 {
    (to_ms.saturating_sub(from_ms).max(0) / 1000) as u64
}
