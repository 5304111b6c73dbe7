use serde::{Deserialize, Serialize};

use crate::modes::Mode;

/// Run-state of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// A phase just ended (or was skipped); the next phase is loaded but not started.
    Finished,
}

/// Position in the focus/break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerPhase {
    pub fn is_break(self) -> bool {
        !matches!(self, TimerPhase::Focus)
    }

    /// Phase that follows this one, given the completed-cycle count *after*
    /// any increment for a finished focus phase.
    pub fn next(self, completed_cycles: u32, cycles_until_long_break: u32) -> TimerPhase {
        match self {
            TimerPhase::Focus => {
                if completed_cycles % cycles_until_long_break.max(1) == 0 {
                    TimerPhase::LongBreak
                } else {
                    TimerPhase::ShortBreak
                }
            }
            TimerPhase::ShortBreak | TimerPhase::LongBreak => TimerPhase::Focus,
        }
    }
}

/// Externally visible timer state. Produced fresh by every engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub phase: TimerPhase,
    pub remaining_secs: u64,
    pub completed_cycles: u32,
    pub mode: Mode,
    pub is_last_minute: bool,
}

/// Emitted by `tick` when the running phase reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    pub completed: TimerPhase,
    pub next: TimerPhase,
    pub completed_cycles: u32,
}

impl PhaseCompletion {
    pub fn was_focus(&self) -> bool {
        self.completed == TimerPhase::Focus
    }
}

/// Format seconds as `MM:SS`.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
