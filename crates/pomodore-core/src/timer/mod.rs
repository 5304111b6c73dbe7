mod engine;
mod phase;

pub use engine::{Tick, TimerAction, TimerEngine};
pub use phase::{format_time, PhaseCompletion, TimerPhase, TimerSnapshot, TimerState};
