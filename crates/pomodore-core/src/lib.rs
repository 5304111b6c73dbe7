//! # Pomodore Core Library
//!
//! This library provides the rule engine of the Pomodore focus timer: the
//! timer state machine and the gamification layer built on top of it. It
//! follows a CLI-first philosophy where every operation is available via the
//! standalone `pomodore` binary; any GUI is a thin layer over the same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Score**: XP, levels, streaks, daily statistics and achievements
//! - **Quests**: Daily and weekly goals that refresh with the calendar
//! - **Tasks**: Deadline tasks with effort-tier rewards, early bonuses,
//!   overdue penalties and subtasks
//! - **Ledger**: Applies every reward decision to the persisted user state and
//!   reports it as [`Event`]s
//! - **Storage**: SQLite-based state storage and TOML-based configuration
//!
//! All time-dependent logic reads the time through the [`Clock`] trait so it
//! can be driven deterministically in tests.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`Ledger`]: Reward bookkeeping
//! - [`Database`]: Engine and ledger persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod dates;
pub mod error;
pub mod events;
pub mod ledger;
pub mod modes;
pub mod quest;
pub mod score;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, XpSource};
pub use ledger::Ledger;
pub use modes::{default_preset, preset_by_id, presets, Mode};
pub use quest::{Quest, QuestScope};
pub use score::{Achievement, DailyStat, UserProgress};
pub use storage::{Config, Database};
pub use task::{CreateTaskInput, EffortTier, Subtask, Task, TaskStatus};
pub use timer::{Tick, TimerAction, TimerEngine, TimerPhase, TimerSnapshot, TimerState};
