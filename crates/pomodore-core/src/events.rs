use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timer::TimerPhase;

/// Why an XP delta was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XpSource {
    Focus { mode_id: String, streak: u32 },
    Achievement { id: String },
    Quest { id: String },
    Task { task_id: String },
    Subtask { task_id: String, subtask_id: String },
    Penalty { task_id: String },
}

/// Every reward decision the ledger applies produces an Event.
/// Callers display or log them; the ledger itself never reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    PhaseCompleted {
        phase: TimerPhase,
        next: TimerPhase,
        completed_cycles: u32,
        at: NaiveDateTime,
    },
    /// Signed XP delta and the resulting total.
    XpAwarded {
        amount: i64,
        source: XpSource,
        total_xp: u64,
        at: NaiveDateTime,
    },
    AchievementUnlocked {
        id: String,
        xp: u64,
        at: NaiveDateTime,
    },
    QuestCompleted {
        id: String,
        xp: u64,
        at: NaiveDateTime,
    },
    /// A focus cycle counted toward the active task.
    CycleLinked {
        task_id: String,
        linked_cycles: u32,
        at: NaiveDateTime,
    },
    TaskCompleted {
        task_id: String,
        xp: u32,
        at: NaiveDateTime,
    },
    TaskPenalized {
        task_id: String,
        penalty: u32,
        at: NaiveDateTime,
    },
}
