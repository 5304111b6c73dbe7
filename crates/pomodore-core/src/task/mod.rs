//! Task ("scroll") types for the deadline-aware reward economy.
//!
//! Every task carries an XP reward and a late penalty fixed by its effort
//! tier. Subtasks split the reward evenly; finishing early earns a bonus;
//! missing the deadline costs the penalty exactly once.
//!
//! Lifecycle:
//!
//! ```text
//!   PENDING ──(deadline passes)──> OVERDUE
//!      │                              │
//!      └──────────(complete)──────────┴──> COMPLETED (terminal)
//! ```

mod display;
mod ordering;
mod reward;
mod subtasks;

pub use display::{deadline_color_class, format_deadline_text};
pub use ordering::{filter_tasks, reorder, sort_by_priority, TaskFilter};
pub use reward::{
    apply_penalty, calculate_completion_xp, calculate_early_bonus, complete_task,
    days_until_deadline, get_tasks_for_penalty, is_overdue, link_focus_cycle, mark_overdue_if_due,
};
pub use subtasks::{
    add_subtask, are_all_subtasks_complete, calculate_progress, create_subtasks,
    recalculate_subtask_xp, remove_subtask, toggle_subtask, SubtaskProgress,
};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::Clock;
use crate::error::ValidationError;

/// Effort tier: fixes a task's XP reward and late penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffortTier {
    Trivial,
    Common,
    Challenging,
    Heroic,
    Epic,
    Legendary,
}

/// Reward/penalty pair for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffortConfig {
    pub xp_reward: u32,
    pub xp_penalty: u32,
    pub label: &'static str,
}

/// Indexed by `EffortTier as usize`. The single source of tier values.
const EFFORT_CONFIG: [EffortConfig; 6] = [
    EffortConfig { xp_reward: 5, xp_penalty: 2, label: "Trivial" },
    EffortConfig { xp_reward: 15, xp_penalty: 5, label: "Common" },
    EffortConfig { xp_reward: 22, xp_penalty: 8, label: "Challenging" },
    EffortConfig { xp_reward: 30, xp_penalty: 12, label: "Heroic" },
    EffortConfig { xp_reward: 40, xp_penalty: 16, label: "Epic" },
    EffortConfig { xp_reward: 50, xp_penalty: 20, label: "Legendary" },
];

impl EffortTier {
    pub const ALL: [EffortTier; 6] = [
        EffortTier::Trivial,
        EffortTier::Common,
        EffortTier::Challenging,
        EffortTier::Heroic,
        EffortTier::Epic,
        EffortTier::Legendary,
    ];

    pub fn config(self) -> &'static EffortConfig {
        &EFFORT_CONFIG[self as usize]
    }

    pub fn xp_reward(self) -> u32 {
        self.config().xp_reward
    }

    pub fn xp_penalty(self) -> u32 {
        self.config().xp_penalty
    }
}

impl fmt::Display for EffortTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.config().label.to_lowercase())
    }
}

impl FromStr for EffortTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffortTier::ALL
            .into_iter()
            .find(|tier| tier.config().label.eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ValidationError::invalid(
                    "effort",
                    format!(
                        "'{s}' is not one of trivial, common, challenging, heroic, epic, legendary"
                    ),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// Overdue is one-way until completion; completion is terminal.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => matches!(to, TaskStatus::Overdue | TaskStatus::Completed),
            TaskStatus::Overdue => matches!(to, TaskStatus::Completed),
            TaskStatus::Completed => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub effort: EffortTier,
    pub status: TaskStatus,
    /// Copied from the effort tier at creation.
    pub xp_reward: u32,
    pub xp_penalty: u32,
    /// XP already credited through subtasks. Never exceeds `xp_reward`.
    pub xp_earned: u32,
    pub penalty_applied: bool,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    /// Focus cycles completed while this task was active.
    pub linked_cycles: u32,
    /// Manual display order.
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub completed: bool,
    /// Even share of the parent's reward, rounded down.
    pub xp_reward: u32,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub effort: Option<EffortTier>,
    pub deadline: Option<NaiveDate>,
}

impl CreateTaskInput {
    pub fn new(title: impl Into<String>, effort: EffortTier) -> Self {
        Self {
            title: title.into(),
            effort: Some(effort),
            ..Default::default()
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a pending task with XP fields taken from its tier.
///
/// A missing effort defaults to `common`.
pub fn create_task(input: CreateTaskInput, clock: &dyn Clock) -> Task {
    let effort = input.effort.unwrap_or(EffortTier::Common);
    Task {
        id: new_id(),
        title: input.title,
        description: input.description,
        effort,
        status: TaskStatus::Pending,
        xp_reward: effort.xp_reward(),
        xp_penalty: effort.xp_penalty(),
        xp_earned: 0,
        penalty_applied: false,
        deadline: input.deadline,
        created_at: clock.local_now(),
        completed_at: None,
        linked_cycles: 0,
        sort_order: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn effort_table_escalates() {
        let rewards: Vec<u32> = EffortTier::ALL.iter().map(|t| t.xp_reward()).collect();
        assert_eq!(rewards, vec![5, 15, 22, 30, 40, 50]);
        let penalties: Vec<u32> = EffortTier::ALL.iter().map(|t| t.xp_penalty()).collect();
        assert_eq!(penalties, vec![2, 5, 8, 12, 16, 20]);
    }

    #[test]
    fn effort_parses_case_insensitively() {
        assert_eq!("EPIC".parse::<EffortTier>().unwrap(), EffortTier::Epic);
        assert_eq!(" trivial ".parse::<EffortTier>().unwrap(), EffortTier::Trivial);
        assert!("mythic".parse::<EffortTier>().is_err());
        assert_eq!(EffortTier::Challenging.to_string(), "challenging");
    }

    #[test]
    fn status_transitions() {
        assert!(TaskStatus::Pending.can_transition_to(&TaskStatus::Overdue));
        assert!(TaskStatus::Overdue.can_transition_to(&TaskStatus::Completed));
        assert!(!TaskStatus::Overdue.can_transition_to(&TaskStatus::Pending));
        assert!(!TaskStatus::Completed.can_transition_to(&TaskStatus::Pending));
    }

    #[test]
    fn create_task_uses_tier_values() {
        let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 9, 0);
        let task = create_task(CreateTaskInput::new("Write report", EffortTier::Heroic), &clock);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.xp_reward, 30);
        assert_eq!(task.xp_penalty, 12);
        assert_eq!(task.xp_earned, 0);
        assert_eq!(task.linked_cycles, 0);
        assert!(!task.penalty_applied);
        assert_eq!(task.created_at, clock.local_now());
        assert!(!task.id.is_empty());
    }

    #[test]
    fn task_serializes_lowercase_enums() {
        let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 9, 0);
        let task = create_task(CreateTaskInput::new("x", EffortTier::Legendary), &clock);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["effort"], "legendary");
        assert_eq!(json["status"], "pending");
    }
}
