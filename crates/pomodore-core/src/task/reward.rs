//! Deadline arithmetic, completion rewards and late penalties.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::{Task, TaskStatus};
use crate::dates::days_between;

/// Signed calendar days from `today` to `deadline`. Negative means overdue;
/// zero means the deadline is today and still met.
pub fn days_until_deadline(deadline: NaiveDate, today: NaiveDate) -> i64 {
    days_between(today, deadline)
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.status == TaskStatus::Completed {
        return false;
    }
    task.deadline
        .map(|deadline| days_until_deadline(deadline, today) < 0)
        .unwrap_or(false)
}

/// +50% of the base reward when finished 3 or more days early, +20% when 1
/// or more days early, nothing otherwise. Rounded down.
pub fn calculate_early_bonus(task: &Task, completion_date: NaiveDate) -> u32 {
    let Some(deadline) = task.deadline else {
        return 0;
    };
    let days_early = days_between(completion_date, deadline);
    if days_early >= 3 {
        task.xp_reward * 50 / 100
    } else if days_early >= 1 {
        task.xp_reward * 20 / 100
    } else {
        0
    }
}

/// Reward still owed (base minus what subtasks already paid) plus the early
/// bonus.
pub fn calculate_completion_xp(task: &Task, completion_date: NaiveDate) -> u32 {
    task.xp_reward.saturating_sub(task.xp_earned) + calculate_early_bonus(task, completion_date)
}

/// Mark the task completed and return the XP to credit. Completing an
/// already-completed task pays nothing.
pub fn complete_task(task: &mut Task, completed_at: NaiveDateTime) -> u32 {
    if !task.status.can_transition_to(&TaskStatus::Completed) {
        return 0;
    }
    let xp = calculate_completion_xp(task, completed_at.date());
    task.status = TaskStatus::Completed;
    task.completed_at = Some(completed_at);
    task.xp_earned = task.xp_reward;
    debug!(task = %task.id, xp, "task completed");
    xp
}

/// Pending or overdue tasks past their deadline that have not been penalized.
pub fn get_tasks_for_penalty(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| {
            matches!(task.status, TaskStatus::Pending | TaskStatus::Overdue)
                && !task.penalty_applied
                && task
                    .deadline
                    .map(|d| days_until_deadline(d, today) < 0)
                    .unwrap_or(false)
        })
        .collect()
}

/// Mark the task overdue and penalized; returns the XP to deduct. Returns 0
/// if the penalty was already applied or the task is completed.
pub fn apply_penalty(task: &mut Task) -> u32 {
    if task.penalty_applied || task.status == TaskStatus::Completed {
        return 0;
    }
    task.status = TaskStatus::Overdue;
    task.penalty_applied = true;
    debug!(task = %task.id, penalty = task.xp_penalty, "penalty applied");
    task.xp_penalty
}

/// Flip a pending task to overdue once its deadline has passed.
pub fn mark_overdue_if_due(task: &mut Task, today: NaiveDate) -> bool {
    if task.status == TaskStatus::Pending && is_overdue(task, today) {
        task.status = TaskStatus::Overdue;
        return true;
    }
    false
}

/// Count one completed focus cycle toward the task.
pub fn link_focus_cycle(task: &mut Task) -> bool {
    if task.status == TaskStatus::Completed {
        return false;
    }
    task.linked_cycles += 1;
    true
}
